//! Defect-class transfer errors.

use crate::syntax::NodeId;
use thiserror::Error;

/// Internal invariant violations detected while applying a transfer function.
///
/// These are never caused by user source code: they mean the control-flow
/// graph and the transfer functions disagree about the evaluation stack.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransferError {
    #[error("Assignment at {node} has no evaluated value on the stack")]
    AssignmentWithoutValue { node: NodeId },
}
