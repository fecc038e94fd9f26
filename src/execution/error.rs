//! Execution error types.

use crate::cfg::BlockId;
use crate::invariants::InvariantViolation;
use crate::transfer::TransferError;
use thiserror::Error;

/// Errors that abort a symbolic execution
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionError {
    /// A transfer function hit an internal defect
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Invariant rules configured to abort were broken after a block
    #[error("{} invariant violation(s) after block {block}", violations.len())]
    InvariantViolated {
        block: BlockId,
        violations: Vec<InvariantViolation>,
    },

    #[error("Invalid execution config: {0}")]
    InvalidConfig(String),
}
