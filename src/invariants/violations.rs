//! Invariant violations and handling strategies.

use crate::core::ValueId;
use thiserror::Error;

/// Ways a program state can break the engine's invariants
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("Value {value} is constrained both ways")]
    ContradictoryConstraints { value: ValueId },

    #[error("Stack depth changed by {actual} (expected {expected})")]
    StackImbalance { expected: isize, actual: isize },

    #[error("Stack depth {depth} exceeds the maximum of {max}")]
    StackTooDeep { depth: usize, max: usize },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// Strategy for handling invariant violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationStrategy {
    /// Abort the analysis unit
    Abort,

    /// Continue but log warning
    IgnoreAndLog,
}
