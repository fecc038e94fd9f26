//! Core value objects and the persistent program state.
//!
//! This module contains the pure functional core of the analysis:
//! - Symbolic values and their constraints
//! - The persistent program state every transfer function threads through
//! - The tracking filter and the execution history
//!
//! Nothing in this module mutates shared data; every operation returns a new
//! value.

mod constraint;
mod history;
mod state;
mod tracking;
mod value;

pub use constraint::{Constraint, ConstraintSet};
pub use history::{ExecutionHistory, ExecutionStep};
pub use state::ProgramState;
pub use tracking::TrackingFilter;
pub use value::{SymbolicValue, ValueId, ValueKind};
