//! Symbolic execution over control-flow graphs.
//!
//! The walker drives the transfer engine block by block, refines branch
//! conditions per edge, and collects every reached state into an
//! [`ExecutionHistory`](crate::core::ExecutionHistory) for downstream checks.

mod config;
mod error;
mod walker;

pub use config::ExecutionConfig;
pub use error::ExecutionError;
pub use walker::{ExecutionOutcome, ExecutionReport, SymbolicExecution};
