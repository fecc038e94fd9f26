//! Symflow: persistent symbolic-execution states for JavaScript/TypeScript
//! bug-pattern detection.
//!
//! Symflow walks a function's control-flow graph, threading an immutable
//! program state through one transfer function per program point. Checks
//! built on top read the recorded states to ask questions like "is this
//! condition always falsy here?" or "was this callback ever executed?".
//!
//! # Core Concepts
//!
//! - **Symbolic values**: identity-distinct placeholders for runtime values
//! - **Constraints**: truthiness and executed-ness facts attached to values
//! - **Program state**: evaluation stack, bindings and constraints, shared
//!   structurally between successive states
//! - **Transfer functions**: pure `state -> state` steps selected by point kind
//! - **Interprocedural hook**: tells the engine which arguments a call invokes
//!
//! # Example
//!
//! ```rust
//! use symflow::core::{ProgramState, TrackingFilter};
//! use symflow::syntax::{NodeId, PointKind, ProgramPoint, SymbolTable};
//! use symflow::transfer::{apply_transfer_function, NoCallInfo};
//!
//! let resolver = SymbolTable::new();
//! let zero = ProgramPoint::new(NodeId(1), PointKind::NumericLiteral { text: "0".into() });
//!
//! let state = ProgramState::new();
//! let next = apply_transfer_function(&zero, &state, &resolver, &TrackingFilter::all(), &NoCallInfo)?
//!     .into_state()
//!     .expect("a literal never makes a path infeasible");
//!
//! let top = next.peek_value().expect("literal was pushed");
//! assert!(next.constraints_of(top).is_falsy());
//! assert_eq!(state.stack_depth(), 0);
//! # Ok::<(), symflow::transfer::TransferError>(())
//! ```

pub mod cfg;
pub mod core;
pub mod execution;
pub mod invariants;
pub mod snapshot;
pub mod syntax;
pub mod transfer;

// Re-export commonly used types
pub use crate::core::{Constraint, ExecutionHistory, ProgramState, SymbolicValue};
pub use execution::{ExecutionConfig, ExecutionReport, SymbolicExecution};
pub use transfer::{apply_transfer_function, Transfer, TransferEngine, TransferError};
