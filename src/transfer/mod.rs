//! The state-transition engine.
//!
//! Given a program point and the incoming program state, the engine produces
//! the outgoing state that conservatively approximates every runtime behavior
//! at that point.
//!
//! # Key Concepts
//!
//! - **Transfer functions**: one per [`PointKind`](crate::syntax::PointKind), selected by an exhaustive match
//! - **Interprocedural hook**: caller-supplied facts about what a call invokes
//! - **Outcomes**: [`Transfer::Next`] for the successor state, [`Transfer::Unreachable`]
//!   when a refinement proves the path infeasible, and [`TransferError`] for
//!   internal invariant violations

mod builder;
mod engine;
mod error;
mod interprocedural;

pub use builder::TransferEngineBuilder;
pub use engine::{apply_transfer_function, MemberAccessMode, Transfer, TransferEngine};
pub use error::TransferError;
pub use interprocedural::{CallHook, InterproceduralInfo, NoCallInfo};
