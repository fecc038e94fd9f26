//! Validation of engine invariants over program states.
//!
//! Checks are expressed with Stillwater's `Validation` type so that every
//! violation in a state is reported at once instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use symflow::core::{ProgramState, SymbolicValue};
//! use symflow::invariants::{CheckContext, InvariantBuilder, ViolationStrategy};
//!
//! let rules = InvariantBuilder::new()
//!     .stack_balance()
//!     .max_stack_depth(64)
//!     .on_violation(ViolationStrategy::Abort)
//!     .build();
//!
//! let before = ProgramState::new();
//! let after = before.push_value(SymbolicValue::unknown());
//!
//! assert!(rules.enforce(&CheckContext::balanced(before, after)).is_failure());
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::InvariantBuilder;
pub use context::CheckContext;
pub use rules::InvariantRules;
pub use violations::{InvariantViolation, ViolationStrategy};
