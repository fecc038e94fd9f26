//! Builder API for creating invariant rules.

use crate::invariants::context::CheckContext;
use crate::invariants::rules::{InvariantRules, ValidationCheck};
use crate::invariants::violations::{InvariantViolation, ViolationStrategy};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating invariant rules.
///
/// Constraint exclusion is checked by default; everything else is opt-in.
pub struct InvariantBuilder {
    constraint_exclusion: bool,
    stack_balance: bool,
    max_stack_depth: Option<usize>,
    required_checks: Vec<ValidationCheck>,
    on_violation: ViolationStrategy,
}

impl InvariantBuilder {
    pub fn new() -> Self {
        Self {
            constraint_exclusion: true,
            stack_balance: false,
            max_stack_depth: None,
            required_checks: Vec::new(),
            on_violation: ViolationStrategy::Abort,
        }
    }

    /// Skip the constraint mutual-exclusion check
    pub fn without_constraint_exclusion(mut self) -> Self {
        self.constraint_exclusion = false;
        self
    }

    /// Require the stack depth to change by exactly the expected delta
    pub fn stack_balance(mut self) -> Self {
        self.stack_balance = true;
        self
    }

    /// Set a ceiling on the stack depth after the checked stretch
    pub fn max_stack_depth(mut self, max: usize) -> Self {
        self.max_stack_depth = Some(max);
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&CheckContext) -> Validation<(), NonEmptyVec<InvariantViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&CheckContext) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &CheckContext| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(InvariantViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    /// Build the invariant rules
    pub fn build(self) -> InvariantRules {
        InvariantRules {
            constraint_exclusion: self.constraint_exclusion,
            stack_balance: self.stack_balance,
            max_stack_depth: self.max_stack_depth,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
        }
    }
}

impl Default for InvariantBuilder {
    fn default() -> Self {
        Self::new()
    }
}
