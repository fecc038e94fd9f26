//! Invariant rules over program states using Validation.

use crate::invariants::context::CheckContext;
use crate::invariants::violations::{InvariantViolation, ViolationStrategy};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck =
    Box<dyn Fn(&CheckContext) -> Validation<(), NonEmptyVec<InvariantViolation>> + Send + Sync>;

/// Invariant rules for program states.
/// Uses Validation to accumulate ALL violations.
pub struct InvariantRules {
    pub(crate) constraint_exclusion: bool,
    pub(crate) stack_balance: bool,
    pub(crate) max_stack_depth: Option<usize>,
    pub(crate) required_checks: Vec<ValidationCheck>,
    pub(crate) on_violation: ViolationStrategy,
}

impl InvariantRules {
    /// Constraint exclusion and stack balance, aborting on violation.
    pub fn standard() -> Self {
        Self {
            constraint_exclusion: true,
            stack_balance: true,
            max_stack_depth: None,
            required_checks: Vec::new(),
            on_violation: ViolationStrategy::Abort,
        }
    }

    /// Enforce all rules, accumulating ALL violations.
    /// Returns Validation::Success(()) if all checks pass.
    /// Returns Validation::Failure with ALL violations if any fail.
    pub fn enforce(&self, context: &CheckContext) -> Validation<(), NonEmptyVec<InvariantViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<InvariantViolation>>> = Vec::new();

        if self.constraint_exclusion {
            for (value, constraints) in context.after.constrained_values() {
                let check = if constraints.is_consistent() {
                    Validation::success(())
                } else {
                    Validation::fail(InvariantViolation::ContradictoryConstraints { value: *value })
                };
                checks.push(check);
            }
        }

        if self.stack_balance {
            let actual = context.depth_delta();
            let check = if actual == context.expected_delta {
                Validation::success(())
            } else {
                Validation::fail(InvariantViolation::StackImbalance {
                    expected: context.expected_delta,
                    actual,
                })
            };
            checks.push(check);
        }

        if let Some(max) = self.max_stack_depth {
            let depth = context.after.stack_depth();
            let check = if depth > max {
                Validation::fail(InvariantViolation::StackTooDeep { depth, max })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }
}
