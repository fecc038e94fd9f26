//! Context provided to invariant checks.

use crate::core::ProgramState;

/// States on both sides of a checked stretch of program points
#[derive(Clone, Debug)]
pub struct CheckContext {
    pub before: ProgramState,
    pub after: ProgramState,
    /// Net stack growth the stretch is expected to produce
    pub expected_delta: isize,
}

impl CheckContext {
    /// Context for a stretch expected to leave the stack depth unchanged.
    pub fn balanced(before: ProgramState, after: ProgramState) -> Self {
        Self {
            before,
            after,
            expected_delta: 0,
        }
    }

    /// Net stack growth between `before` and `after` (pure)
    pub fn depth_delta(&self) -> isize {
        self.after.stack_depth() as isize - self.before.stack_depth() as isize
    }
}
