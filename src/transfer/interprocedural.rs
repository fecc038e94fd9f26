//! Interprocedural hints supplied by the caller at call points.
//!
//! The engine performs no call-target resolution of its own. Whatever the
//! hook reports about a call is taken as authoritative.

use crate::syntax::{ProgramPoint, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Facts about one call: which arguments and which captured symbols are
/// definitely invoked by it.
///
/// # Example
///
/// ```rust
/// use symflow::transfer::InterproceduralInfo;
/// use symflow::syntax::SymbolId;
///
/// let info = InterproceduralInfo::new()
///     .with_parameters([true, false])
///     .with_closure([SymbolId(3)]);
///
/// assert!(info.is_parameter_invoked(0));
/// assert!(!info.is_parameter_invoked(1));
/// assert!(!info.is_parameter_invoked(5));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterproceduralInfo {
    /// Indexed by argument position; `true` means the argument is invoked.
    pub parameters: Vec<bool>,
    /// Captured symbols the callee definitely invokes.
    pub closure: BTreeSet<SymbolId>,
}

impl InterproceduralInfo {
    /// Nothing is known to be invoked.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = bool>) -> Self {
        self.parameters = parameters.into_iter().collect();
        self
    }

    pub fn with_closure(mut self, symbols: impl IntoIterator<Item = SymbolId>) -> Self {
        self.closure.extend(symbols);
        self
    }

    /// Positions beyond the recorded parameters are not invoked.
    pub fn is_parameter_invoked(&self, position: usize) -> bool {
        self.parameters.get(position).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.parameters.iter().any(|invoked| *invoked) && self.closure.is_empty()
    }
}

/// Supplies interprocedural facts for call points.
///
/// Must be total: return the empty info when nothing better is known, for
/// example when the callee cannot be resolved.
pub trait CallHook: Send + Sync {
    fn on_call(&self, call: &ProgramPoint) -> InterproceduralInfo;
}

impl<F> CallHook for F
where
    F: Fn(&ProgramPoint) -> InterproceduralInfo + Send + Sync,
{
    fn on_call(&self, call: &ProgramPoint) -> InterproceduralInfo {
        self(call)
    }
}

/// Hook that never reports anything as invoked.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCallInfo;

impl CallHook for NoCallInfo {
    fn on_call(&self, _call: &ProgramPoint) -> InterproceduralInfo {
        InterproceduralInfo::default()
    }
}
