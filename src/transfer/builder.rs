//! Builder for configured transfer engines.

use super::engine::{MemberAccessMode, TransferEngine};
use super::interprocedural::{CallHook, NoCallInfo};
use crate::core::TrackingFilter;
use crate::syntax::SymbolId;
use std::sync::Arc;

/// Fluent construction of a [`TransferEngine`].
///
/// # Example
///
/// ```rust
/// use symflow::syntax::{ProgramPoint, SymbolId};
/// use symflow::transfer::{InterproceduralInfo, MemberAccessMode, TransferEngine};
///
/// let engine = TransferEngine::builder()
///     .track_when(|symbol: SymbolId| symbol.0 < 1_000)
///     .on_call(|_call: &ProgramPoint| InterproceduralInfo::new().with_parameters([true]))
///     .member_access(MemberAccessMode::Balanced)
///     .build();
///
/// assert_eq!(engine.member_access(), MemberAccessMode::Balanced);
/// ```
pub struct TransferEngineBuilder {
    tracking: TrackingFilter,
    call_hook: Arc<dyn CallHook>,
    member_access: MemberAccessMode,
}

impl TransferEngineBuilder {
    pub fn new() -> Self {
        Self {
            tracking: TrackingFilter::all(),
            call_hook: Arc::new(NoCallInfo),
            member_access: MemberAccessMode::default(),
        }
    }

    /// Set the tracking filter
    pub fn tracking(mut self, filter: TrackingFilter) -> Self {
        self.tracking = filter;
        self
    }

    /// Track symbols accepted by a closure
    pub fn track_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(SymbolId) -> bool + Send + Sync + 'static,
    {
        self.tracking = TrackingFilter::new(predicate);
        self
    }

    /// Set the interprocedural hook
    pub fn on_call<H>(mut self, hook: H) -> Self
    where
        H: CallHook + 'static,
    {
        self.call_hook = Arc::new(hook);
        self
    }

    /// Share an existing interprocedural hook
    pub fn shared_hook(mut self, hook: Arc<dyn CallHook>) -> Self {
        self.call_hook = hook;
        self
    }

    pub fn member_access(mut self, mode: MemberAccessMode) -> Self {
        self.member_access = mode;
        self
    }

    pub fn build(self) -> TransferEngine {
        TransferEngine {
            tracking: self.tracking,
            call_hook: self.call_hook,
            member_access: self.member_access,
        }
    }
}

impl Default for TransferEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
