//! Symbol tracking filter.
//!
//! Deciding which symbols are worth tracking lets callers bound memory and
//! precision for large scopes. The filter is a pure predicate.

use crate::syntax::SymbolId;
use std::fmt;
use std::sync::Arc;

/// Pure predicate deciding whether bindings of a symbol are tracked.
///
/// # Example
///
/// ```rust
/// use symflow::core::TrackingFilter;
/// use symflow::syntax::SymbolId;
///
/// let locals_only = TrackingFilter::new(|symbol: SymbolId| symbol.0 < 100);
///
/// assert!(locals_only.should_track(SymbolId(3)));
/// assert!(!locals_only.should_track(SymbolId(250)));
/// assert!(TrackingFilter::all().should_track(SymbolId(250)));
/// ```
#[derive(Clone)]
pub struct TrackingFilter {
    predicate: Arc<dyn Fn(SymbolId) -> bool + Send + Sync>,
}

impl TrackingFilter {
    /// Create a filter from a pure predicate.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(SymbolId) -> bool + Send + Sync + 'static,
    {
        TrackingFilter {
            predicate: Arc::new(predicate),
        }
    }

    /// Track every symbol.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    /// Track only the listed symbols.
    pub fn only(symbols: impl IntoIterator<Item = SymbolId>) -> Self {
        let symbols: im::HashSet<SymbolId> = symbols.into_iter().collect();
        Self::new(move |symbol| symbols.contains(&symbol))
    }

    pub fn should_track(&self, symbol: SymbolId) -> bool {
        (self.predicate)(symbol)
    }
}

impl Default for TrackingFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for TrackingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingFilter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tracks_everything() {
        let filter = TrackingFilter::default();

        assert!(filter.should_track(SymbolId(0)));
        assert!(filter.should_track(SymbolId(u32::MAX)));
    }

    #[test]
    fn only_tracks_listed_symbols() {
        let filter = TrackingFilter::only([SymbolId(1), SymbolId(2)]);

        assert!(filter.should_track(SymbolId(1)));
        assert!(filter.should_track(SymbolId(2)));
        assert!(!filter.should_track(SymbolId(3)));
    }

    #[test]
    fn filter_is_deterministic() {
        let filter = TrackingFilter::new(|s| s.0 % 2 == 0);

        assert_eq!(filter.should_track(SymbolId(4)), filter.should_track(SymbolId(4)));
        assert!(!filter.should_track(SymbolId(5)));
    }

    #[test]
    fn clones_share_predicate() {
        let filter = TrackingFilter::new(|s| s.0 > 10);
        let cloned = filter.clone();

        assert_eq!(cloned.should_track(SymbolId(11)), filter.should_track(SymbolId(11)));
    }
}
