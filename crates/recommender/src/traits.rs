//! The seam between the engine and its candidate filters.

use crate::types::{RecommendedEvent, ViewerContext};

/// One stage of candidate pruning.
///
/// Implementations are shared across concurrent requests, hence `Send + Sync`.
/// A filter returns the survivors in their original relative order and
/// never fails: when in doubt it keeps the candidate.
pub trait Filter: Send + Sync {
    /// Short label used in debug logs
    fn name(&self) -> &str;

    fn apply(
        &self,
        candidates: Vec<RecommendedEvent>,
        context: &ViewerContext,
    ) -> Vec<RecommendedEvent>;
}
