//! Filter to remove events the viewer has already signed up for.
//!
//! Runs before any ranking so a registered event can never surface, no
//! matter how well it scores.

use crate::traits::Filter;
use crate::types::{RecommendedEvent, ViewerContext};

/// Removes candidates whose id is in `ViewerContext::registered_event_ids`.
pub struct AlreadyRegisteredFilter;

impl Filter for AlreadyRegisteredFilter {
    fn name(&self) -> &str {
        "AlreadyRegisteredFilter"
    }

    fn apply(
        &self,
        candidates: Vec<RecommendedEvent>,
        context: &ViewerContext,
    ) -> Vec<RecommendedEvent> {
        candidates
            .into_iter()
            .filter(|candidate| !context.is_registered(candidate.event_id()))
            .collect()
    }
}
