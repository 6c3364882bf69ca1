//! Ordered chain of candidate filters.
//!
//! Each stage sees only the survivors of the previous one.

use crate::traits::Filter;
use crate::types::{RecommendedEvent, ViewerContext};
use tracing::debug;

/// Runs its filters in the order they were added.
///
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(DuplicateEventFilter)
///     .add_filter(AlreadyRegisteredFilter);
///
/// let candidates = pipeline.apply(candidates, &context);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Append a stage
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every stage, logging how many candidates each one dropped
    pub fn apply(
        &self,
        candidates: Vec<RecommendedEvent>,
        context: &ViewerContext,
    ) -> Vec<RecommendedEvent> {
        let mut current = candidates;
        for filter in &self.filters {
            let input_count = current.len();
            current = filter.apply(current, context);
            debug!(
                "Filter applied: {} ({} -> {})",
                filter.name(),
                input_count,
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
