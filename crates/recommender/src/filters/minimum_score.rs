//! Filter to drop candidates that scored too low.
//!
//! With the default floor of 1 this removes every event that shares no tag
//! with the viewer's liked events.

use crate::traits::Filter;
use crate::types::{RecommendedEvent, ViewerContext};

pub struct MinimumScoreFilter {
    min_score: u32,
}

impl MinimumScoreFilter {
    /// Create a new MinimumScoreFilter.
    ///
    /// # Arguments
    /// * `min_score` - Lowest score kept (typically 1)
    pub fn new(min_score: u32) -> Self {
        Self { min_score }
    }
}

impl Default for MinimumScoreFilter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Filter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "MinimumScoreFilter"
    }

    fn apply(
        &self,
        candidates: Vec<RecommendedEvent>,
        _context: &ViewerContext,
    ) -> Vec<RecommendedEvent> {
        candidates
            .into_iter()
            .filter(|candidate| candidate.score >= self.min_score)
            .collect()
    }
}
