//! Tag-overlap scoring for candidates.

use crate::preferences::TagPreferences;
use crate::types::{RecommendationSource, RecommendedEvent};
use rayon::prelude::*;

/// Scores candidates against a viewer's tag preferences.
///
/// ## Performance Note
/// Candidates are scored in parallel with Rayon. `collect` on an indexed
/// parallel iterator keeps input order, so later stable sorting still sees
/// the listing order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagScorer;

impl TagScorer {
    pub fn new() -> Self {
        Self
    }

    /// Annotate every candidate with its score and matched tags, in the same
    /// order as the input
    pub fn score_candidates(
        &self,
        candidates: Vec<RecommendedEvent>,
        preferences: &TagPreferences,
    ) -> Vec<RecommendedEvent> {
        candidates
            .into_par_iter()
            .map(|candidate| self.score_single(candidate, preferences))
            .collect()
    }

    fn score_single(&self, mut candidate: RecommendedEvent, preferences: &TagPreferences) -> RecommendedEvent {
        let (score, matched_tags) = preferences.score(&candidate.event);
        candidate.score = score;
        candidate.matched_tags = matched_tags;
        candidate.source = RecommendationSource::Scored;
        candidate
    }
}
