//! The recommendation engine.
//!
//! ## Algorithm
//! 1. Turn the upcoming events into candidates and run the candidate filters
//!    (duplicates, already registered)
//! 2. Derive tag preferences from positively-rated attended events
//! 3. No viewer or no preferences: cold start, first `minimum` candidates
//! 4. Otherwise score by tag overlap, drop zero scores
//! 5. Stable sort by score descending, truncate to `max`
//! 6. Backfill from the remaining candidates, in listing order, up to `minimum`
//!
//! Every call recomputes from the supplied context; nothing is cached.

use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyRegisteredFilter, DuplicateEventFilter, MinimumScoreFilter};
use crate::preferences::TagPreferences;
use crate::scoring::TagScorer;
use crate::traits::Filter;
use crate::types::{RecommendationSource, RecommendedEvent, ViewerContext};
use std::collections::HashSet;
use tracing::{debug, instrument};

pub struct Recommender {
    config: RecommendationConfig,
    candidate_filters: FilterPipeline,
    score_filter: MinimumScoreFilter,
    scorer: TagScorer,
}

impl Recommender {
    /// Build a recommender, rejecting inconsistent bounds
    pub fn new(config: RecommendationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: RecommendationConfig) -> Self {
        Self {
            config,
            candidate_filters: FilterPipeline::new()
                .add_filter(DuplicateEventFilter)
                .add_filter(AlreadyRegisteredFilter),
            score_filter: MinimumScoreFilter::default(),
            scorer: TagScorer::new(),
        }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Tag preferences the engine would use for this viewer
    pub fn preferences(&self, context: &ViewerContext) -> TagPreferences {
        TagPreferences::from_history(
            &context.past_attended_events,
            &context.ratings,
            self.config.positive_rating_threshold,
        )
    }

    /// Produce the ordered recommendation list for one viewer.
    ///
    /// Pure over `context`: the same context always yields the same list.
    #[instrument(skip_all, fields(user_id = ?context.user_id))]
    pub fn recommend(&self, context: &ViewerContext) -> Vec<RecommendedEvent> {
        let candidates: Vec<RecommendedEvent> = context
            .upcoming_events
            .iter()
            .cloned()
            .map(RecommendedEvent::candidate)
            .collect();
        let candidates = self.candidate_filters.apply(candidates, context);

        if candidates.is_empty() {
            debug!("No unregistered upcoming events");
            return Vec::new();
        }

        let preferences = self.preferences(context);
        if context.user_id.is_none() || preferences.is_empty() {
            debug!("No positive signal, using cold start");
            return self.cold_start(candidates);
        }

        let scored = self
            .scorer
            .score_candidates(candidates.clone(), &preferences);
        let mut ranked = self.score_filter.apply(scored, context);

        // `sort_by` is stable: equal scores keep listing order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(self.config.max_recommendations);

        debug!(
            preferred_tags = preferences.len(),
            scored = ranked.len(),
            "Ranked candidates"
        );

        self.backfill(ranked, candidates)
    }

    fn cold_start(&self, candidates: Vec<RecommendedEvent>) -> Vec<RecommendedEvent> {
        candidates
            .into_iter()
            .take(self.config.minimum_recommendations)
            .map(|c| c.with_source(RecommendationSource::ColdStart))
            .collect()
    }

    /// Top up `ranked` with unused candidates until the minimum is reached
    fn backfill(
        &self,
        mut ranked: Vec<RecommendedEvent>,
        candidates: Vec<RecommendedEvent>,
    ) -> Vec<RecommendedEvent> {
        let minimum = self.config.minimum_recommendations;
        if ranked.len() >= minimum {
            return ranked;
        }

        let used: HashSet<String> = ranked.iter().map(|r| r.event.id.clone()).collect();
        let missing = minimum - ranked.len();
        let extra: Vec<RecommendedEvent> = candidates
            .into_iter()
            .filter(|c| !used.contains(c.event_id()))
            .take(missing)
            .map(|c| c.with_source(RecommendationSource::Backfill))
            .collect();

        debug!(backfilled = extra.len(), "Backfilled recommendations");
        ranked.extend(extra);
        ranked
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_valid_config(RecommendationConfig::default())
    }
}
