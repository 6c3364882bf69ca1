//! Filter to collapse repeated event ids.
//!
//! The upstream listing should not contain duplicates, but if it does the
//! first occurrence wins and later ones are dropped.

use crate::traits::Filter;
use crate::types::{RecommendedEvent, ViewerContext};
use std::collections::HashSet;

pub struct DuplicateEventFilter;

impl Filter for DuplicateEventFilter {
    fn name(&self) -> &str {
        "DuplicateEventFilter"
    }

    fn apply(
        &self,
        candidates: Vec<RecommendedEvent>,
        _context: &ViewerContext,
    ) -> Vec<RecommendedEvent> {
        let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
        candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.event.id.clone()))
            .collect()
    }
}
