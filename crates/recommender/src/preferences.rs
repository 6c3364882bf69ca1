//! Tag preferences derived from a viewer's rating history.
//!
//! ## Algorithm
//! 1. Walk the viewer's past attended events (each event counted once)
//! 2. Look up the viewer's rating for that event
//! 3. If the rating is at or above the positive threshold, add 1 to the
//!    weight of every tag on the event
//!
//! A tag's weight is therefore the number of distinct liked events carrying
//! it. Ratings for events outside the attended history are ignored.

use event_store::{Event, EventId, PastAttendedEvent, UserEventRating};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPreferences {
    weights: HashMap<String, u32>,
}

impl TagPreferences {
    pub fn from_history(
        past_attended_events: &[PastAttendedEvent],
        ratings: &HashMap<EventId, UserEventRating>,
        positive_rating_threshold: u8,
    ) -> Self {
        let mut weights: HashMap<String, u32> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for past in past_attended_events {
            let event = &past.event;
            if !seen.insert(event.id.as_str()) {
                continue;
            }

            let liked = ratings
                .get(&event.id)
                .is_some_and(|r| r.rating >= positive_rating_threshold);
            if !liked {
                continue;
            }

            for tag in &event.tags {
                *weights.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        Self { weights }
    }

    /// Weight of a tag (0 if never liked)
    pub fn weight(&self, tag: &str) -> u32 {
        self.weights.get(tag).copied().unwrap_or(0)
    }

    /// True when the viewer has no positive signal at all
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Sum of the weights of the event's tags, plus the tags that contributed
    pub fn score(&self, event: &Event) -> (u32, Vec<String>) {
        let mut score = 0;
        let mut matched = Vec::new();
        for tag in &event.tags {
            let weight = self.weight(tag);
            if weight > 0 {
                score += weight;
                matched.push(tag.clone());
            }
        }
        (score, matched)
    }

    /// Heaviest tags first, ties broken alphabetically
    pub fn top_tags(&self, n: usize) -> Vec<(String, u32)> {
        let mut tags: Vec<(String, u32)> = self
            .weights
            .iter()
            .map(|(tag, weight)| (tag.clone(), *weight))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags.truncate(n);
        tags
    }
}
