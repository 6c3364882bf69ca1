//! Types shared by the filters, the scorer and the engine.

use event_store::{Event, EventId, PastAttendedEvent, UserEventRating, UserId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Which tier of the recommendation list an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecommendationSource {
    /// Ranked by overlap with the viewer's liked tags
    Scored,
    /// Viewer had no positive signal; upcoming events in listing order
    ColdStart,
    /// Appended after the scored tier to reach the minimum list size
    Backfill,
}

/// An upcoming event annotated with its recommendation score.
///
/// The score only orders the list. Cold-start and backfill entries carry 0.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedEvent {
    pub event: Event,
    pub score: u32,
    pub source: RecommendationSource,
    /// Tags shared with the viewer's preferences, in tag order
    pub matched_tags: Vec<String>,
}

impl RecommendedEvent {
    /// A not-yet-scored candidate
    pub fn candidate(event: Event) -> Self {
        Self {
            event,
            score: 0,
            source: RecommendationSource::Backfill,
            matched_tags: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: RecommendationSource) -> Self {
        self.source = source;
        self
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }
}

/// Everything the engine knows about one viewer for one request.
///
/// Built fresh per request from read-only snapshots; the engine never mutates
/// it.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    /// `None` for an anonymous viewer
    pub user_id: Option<UserId>,
    /// Public events starting at or after "now", in listing order
    pub upcoming_events: Vec<Event>,
    /// Events the viewer is already signed up for
    pub registered_event_ids: HashSet<EventId>,
    /// Attended events that started before "now"
    pub past_attended_events: Vec<PastAttendedEvent>,
    /// The viewer's ratings keyed by event id
    pub ratings: HashMap<EventId, UserEventRating>,
}

impl ViewerContext {
    /// Context for a known user with no history yet
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Context for a viewer without a profile
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, event_id: &str) -> bool {
        self.registered_event_ids.contains(event_id)
    }

    pub fn rating_of(&self, event_id: &str) -> Option<u8> {
        self.ratings.get(event_id).map(|r| r.rating)
    }
}
