//! Core domain types for campus events.
//!
//! Everything here is a plain read-only record. `EventIndex` owns the records
//! and hands out snapshots (`RegisteredEvent`, `PastAttendedEvent`) that are
//! cloned per request so callers never hold borrows into the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Opaque, unique identifier for an event (as issued by the campus API)
pub type EventId = String;

/// Inclusive bounds of the star rating widget
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Event
// =============================================================================

/// A campus event.
///
/// Tags are an unordered set of case-sensitive labels, possibly empty.
/// `description`, `location` and `ends_at` are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

fn default_public() -> bool {
    true
}

impl Event {
    /// Create a public event with no tags
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, starts_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            starts_at,
            tags: BTreeSet::new(),
            is_public: true,
            description: None,
            location: None,
            ends_at: None,
        }
    }

    /// Replace the tag set (builder style)
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the event as hidden from the public listing
    pub fn hidden(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

// =============================================================================
// Registrations and Ratings
// =============================================================================

/// A user's sign-up for an event. One per (user, event) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user_id: UserId,
    pub event_id: EventId,
    pub registered_at: DateTime<Utc>,
    /// Set once attendance is confirmed
    #[serde(default)]
    pub attended: bool,
}

/// A user's star rating for an event they attended.
///
/// At most one per (user, event) pair; a newer rating overwrites the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventRating {
    pub user_id: UserId,
    pub event_id: EventId,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

/// An upcoming event the user has signed up for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredEvent {
    pub event: Event,
    pub registered_at: DateTime<Utc>,
}

/// An event the user registered for, attended, and which has already started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastAttendedEvent {
    pub event: Event,
    pub registered_at: DateTime<Utc>,
}

impl PastAttendedEvent {
    pub fn new(event: Event) -> Self {
        let registered_at = event.starts_at;
        Self {
            event,
            registered_at,
        }
    }
}

// =============================================================================
// EventIndex - the in-memory snapshot store
// =============================================================================

/// Holds every user, event, registration and rating of a snapshot, plus the
/// secondary indices needed to answer the per-user accessors quickly.
#[derive(Debug, Default)]
pub struct EventIndex {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) events: HashMap<EventId, Event>,

    /// Registrations made by each user, keyed by event
    pub(crate) user_registrations: HashMap<UserId, BTreeMap<EventId, Registration>>,
    /// Number of registrations each event received
    pub(crate) event_registration_counts: HashMap<EventId, usize>,

    /// Ratings made by each user, keyed by event
    pub(crate) user_ratings: HashMap<UserId, HashMap<EventId, UserEventRating>>,

    /// Event ids grouped by start instant, in insertion order within an instant
    pub(crate) start_index: BTreeMap<DateTime<Utc>, Vec<EventId>>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// All known user ids, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn get_event(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    /// The user's registration for an event, if any
    pub fn get_registration(&self, user_id: UserId, event_id: &str) -> Option<&Registration> {
        self.user_registrations.get(&user_id)?.get(event_id)
    }

    /// The user's rating for an event, if any
    pub fn get_rating(&self, user_id: UserId, event_id: &str) -> Option<&UserEventRating> {
        self.user_ratings.get(&user_id)?.get(event_id)
    }

    pub fn registration_count(&self, event_id: &str) -> usize {
        self.event_registration_counts
            .get(event_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert or replace an event and keep the start-time index current
    pub fn insert_event(&mut self, event: Event) {
        if let Some(previous) = self.events.get(&event.id) {
            let previous_start = previous.starts_at;
            if let Some(ids) = self.start_index.get_mut(&previous_start) {
                ids.retain(|id| id != &event.id);
                if ids.is_empty() {
                    self.start_index.remove(&previous_start);
                }
            }
        }
        self.start_index
            .entry(event.starts_at)
            .or_default()
            .push(event.id.clone());
        self.events.insert(event.id.clone(), event);
    }

    /// Insert a registration; a second one for the same pair replaces the first
    pub fn insert_registration(&mut self, registration: Registration) {
        let previous = self
            .user_registrations
            .entry(registration.user_id)
            .or_default()
            .insert(registration.event_id.clone(), registration.clone());

        if previous.is_none() {
            *self
                .event_registration_counts
                .entry(registration.event_id)
                .or_insert(0) += 1;
        }
    }

    /// Insert a rating; a second one for the same pair overwrites the first
    pub fn insert_rating(&mut self, rating: UserEventRating) {
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .insert(rating.event_id.clone(), rating);
    }

    /// (users, events, registrations, ratings)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let registrations = self.user_registrations.values().map(|r| r.len()).sum();
        let ratings = self.user_ratings.values().map(|r| r.len()).sum();
        (self.users.len(), self.events.len(), registrations, ratings)
    }
}
