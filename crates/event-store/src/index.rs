//! Loading an `EventIndex` from disk and answering the per-user queries the
//! recommendation engine consumes.
//!
//! All time-relative queries take the reference instant from the caller so
//! the results are deterministic.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

impl EventIndex {
    /// Load a full snapshot from a directory containing `users.json`,
    /// `events.json`, `registrations.json` and `ratings.json`.
    ///
    /// The four files are parsed in parallel, inserted, then validated.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading event snapshot from {:?}", data_dir);

        let users_path = data_dir.join("users.json");
        let events_path = data_dir.join("events.json");
        let registrations_path = data_dir.join("registrations.json");
        let ratings_path = data_dir.join("ratings.json");

        let ((users, events), (registrations, ratings)) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_users(&users_path),
                    || parser::parse_events(&events_path),
                )
            },
            || {
                rayon::join(
                    || parser::parse_registrations(&registrations_path),
                    || parser::parse_ratings(&ratings_path),
                )
            },
        );

        let users = users?;
        let events = events?;
        let registrations = registrations?;
        let ratings = ratings?;

        info!(
            "Loaded {} users, {} events, {} registrations, {} ratings",
            users.len(),
            events.len(),
            registrations.len(),
            ratings.len()
        );

        let mut index = EventIndex::new();
        for user in users {
            index.insert_user(user);
        }
        for event in events {
            index.insert_event(event);
        }
        for registration in registrations {
            index.insert_registration(registration);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }

        index.validate()?;

        debug!("EventIndex built and validated");
        Ok(index)
    }

    /// Check referential integrity and rating bounds.
    ///
    /// Every registration and rating must point at a known user and event,
    /// and every rating must lie within `MIN_RATING..=MAX_RATING`.
    pub fn validate(&self) -> Result<()> {
        for (user_id, registrations) in &self.user_registrations {
            self.require_user(*user_id)?;
            for event_id in registrations.keys() {
                self.require_event(event_id)?;
            }
        }

        for (user_id, ratings) in &self.user_ratings {
            self.require_user(*user_id)?;
            for rating in ratings.values() {
                self.require_event(&rating.event_id)?;
                if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.rating.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn require_user(&self, user_id: UserId) -> Result<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(DataLoadError::MissingReference {
                entity: "User".to_string(),
                id: user_id.to_string(),
            })
        }
    }

    fn require_event(&self, event_id: &str) -> Result<()> {
        if self.events.contains_key(event_id) {
            Ok(())
        } else {
            Err(DataLoadError::MissingReference {
                entity: "Event".to_string(),
                id: event_id.to_string(),
            })
        }
    }

    /// Every event ordered by start time
    pub fn all_events(&self) -> Vec<&Event> {
        self.start_index
            .values()
            .flatten()
            .filter_map(|id| self.events.get(id))
            .collect()
    }

    /// Public events starting at or after `now`, ordered by start time.
    ///
    /// Events sharing a start instant keep their insertion order.
    pub fn upcoming_public_events(&self, now: DateTime<Utc>) -> Vec<Event> {
        self.start_index
            .range(now..)
            .flat_map(|(_, ids)| ids)
            .filter_map(|id| self.events.get(id))
            .filter(|event| event.is_public)
            .cloned()
            .collect()
    }

    /// The user's registrations for events starting at or after `now`,
    /// ordered by start time
    pub fn upcoming_registrations(&self, user_id: UserId, now: DateTime<Utc>) -> Vec<RegisteredEvent> {
        let mut registered: Vec<RegisteredEvent> = self
            .registrations_with_events(user_id)
            .filter(|(_, event)| event.starts_at >= now)
            .map(|(registration, event)| RegisteredEvent {
                event: event.clone(),
                registered_at: registration.registered_at,
            })
            .collect();

        registered.sort_by(|a, b| a.event.starts_at.cmp(&b.event.starts_at));
        registered
    }

    /// Events the user registered for, attended, and which started before
    /// `now`, most recent first
    pub fn past_attended_events(&self, user_id: UserId, now: DateTime<Utc>) -> Vec<PastAttendedEvent> {
        let mut attended: Vec<PastAttendedEvent> = self
            .registrations_with_events(user_id)
            .filter(|(registration, event)| registration.attended && event.starts_at < now)
            .map(|(registration, event)| PastAttendedEvent {
                event: event.clone(),
                registered_at: registration.registered_at,
            })
            .collect();

        attended.sort_by(|a, b| b.event.starts_at.cmp(&a.event.starts_at));
        attended
    }

    /// The user's ratings keyed by event id
    pub fn ratings_for(&self, user_id: UserId) -> HashMap<EventId, UserEventRating> {
        self.user_ratings.get(&user_id).cloned().unwrap_or_default()
    }

    fn registrations_with_events(
        &self,
        user_id: UserId,
    ) -> impl Iterator<Item = (&Registration, &Event)> {
        self.user_registrations
            .get(&user_id)
            .into_iter()
            .flat_map(|registrations| registrations.values())
            .filter_map(|registration| {
                self.events
                    .get(&registration.event_id)
                    .map(|event| (registration, event))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn create_test_index() -> EventIndex {
        let mut index = EventIndex::new();
        index.insert_user(User {
            id: 1,
            name: "Ada".to_string(),
            email: None,
        });

        index.insert_event(Event::new("past", "Past Talk", now() - Duration::days(3)).with_tags(["ai"]));
        index.insert_event(Event::new("later", "Later Fair", now() + Duration::days(5)));
        index.insert_event(Event::new("soon", "Soon Meetup", now() + Duration::days(1)));
        index.insert_event(Event::new("secret", "Staff Only", now() + Duration::days(2)).hidden());
        index.insert_event(Event::new("exactly-now", "Starting Now", now()));

        index.insert_registration(Registration {
            user_id: 1,
            event_id: "past".to_string(),
            registered_at: now() - Duration::days(10),
            attended: true,
        });
        index.insert_registration(Registration {
            user_id: 1,
            event_id: "later".to_string(),
            registered_at: now() - Duration::days(1),
            attended: false,
        });
        index
    }

    #[test]
    fn test_upcoming_public_events_ordered_and_visible_only() {
        let index = create_test_index();
        let ids: Vec<String> = index
            .upcoming_public_events(now())
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, vec!["exactly-now", "soon", "later"]);
    }

    #[test]
    fn test_upcoming_registrations() {
        let index = create_test_index();
        let registered = index.upcoming_registrations(1, now());

        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].event.id, "later");
    }

    #[test]
    fn test_past_attended_requires_attendance() {
        let mut index = create_test_index();
        assert_eq!(index.past_attended_events(1, now()).len(), 1);

        index.insert_registration(Registration {
            user_id: 1,
            event_id: "past".to_string(),
            registered_at: now() - Duration::days(10),
            attended: false,
        });
        assert!(index.past_attended_events(1, now()).is_empty());
    }

    #[test]
    fn test_validate_rejects_unknown_event() {
        let mut index = create_test_index();
        index.insert_rating(UserEventRating {
            user_id: 1,
            event_id: "nope".to_string(),
            rating: 5,
            comment: None,
        });

        let err = index.validate().unwrap_err();
        assert!(matches!(err, DataLoadError::MissingReference { .. }));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let mut index = create_test_index();
        index.insert_rating(UserEventRating {
            user_id: 1,
            event_id: "past".to_string(),
            rating: 9,
            comment: None,
        });

        assert!(matches!(
            index.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_user_queries_are_empty() {
        let index = create_test_index();
        assert!(index.upcoming_registrations(42, now()).is_empty());
        assert!(index.past_attended_events(42, now()).is_empty());
        assert!(index.ratings_for(42).is_empty());
    }
}
