//! Integration tests for the recommendation engine.
//!
//! The first group walks the dashboard scenarios end to end; the second
//! checks list-level guarantees (exclusion, cold start, ordering, size,
//! uniqueness) over a range of hand-built contexts.

use chrono::{DateTime, Duration, TimeZone, Utc};
use event_store::{Event, EventIndex, PastAttendedEvent, Registration, User, UserEventRating};
use recommender::{
    build_viewer_context, RecommendationConfig, RecommendationSource, RecommendedEvent,
    Recommender, ViewerContext,
};
use std::collections::HashSet;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
}

fn event(id: &str, tags: &[&str]) -> Event {
    Event::new(id, format!("Event {id}"), now() + Duration::days(1)).with_tags(tags.iter().copied())
}

fn rate(context: &mut ViewerContext, id: &str, tags: &[&str], rating: u8) {
    context
        .past_attended_events
        .push(PastAttendedEvent::new(
            Event::new(id, id, now() - Duration::days(30)).with_tags(tags.iter().copied()),
        ));
    context.ratings.insert(
        id.to_string(),
        UserEventRating {
            user_id: 1,
            event_id: id.to_string(),
            rating,
            comment: None,
        },
    );
}

fn ids(recommendations: &[RecommendedEvent]) -> Vec<&str> {
    recommendations.iter().map(|r| r.event_id()).collect()
}

/// Past: A tagged ai/workshop. Upcoming: X (ai), Y (robotics), Z (workshop, ai).
fn workshop_scenario(rating: u8) -> ViewerContext {
    let mut context = ViewerContext::new(1);
    rate(&mut context, "A", &["ai", "workshop"], rating);
    context.upcoming_events = vec![
        event("X", &["ai"]),
        event("Y", &["robotics"]),
        event("Z", &["workshop", "ai"]),
    ];
    context
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_liked_workshop_ranks_overlap_then_backfills() {
    let recs = Recommender::default().recommend(&workshop_scenario(5));

    assert_eq!(ids(&recs), vec!["Z", "X", "Y"]);
    assert_eq!(recs[0].score, 2);
    assert_eq!(recs[1].score, 1);
    assert_eq!(recs[2].score, 0);
    assert_eq!(recs[2].source, RecommendationSource::Backfill);
}

#[test]
fn test_below_threshold_rating_falls_back_to_listing_order() {
    let recs = Recommender::default().recommend(&workshop_scenario(3));

    assert_eq!(ids(&recs), vec!["X", "Y", "Z"]);
    assert!(recs.iter().all(|r| r.source == RecommendationSource::ColdStart));
}

#[test]
fn test_registered_top_pick_is_excluded() {
    let mut context = workshop_scenario(5);
    context.registered_event_ids.insert("Z".to_string());

    let recs = Recommender::default().recommend(&context);

    assert_eq!(ids(&recs), vec!["X", "Y"]);
    assert_eq!(recs[0].source, RecommendationSource::Scored);
}

#[test]
fn test_threshold_is_configurable() {
    let config = RecommendationConfig::default().with_positive_rating_threshold(3);
    let recs = Recommender::new(config).unwrap().recommend(&workshop_scenario(3));

    assert_eq!(ids(&recs), vec!["Z", "X", "Y"]);
    assert_eq!(recs[0].source, RecommendationSource::Scored);
}

// =============================================================================
// Edge policies
// =============================================================================

#[test]
fn test_no_upcoming_events() {
    let mut context = workshop_scenario(5);
    context.upcoming_events.clear();

    assert!(Recommender::default().recommend(&context).is_empty());
}

#[test]
fn test_everything_already_registered() {
    let mut context = workshop_scenario(5);
    for id in ["X", "Y", "Z"] {
        context.registered_event_ids.insert(id.to_string());
    }

    assert!(Recommender::default().recommend(&context).is_empty());
}

#[test]
fn test_tagless_event_only_via_backfill() {
    let mut context = ViewerContext::new(1);
    rate(&mut context, "A", &["ai"], 5);
    context.upcoming_events = vec![
        event("plain", &[]),
        event("ai-1", &["ai"]),
        event("ai-2", &["ai"]),
        event("ai-3", &["ai"]),
    ];

    let recs = Recommender::default().recommend(&context);
    assert_eq!(ids(&recs), vec!["ai-1", "ai-2", "ai-3"]);
}

#[test]
fn test_duplicate_upcoming_ids_keep_first() {
    let mut context = ViewerContext::new(1);
    rate(&mut context, "A", &["ai"], 5);
    let mut shadow = event("X", &["ai", "workshop"]);
    shadow.title = "Shadow X".to_string();
    context.upcoming_events = vec![event("X", &["ai"]), shadow, event("Y", &["arts"])];

    let recs = Recommender::default().recommend(&context);

    assert_eq!(ids(&recs), vec!["X", "Y"]);
    assert_eq!(recs[0].event.title, "Event X");
}

#[test]
fn test_same_context_same_output() {
    let context = workshop_scenario(5);
    let recommender = Recommender::default();

    assert_eq!(
        ids(&recommender.recommend(&context)),
        ids(&recommender.recommend(&context))
    );
}

// =============================================================================
// List-level guarantees
// =============================================================================

/// A spread of contexts: varying history, registrations and listing sizes
fn sample_contexts() -> Vec<ViewerContext> {
    let tag_pool = ["ai", "workshop", "robotics", "career", "arts"];
    let mut contexts = Vec::new();

    for size in 0..9usize {
        for liked in 0..4usize {
            let mut context = ViewerContext::new(1);
            for l in 0..liked {
                rate(&mut context, &format!("past-{l}"), &[tag_pool[l % tag_pool.len()]], 4 + (l % 2) as u8);
            }
            context.upcoming_events = (0..size)
                .map(|i| event(&format!("u{i}"), &[tag_pool[(i * 3) % tag_pool.len()]]))
                .collect();
            if size > 2 {
                context.registered_event_ids.insert("u1".to_string());
            }
            contexts.push(context);
        }
    }
    contexts
}

#[test]
fn test_registered_events_never_recommended() {
    let recommender = Recommender::default();
    for context in sample_contexts() {
        for rec in recommender.recommend(&context) {
            assert!(!context.registered_event_ids.contains(rec.event_id()));
        }
    }
}

#[test]
fn test_cold_start_is_listing_prefix() {
    let recommender = Recommender::default();
    for mut context in sample_contexts() {
        context.ratings.clear();
        let expected: Vec<String> = context
            .upcoming_events
            .iter()
            .filter(|e| !context.registered_event_ids.contains(&e.id))
            .take(3)
            .map(|e| e.id.clone())
            .collect();

        let recs = recommender.recommend(&context);
        assert_eq!(ids(&recs), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

#[test]
fn test_extra_liked_event_never_lowers_score() {
    let recommender = Recommender::default();
    let mut context = workshop_scenario(5);
    let before = recommender.recommend(&context);
    let score_of = |recs: &[RecommendedEvent], id: &str| {
        recs.iter().find(|r| r.event_id() == id).map(|r| r.score).unwrap_or(0)
    };

    rate(&mut context, "B", &["ai"], 4);
    let after = recommender.recommend(&context);

    for id in ["X", "Z"] {
        assert!(score_of(&after, id) >= score_of(&before, id));
    }
    assert_eq!(score_of(&after, "X"), 2);
    assert_eq!(score_of(&after, "Z"), 3);
}

#[test]
fn test_equal_scores_keep_listing_order() {
    let mut context = ViewerContext::new(1);
    rate(&mut context, "A", &["ai"], 5);
    rate(&mut context, "B", &["arts"], 5);
    context.upcoming_events = vec![
        event("arts-1", &["arts"]),
        event("ai-1", &["ai"]),
        event("both", &["ai", "arts"]),
        event("arts-2", &["arts"]),
        event("ai-2", &["ai"]),
    ];

    let recs = Recommender::default().recommend(&context);
    assert_eq!(ids(&recs), vec!["both", "arts-1", "ai-1", "arts-2", "ai-2"]);
}

#[test]
fn test_size_bounds() {
    let recommender = Recommender::default();
    let config = recommender.config();

    for context in sample_contexts() {
        let available = context
            .upcoming_events
            .iter()
            .filter(|e| !context.registered_event_ids.contains(&e.id))
            .count();
        let recs = recommender.recommend(&context);

        assert!(recs.len() <= config.max_recommendations);
        if available >= config.minimum_recommendations {
            assert!(recs.len() >= config.minimum_recommendations);
        } else {
            assert_eq!(recs.len(), available);
        }
    }
}

#[test]
fn test_no_duplicates() {
    let recommender = Recommender::default();
    for mut context in sample_contexts() {
        let copies: Vec<Event> = context.upcoming_events.clone();
        context.upcoming_events.extend(copies);

        let recs = recommender.recommend(&context);
        let unique: HashSet<&str> = recs.iter().map(|r| r.event_id()).collect();
        assert_eq!(unique.len(), recs.len());
    }
}

// =============================================================================
// From the store
// =============================================================================

#[test]
fn test_recommend_from_event_index() {
    let mut index = EventIndex::new();
    index.insert_user(User {
        id: 1,
        name: "Ada".to_string(),
        email: None,
    });
    index.insert_event(Event::new("A", "ML Intro", now() - Duration::days(20)).with_tags(["ai", "workshop"]));
    index.insert_event(Event::new("X", "Hack Night", now() + Duration::days(1)).with_tags(["ai"]));
    index.insert_event(Event::new("Y", "Robot Soccer", now() + Duration::days(2)).with_tags(["robotics"]));
    index.insert_event(Event::new("Z", "CV Workshop", now() + Duration::days(3)).with_tags(["workshop", "ai"]));
    index.insert_event(Event::new("H", "Staff AI Sync", now() + Duration::days(4)).with_tags(["ai"]).hidden());

    index.insert_registration(Registration {
        user_id: 1,
        event_id: "A".to_string(),
        registered_at: now() - Duration::days(25),
        attended: true,
    });
    index.insert_rating(UserEventRating {
        user_id: 1,
        event_id: "A".to_string(),
        rating: 5,
        comment: Some("More please".to_string()),
    });

    let context = build_viewer_context(&index, Some(1), now()).unwrap();
    let recs = Recommender::default().recommend(&context);

    assert_eq!(ids(&recs), vec!["Z", "X", "Y"]);
}
