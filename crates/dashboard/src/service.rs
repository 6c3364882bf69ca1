//! # Dashboard Service
//!
//! Coordinates one dashboard load:
//! 1. Build the viewer context from the event store
//! 2. Run the recommendation engine
//! 3. Collect upcoming registrations and attended events awaiting a rating
//! 4. Attach a human-readable explanation to every recommendation
//!
//! The work is CPU-bound and synchronous, so the async entry point moves it
//! onto Tokio's blocking pool.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use event_store::{EventId, EventIndex, PastAttendedEvent, RegisteredEvent, UserId};
use recommender::{
    build_viewer_context, RecommendationConfig, RecommendationSource, RecommendedEvent,
    Recommender,
};

/// A recommendation as the dashboard presents it
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRecommendation {
    pub event_id: EventId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub score: u32,
    pub source: RecommendationSource,
    pub explanation: String,
}

/// Everything shown on one user's dashboard
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user_id: Option<UserId>,
    pub generated_at: DateTime<Utc>,
    pub upcoming_registrations: Vec<RegisteredEvent>,
    /// Attended events the user has not rated yet, most recent first
    pub awaiting_rating: Vec<PastAttendedEvent>,
    pub recommendations: Vec<DashboardRecommendation>,
}

#[derive(Clone)]
pub struct DashboardService {
    index: Arc<EventIndex>,
    recommender: Arc<Recommender>,
}

impl DashboardService {
    pub fn new(index: Arc<EventIndex>, config: RecommendationConfig) -> Result<Self> {
        let recommender = Recommender::new(config).context("Invalid recommendation config")?;
        Ok(Self {
            index,
            recommender: Arc::new(recommender),
        })
    }

    pub fn index(&self) -> &EventIndex {
        &self.index
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Load the dashboard for `user_id` (or an anonymous viewer) as of `now`
    pub async fn load(&self, user_id: Option<UserId>, now: DateTime<Utc>) -> Result<Dashboard> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.load_blocking(user_id, now))
            .await
            .context("Dashboard task panicked")?
    }

    /// Synchronous core of [`DashboardService::load`]
    pub fn load_blocking(&self, user_id: Option<UserId>, now: DateTime<Utc>) -> Result<Dashboard> {
        let start_time = Instant::now();

        let context = build_viewer_context(&self.index, user_id, now)
            .context("Failed to build viewer context")?;

        let recommendations: Vec<DashboardRecommendation> = self
            .recommender
            .recommend(&context)
            .into_iter()
            .map(present)
            .collect();

        let (upcoming_registrations, awaiting_rating) = match user_id {
            Some(user_id) => (
                self.index.upcoming_registrations(user_id, now),
                context
                    .past_attended_events
                    .iter()
                    .filter(|past| !context.ratings.contains_key(&past.event.id))
                    .cloned()
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        info!(
            user_id = ?user_id,
            registrations = upcoming_registrations.len(),
            awaiting_rating = awaiting_rating.len(),
            recommendations = recommendations.len(),
            "Dashboard loaded in {:.2?}",
            start_time.elapsed()
        );

        Ok(Dashboard {
            user_id,
            generated_at: now,
            upcoming_registrations,
            awaiting_rating,
            recommendations,
        })
    }
}

fn present(rec: RecommendedEvent) -> DashboardRecommendation {
    let explanation = explain(&rec);
    DashboardRecommendation {
        event_id: rec.event.id,
        title: rec.event.title,
        starts_at: rec.event.starts_at,
        location: rec.event.location,
        tags: rec.event.tags.into_iter().collect(),
        score: rec.score,
        source: rec.source,
        explanation,
    }
}

/// Scored entries name the tags that matched; the rest get a generic line
fn explain(rec: &RecommendedEvent) -> String {
    match rec.source {
        RecommendationSource::Scored => format!(
            "Because you enjoyed events tagged {} (score {})",
            rec.matched_tags.join(", "),
            rec.score
        ),
        RecommendationSource::ColdStart | RecommendationSource::Backfill => {
            "Coming up soon on campus".to_string()
        }
    }
}
