//! Build a `ViewerContext` from an `EventIndex`.
//!
//! Gathers the four snapshots the engine consumes in one place so the engine
//! itself never touches the store.

use crate::types::ViewerContext;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use event_store::{EventIndex, UserId};
use tracing::debug;

/// Build the context for `user_id` as of `now`.
///
/// `None` yields an anonymous context holding only the upcoming events.
/// An id the store does not know is an error.
pub fn build_viewer_context(
    index: &EventIndex,
    user_id: Option<UserId>,
    now: DateTime<Utc>,
) -> Result<ViewerContext> {
    let mut context = ViewerContext::anonymous();
    context.upcoming_events = index.upcoming_public_events(now);

    let Some(user_id) = user_id else {
        return Ok(context);
    };

    index
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    context.user_id = Some(user_id);
    context.registered_event_ids = index
        .upcoming_registrations(user_id, now)
        .into_iter()
        .map(|registered| registered.event.id)
        .collect();
    context.past_attended_events = index.past_attended_events(user_id, now);
    context.ratings = index.ratings_for(user_id);

    debug!(
        user_id,
        upcoming = context.upcoming_events.len(),
        registered = context.registered_event_ids.len(),
        attended = context.past_attended_events.len(),
        rated = context.ratings.len(),
        "Built viewer context"
    );
    Ok(context)
}
