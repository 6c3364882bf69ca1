//! Dashboard assembly for the campus events app.
//!
//! This crate contains the service that gathers everything the signed-in
//! dashboard shows: upcoming registrations, attended events still waiting
//! for a rating, and explained recommendations.

pub mod service;

pub use service::{Dashboard, DashboardRecommendation, DashboardService};
