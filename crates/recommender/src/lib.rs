//! Personalized event recommendations.
//!
//! This crate provides:
//! - ViewerContext and the builder that fills it from an `EventIndex`
//! - TagPreferences derived from positively-rated attended events
//! - Filter trait, implementations, and FilterPipeline for composing them
//! - TagScorer for tag-overlap scoring
//! - Recommender, which ties it together with cold-start and backfill rules
//!
//! ## Example Usage
//! ```ignore
//! use recommender::{build_viewer_context, RecommendationConfig, Recommender};
//!
//! let recommender = Recommender::new(RecommendationConfig::default())?;
//! let context = build_viewer_context(&index, Some(user_id), now)?;
//! for rec in recommender.recommend(&context) {
//!     println!("{} ({})", rec.event.title, rec.score);
//! }
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod preferences;
pub mod scoring;
pub mod traits;
pub mod types;

pub use config::RecommendationConfig;
pub use context::build_viewer_context;
pub use engine::Recommender;
pub use error::ConfigError;
pub use filter_pipeline::FilterPipeline;
pub use preferences::TagPreferences;
pub use scoring::TagScorer;
pub use traits::Filter;
pub use types::{RecommendationSource, RecommendedEvent, ViewerContext};
