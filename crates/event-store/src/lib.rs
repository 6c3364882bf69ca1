//! # Event Store Crate
//!
//! Read-only, in-memory snapshot of campus events, users, registrations and
//! ratings.
//!
//! ## Main Components
//!
//! - **types**: Domain types (User, Event, Registration, UserEventRating, EventIndex)
//! - **parser**: Parse JSON snapshot files into Rust structs
//! - **index**: Load and validate a snapshot, answer per-user queries
//! - **error**: Error types for snapshot loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use event_store::EventIndex;
//! use std::path::Path;
//!
//! let index = EventIndex::load_from_dir(Path::new("data/campus"))?;
//! let now = chrono::Utc::now();
//!
//! let upcoming = index.upcoming_public_events(now);
//! let history = index.past_attended_events(1, now);
//! let ratings = index.ratings_for(1);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    EventId,
    // Core types
    User,
    Event,
    Registration,
    UserEventRating,
    RegisteredEvent,
    PastAttendedEvent,
    EventIndex,
    // Rating bounds
    MIN_RATING,
    MAX_RATING,
};
