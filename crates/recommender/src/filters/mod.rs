//! Filter implementations for the candidate pipeline.

pub mod already_registered;
pub mod duplicate_event;
pub mod minimum_score;

pub use already_registered::AlreadyRegisteredFilter;
pub use duplicate_event::DuplicateEventFilter;
pub use minimum_score::MinimumScoreFilter;
