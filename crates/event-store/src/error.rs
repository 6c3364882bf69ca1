//! Error types for the event-store crate.
//!
//! Loading a snapshot can fail on I/O, on malformed JSON, or on data that
//! references users or events the snapshot does not contain. Queries against
//! a built `EventIndex` never fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Snapshot file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read snapshot: {0}")]
    IoError(#[from] std::io::Error),

    /// `line` is the 1-based line reported by the JSON parser
    #[error("{file}:{line}: malformed record: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field outside its allowed range, such as a 9-star rating
    #[error("Out-of-range {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A registration or rating naming a user or event the snapshot lacks
    #[error("{entity} {id} is referenced but not defined")]
    MissingReference { entity: String, id: String },
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
