//! Error types for the recommender crate.
//!
//! Producing recommendations never fails; only building a `Recommender` from
//! a bad configuration does.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The floor on list size exceeds the cap
    #[error("minimum_recommendations ({minimum}) exceeds max_recommendations ({maximum})")]
    InvalidBounds { minimum: usize, maximum: usize },

    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file was not valid TOML for `RecommendationConfig`
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
