//! Tunable thresholds and caps for the recommendation engine.
//!
//! Defaults match the dashboard's five-star widget: a rating of 4 or more is a
//! positive signal, at least 3 suggestions are shown and at most 5.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_POSITIVE_RATING_THRESHOLD: u8 = 4;
pub const DEFAULT_MINIMUM_RECOMMENDATIONS: usize = 3;
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// Engine configuration.
///
/// Any field missing from a TOML file falls back to its default:
///
/// ```toml
/// positive_rating_threshold = 4
/// minimum_recommendations = 3
/// max_recommendations = 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Lowest rating that counts as "liked"
    pub positive_rating_threshold: u8,
    /// Floor on list size (also the cold-start list size)
    pub minimum_recommendations: usize,
    /// Cap on the scored list
    pub max_recommendations: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            positive_rating_threshold: DEFAULT_POSITIVE_RATING_THRESHOLD,
            minimum_recommendations: DEFAULT_MINIMUM_RECOMMENDATIONS,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl RecommendationConfig {
    /// Load from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Configure the positive rating threshold (default: 4)
    pub fn with_positive_rating_threshold(mut self, threshold: u8) -> Self {
        self.positive_rating_threshold = threshold;
        self
    }

    /// Configure the minimum list size (default: 3)
    pub fn with_minimum_recommendations(mut self, minimum: usize) -> Self {
        self.minimum_recommendations = minimum;
        self
    }

    /// Configure the maximum scored list size (default: 5)
    pub fn with_max_recommendations(mut self, maximum: usize) -> Self {
        self.max_recommendations = maximum;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.minimum_recommendations > self.max_recommendations {
            return Err(ConfigError::InvalidBounds {
                minimum: self.minimum_recommendations,
                maximum: self.max_recommendations,
            });
        }
        Ok(())
    }
}
