//! Parser for snapshot files.
//!
//! Each file holds a JSON array of records:
//! - users.json: `[{ "id", "name", "email"? }]`
//! - events.json: `[{ "id", "title", "starts_at", "tags"?, "is_public"?, ... }]`
//! - registrations.json: `[{ "user_id", "event_id", "registered_at", "attended"? }]`
//! - ratings.json: `[{ "user_id", "event_id", "rating", "comment"? }]`
//!
//! Instants are RFC 3339 strings.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a JSON array of `T` from `path`
fn parse_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| DataLoadError::ParseError {
        file: file_label(path),
        line: e.line(),
        reason: e.to_string(),
    })
}

pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    parse_records(path)
}

pub fn parse_events(path: &Path) -> Result<Vec<Event>> {
    parse_records(path)
}

pub fn parse_registrations(path: &Path) -> Result<Vec<Registration>> {
    parse_records(path)
}

pub fn parse_ratings(path: &Path) -> Result<Vec<UserEventRating>> {
    parse_records(path)
}
