//! Integration tests for loading snapshots from disk.

use chrono::{TimeZone, Utc};
use event_store::{DataLoadError, EventIndex};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_snapshot(dir: &Path, ratings: &str) {
    fs::write(
        dir.join("users.json"),
        r#"[{"id": 1, "name": "Ada"}]"#,
    )
    .unwrap();
    fs::write(
        dir.join("events.json"),
        r#"[
            {"id": "a", "title": "AI Talk", "starts_at": "2024-01-10T18:00:00Z", "tags": ["ai"]},
            {"id": "b", "title": "Hack Night", "starts_at": "2024-03-10T18:00:00Z", "tags": ["ai", "hackathon"]}
        ]"#,
    )
    .unwrap();
    fs::write(
        dir.join("registrations.json"),
        r#"[{"user_id": 1, "event_id": "a", "registered_at": "2024-01-01T00:00:00Z", "attended": true}]"#,
    )
    .unwrap();
    fs::write(dir.join("ratings.json"), ratings).unwrap();
}

#[test]
fn test_load_from_dir() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path(), r#"[{"user_id": 1, "event_id": "a", "rating": 5}]"#);

    let index = EventIndex::load_from_dir(dir.path()).unwrap();
    assert_eq!(index.counts(), (1, 2, 1, 1));

    let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let history = index.past_attended_events(1, now);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event.id, "a");

    let upcoming = index.upcoming_public_events(now);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, "b");
}

#[test]
fn test_load_rejects_dangling_rating() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path(), r#"[{"user_id": 1, "event_id": "zzz", "rating": 4}]"#);

    let result = EventIndex::load_from_dir(dir.path());
    assert!(matches!(
        result,
        Err(DataLoadError::MissingReference { .. })
    ));
}

#[test]
fn test_load_missing_directory() {
    let result = EventIndex::load_from_dir(Path::new("/no/such/snapshot"));
    assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
}

#[test]
fn test_bundled_campus_snapshot() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/campus");

    if data_dir.exists() {
        let index = EventIndex::load_from_dir(&data_dir).unwrap();
        let (users, events, _, _) = index.counts();
        assert_eq!(users, 3);
        assert_eq!(events, 11);
    }
}
