#![allow(dead_code)]

use chrono::NaiveDate;
use lane_planner::io::FileStore;
use lane_planner::session::Session;
use tempfile::TempDir;

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid ISO date")
}

/// Session backed by a file store in a fresh temporary directory.
pub fn file_session(today: &str) -> (TempDir, Session) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let session = reopen(&temp_dir, today);
    (temp_dir, session)
}

/// Open a new session over the store in `dir`, as a restart would.
pub fn reopen(dir: &TempDir, today: &str) -> Session {
    let store = lane_planner::io::open_store(Some(dir.path().join("data")));
    Session::open(store, date(today))
}

pub fn slot_file(dir: &TempDir) -> std::path::PathBuf {
    FileStore::new(dir.path().join("data")).slot_path()
}
