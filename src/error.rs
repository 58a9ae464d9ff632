//! Error types for plan editing and persistence.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Rejections raised by plan and session operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A date range whose end precedes its start.
    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// A new segment would exceed the per-day concurrency ceiling.
    #[error("At most {limit} segments may overlap on one day ({date} already has {count})")]
    OverlapLimit {
        date: NaiveDate,
        count: usize,
        limit: usize,
    },
    /// Progress marking was attempted without a selected segment.
    #[error("Select a segment before marking progress")]
    NoProgressSegment,
    /// Progress date outside the selected segment.
    #[error("{date} is outside the selected segment ({start} to {end})")]
    OutsideSegment {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Effort input that does not parse as a number.
    #[error("'{input}' is not a number")]
    InvalidValue { input: String },
    /// Holiday list entry that is not an ISO date.
    #[error("Invalid holiday date '{input}'")]
    InvalidHoliday { input: String },
    /// A stored or imported segment whose dates contradict each other.
    #[error("Segment '{id}' is malformed: {reason}")]
    MalformedSegment { id: String, reason: String },
}

/// Failures reading or writing plans.
#[derive(Error, Debug)]
pub enum StorageError {
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Parsed, but the plan breaks a model rule.
    #[error("Invalid plan: {source}")]
    InvalidPlan {
        #[from]
        source: PlanError,
    },
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    /// No platform data directory could be resolved.
    #[error("No storage directory available")]
    NoDataDir,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::FileSystem {
            path: path.into(),
            source,
        }
    }
}
