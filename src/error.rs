//! Error types for the covid-features library.

use std::path::Path;
use thiserror::Error;

/// Result type alias for feature-engineering operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while reshaping, enriching or persisting case data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Required columns are absent from a table header.
    #[error("missing columns: expected {expected:?}, found {found:?}")]
    MissingColumns {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A date column header or date field could not be parsed.
    #[error("malformed date in column '{column}': '{value}'")]
    MalformedDate { column: String, value: String },

    /// A cell holds a value that does not fit the column type.
    #[error("invalid value in row {row}, column '{column}': '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// The same (region, date) pair appears more than once.
    #[error("duplicate record for region {region} on {date}")]
    DuplicateRecord { region: String, date: String },

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A region group is shorter than an algorithm's window.
    #[error("insufficient history for group {group}: need at least {needed}, got {got}")]
    InsufficientHistory {
        group: String,
        needed: usize,
        got: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A row identity does not address a row of the table.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A derived column carries two values for the same row.
    #[error("duplicate row identity {0} in derived column")]
    DuplicateRowIdentity(usize),

    /// Merge output does not have one row per input row.
    #[error("row count mismatch: expected {expected}, got {got}")]
    RowCountMismatch { expected: usize, got: usize },

    /// File system failure at the pipeline boundary.
    #[error("i/o error on {path}: {message}")]
    Io { path: String, message: String },

    /// Delimited-text encoding or decoding failure.
    #[error("csv error: {0}")]
    Csv(String),

    /// The raw dataset could not be obtained.
    #[error("dataset unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },

    /// The raw dataset is older than the accepted age.
    #[error("dataset at {path} is stale: {age_secs}s old, limit {max_age_secs}s")]
    Stale {
        path: String,
        age_secs: u64,
        max_age_secs: u64,
    },
}

impl FeatureError {
    /// Build an I/O error tagged with the path that failed.
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        FeatureError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the condition is contained at a component boundary.
    ///
    /// Insufficient history is surfaced as nulls plus a warning; everything
    /// else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FeatureError::InsufficientData { .. } | FeatureError::InsufficientHistory { .. }
        )
    }
}

impl From<csv::Error> for FeatureError {
    fn from(err: csv::Error) -> Self {
        FeatureError::Csv(err.to_string())
    }
}
