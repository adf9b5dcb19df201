//! Error types for the Docket library.

use std::path::PathBuf;
use thiserror::Error;

use crate::job::JobId;

/// Main error type for Docket operations.
#[derive(Debug, Error)]
pub enum DocketError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference storage error.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A request was rejected before reaching any collaborator.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two entries in one job share a key.
    #[error("Duplicate entry key '{key}'")]
    DuplicateKey { key: String },

    /// The job is not part of the session's job list.
    #[error("Unknown job '{0}'")]
    UnknownJob(JobId),

    /// An operation needs an active job and none is selected.
    #[error("No active job")]
    NoActiveJob,

    /// The active job has only metadata so far.
    #[error("Entries for job '{0}' are not loaded")]
    EntriesNotLoaded(JobId),

    /// Entry index outside the loaded entry list.
    #[error("Entry index {index} out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Schema-level rejection of a field update.
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Export requested with nothing left to export.
    #[error("Nothing to export: every entry is filtered out or excluded")]
    EmptyExport,

    /// The rendering service did not produce a file.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// A remote collaborator reported a failure.
    #[error("{operation} failed: {message}")]
    Service { operation: String, message: String },
}

impl DocketError {
    /// Build a service error for the named operation.
    pub fn service(operation: impl Into<String>, message: impl Into<String>) -> Self {
        DocketError::Service {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Errors raised when writing a value into a named entry field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field name is not part of the tool's entry schema.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The value cannot be stored in the field.
    #[error("invalid value for '{field}': expected {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}

/// Result type alias for Docket operations.
pub type Result<T> = std::result::Result<T, DocketError>;
