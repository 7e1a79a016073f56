//! Domain errors for report triage.

use thiserror::Error;

/// Errors raised while reading report input.
///
/// Only these reach the caller; service and response-format failures are
/// absorbed into fallback analyses.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{source_name}: Invalid JSON format")]
    InvalidJson {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{source_name}: {reason}")]
    MalformedInput { source_name: String, reason: String },

    #[error("{source_name} - {entry}: Missing required field '{field}'")]
    MissingField {
        source_name: String,
        entry: String,
        field: String,
    },

    #[error("{source_name} - {entry}: {reason}")]
    InvalidEntry {
        source_name: String,
        entry: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;
