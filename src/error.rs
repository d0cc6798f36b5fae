//! Error types for boris-restore

use thiserror::Error;

/// Errors that can occur while rebuilding a project from a CSV export
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Failed to read CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("CSV export contains no data rows")]
    EmptyInput,

    #[error(
        "Could not detect CSV export format: expected a standard export \
         ('Time' and 'Behavior type' columns) or an aggregated export \
         ('Start (s)' and 'Stop (s)' columns)"
    )]
    UnknownFormat,

    #[error("Missing expected column in CSV: {0}")]
    MissingColumn(String),

    #[error("Invalid numeric value: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
