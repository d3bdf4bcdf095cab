use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by loading and analysing a draw history.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("draw history file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column `{column}` not present in header of {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// `row` is 1-based and counts data rows only (the header is not row 1).
    #[error("malformed row {row}: `{value}` ({reason})")]
    MalformedRow {
        row: usize,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no draws to analyse")]
    NoDraws,
}

pub type Result<T> = core::result::Result<T, AnalysisError>;
