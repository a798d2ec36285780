//! Export error types.

use busybee_core::AnalysisKind;
use thiserror::Error;

/// Errors raised while writing an export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the analysis has no records")]
    EmptyResult,

    #[error("Unsupported export format: {0}")]
    Unsupported(String),

    #[error("Related keywords can only be exported from a keyword analysis, not a {0} analysis")]
    NotKeyword(AnalysisKind),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
