//! # Busy Bee Export
//!
//! Writes a finished analysis to disk as CSV, JSON or a paginated Markdown
//! report, plus the related-keyword projection for keyword analyses.

pub mod csv_export;
pub mod document;
pub mod error;
pub mod filename;
pub mod json;

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use busybee_core::AnalysisResult;
use tracing::info;

pub use error::{ExportError, ExportResult};
pub use filename::{export_filename, sanitize};

const RELATED_KEYWORDS_STEM: &str = "busy-bee-related-keywords";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Document,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Json, Self::Document];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Document => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Document => write!(f, "doc"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "doc" | "document" | "md" | "pdf" => Ok(Self::Document),
            other => Err(ExportError::Unsupported(other.to_string())),
        }
    }
}

/// Write `result` in `format` into `dir`, returning the path written.
pub fn export(result: &AnalysisResult, format: ExportFormat, dir: &Path) -> ExportResult<PathBuf> {
    if result.is_empty() {
        return Err(ExportError::EmptyResult);
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(result, format.extension()));

    match format {
        ExportFormat::Csv => csv_export::write_csv(result, BufWriter::new(File::create(&path)?))?,
        ExportFormat::Json => fs::write(&path, json::to_json(result)?)?,
        ExportFormat::Document => {
            let today = chrono::Local::now().date_naive();
            fs::write(&path, document::render_document(result, today))?
        }
    }

    info!(kind = %result.kind(), format = %format, path = %path.display(), "Exported analysis");
    Ok(path)
}

/// Write the `(keyword, related keywords)` projection of a keyword analysis.
///
/// Only CSV and JSON are available for the projection.
pub fn export_related_keywords(
    result: &AnalysisResult,
    format: ExportFormat,
    dir: &Path,
) -> ExportResult<PathBuf> {
    let records = match result {
        AnalysisResult::Keyword(records) => records,
        other => return Err(ExportError::NotKeyword(other.kind())),
    };
    if records.is_empty() {
        return Err(ExportError::EmptyResult);
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", RELATED_KEYWORDS_STEM, format.extension()));

    match format {
        ExportFormat::Csv => {
            csv_export::write_related_keywords_csv(records, BufWriter::new(File::create(&path)?))?
        }
        ExportFormat::Json => fs::write(&path, json::related_keywords_json(records)?)?,
        ExportFormat::Document => return Err(ExportError::Unsupported(format.to_string())),
    }

    info!(format = %format, path = %path.display(), "Exported related keywords");
    Ok(path)
}
