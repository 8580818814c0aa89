//! Report text extraction
//!
//! Turns input files into [`RawReport`]s. PDFs go through `pdf-extract`;
//! plain-text files are read as UTF-8. Scanned (image-only) PDFs are not
//! OCR'd and fail with [`ExtractionError::NoText`].

pub mod pdf;
pub mod text;

pub use pdf::PdfTextExtractor;
pub use text::PlainTextExtractor;

use crate::domain::{ExtractionError, RawReport};
use std::path::Path;

/// Converts raw file bytes into report text
pub trait TextExtractor: Send + Sync {
    /// Extractor identifier, used in logs
    fn name(&self) -> &str;

    /// Extract the text content of `bytes`
    fn extract(&self, bytes: &[u8]) -> Result<RawReport, ExtractionError>;
}

/// Pick the extractor for a path by its extension
pub fn extractor_for(path: &Path) -> Result<Box<dyn TextExtractor>, ExtractionError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(Box::new(PdfTextExtractor)),
        "txt" | "text" | "md" => Ok(Box::new(PlainTextExtractor)),
        "" => Err(ExtractionError::UnsupportedFormat(format!(
            "{} has no file extension",
            path.display()
        ))),
        other => Err(ExtractionError::UnsupportedFormat(format!(
            ".{other} ({})",
            path.display()
        ))),
    }
}

/// Read and extract a report from disk
pub fn extract_file(path: &Path) -> Result<RawReport, ExtractionError> {
    let extractor = extractor_for(path)?;
    let bytes = std::fs::read(path)
        .map_err(|e| ExtractionError::Io(format!("{}: {e}", path.display())))?;

    let report = extractor.extract(&bytes)?;
    tracing::debug!(
        extractor = extractor.name(),
        bytes = bytes.len(),
        chars = report.as_str().chars().count(),
        "Extracted report text"
    );
    Ok(report)
}

/// Reject blank extraction output
fn non_blank(text: String) -> Result<RawReport, ExtractionError> {
    let report = RawReport::new(text);
    if report.is_blank() {
        return Err(ExtractionError::NoText);
    }
    Ok(report)
}
