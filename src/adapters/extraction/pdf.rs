use super::{non_blank, TextExtractor};
use crate::domain::{ExtractionError, RawReport};

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<RawReport, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(map_pdf_error)?;
        non_blank(text)
    }
}

/// Map pdf-extract errors, singling out encrypted documents
fn map_pdf_error(err: pdf_extract::OutputError) -> ExtractionError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    if lower.contains("password") || lower.contains("encrypt") {
        ExtractionError::Encrypted
    } else {
        ExtractionError::PdfParsing(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let result = PdfTextExtractor.extract(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn empty_input_fails() {
        assert!(PdfTextExtractor.extract(&[]).is_err());
    }
}
