use super::{non_blank, TextExtractor};
use crate::domain::{ExtractionError, RawReport};

/// UTF-8 plain-text extractor
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "text"
    }

    fn extract(&self, bytes: &[u8]) -> Result<RawReport, ExtractionError> {
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractionError::Encoding(e.to_string()))?;
        non_blank(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_utf8() {
        let report = PlainTextExtractor.extract("Zoë, 12 yrs".as_bytes()).unwrap();
        assert_eq!(report.as_str(), "Zoë, 12 yrs");
    }

    #[test]
    fn strips_byte_order_mark() {
        let report = PlainTextExtractor
            .extract("\u{feff}Rx: rest".as_bytes())
            .unwrap();
        assert_eq!(report.as_str(), "Rx: rest");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let result = PlainTextExtractor.extract(&[0xff, 0xfe, 0x41]);
        assert!(matches!(result, Err(ExtractionError::Encoding(_))));
    }

    #[test]
    fn rejects_blank_text() {
        let result = PlainTextExtractor.extract(b"  \n\t");
        assert!(matches!(result, Err(ExtractionError::NoText)));
    }
}
