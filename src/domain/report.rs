//! Report models
//!
//! [`RawReport`] is the unmodified extracted text handed to the pipeline;
//! [`AnonymizedReport`] is what comes back out, together with its
//! [`ReportStats`].

use super::placeholder::Placeholder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Rough tokens-per-word ratio used for LLM budgeting
pub const TOKENS_PER_WORD: f64 = 1.33;

/// Estimate the LLM token count of `text`
///
/// Whitespace word count times [`TOKENS_PER_WORD`], truncated.
pub fn estimate_tokens(text: &str) -> usize {
    let words = text.split_whitespace().count();
    (words as f64 * TOKENS_PER_WORD) as usize
}

/// Unmodified report text as produced by the extraction collaborator
///
/// Immutable once created. Consumed by reference by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReport {
    text: String,
}

impl RawReport {
    /// Wrap extracted text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Borrow the raw text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check whether the report has any non-whitespace content
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<String> for RawReport {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for RawReport {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Simple statistics over an anonymized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    /// Character count (Unicode scalar values)
    pub char_count: usize,
    /// Whitespace-separated word count
    pub word_count: usize,
    /// Number of `[` characters, used as a redaction-density signal
    pub redaction_count: usize,
    /// Occurrences of each placeholder tag
    pub redactions_by_tag: BTreeMap<Placeholder, usize>,
    /// Distinct protected medical terms found in the raw text
    pub protected_term_count: usize,
    /// Estimated LLM tokens for the anonymized text
    pub estimated_tokens: usize,
}

impl ReportStats {
    /// Compute statistics for an anonymized text
    pub fn compute(text: &str, protected_term_count: usize) -> Self {
        let redactions_by_tag = Placeholder::ALL
            .into_iter()
            .map(|p| (p, p.count_in(text)))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            redaction_count: text.matches('[').count(),
            redactions_by_tag,
            protected_term_count,
            estimated_tokens: estimate_tokens(text),
        }
    }
}

/// Final output of the anonymization pipeline
///
/// Owned by the caller; the engine keeps no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedReport {
    /// Identifier correlating logs and audit entries for this run
    pub report_id: Uuid,
    /// When the report was anonymized
    pub timestamp: DateTime<Utc>,
    /// Anonymized text
    pub text: String,
    /// Statistics over `text`
    pub stats: ReportStats,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl AnonymizedReport {
    /// Build a report, computing its statistics
    pub fn new(text: String, protected_term_count: usize, processing_time_ms: u64) -> Self {
        let stats = ReportStats::compute(&text, protected_term_count);
        Self {
            report_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            text,
            stats,
            processing_time_ms,
        }
    }

    /// Borrow the anonymized text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the report, returning the text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Check if anything was redacted
    pub fn has_redactions(&self) -> bool {
        !self.stats.redactions_by_tag.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("one two three"), 3);
        assert_eq!(estimate_tokens(&"word ".repeat(10)), 13);
    }

    #[test]
    fn test_stats_counts() {
        let text = "Call [PHONE] or [EMAIL], seen by [DOCTOR_NAME] on [DATE].";
        let stats = ReportStats::compute(text, 2);

        assert_eq!(stats.char_count, text.chars().count());
        assert_eq!(stats.word_count, 9);
        assert_eq!(stats.redaction_count, 4);
        assert_eq!(stats.redactions_by_tag.get(&Placeholder::Phone), Some(&1));
        assert_eq!(stats.redactions_by_tag.get(&Placeholder::Age), None);
        assert_eq!(stats.protected_term_count, 2);
    }

    #[test]
    fn test_char_count_is_unicode_aware() {
        let stats = ReportStats::compute("façade", 0);
        assert_eq!(stats.char_count, 6);
    }

    #[test]
    fn test_raw_report_blank() {
        assert!(RawReport::new("  \n\t ").is_blank());
        assert!(!RawReport::from("Tab. Pand 40mg").is_blank());
    }

    #[test]
    fn test_anonymized_report_has_redactions() {
        assert!(!AnonymizedReport::new("nothing here".into(), 0, 1).has_redactions());
        assert!(AnonymizedReport::new("[AGE]".into(), 0, 1).has_redactions());
    }
}
