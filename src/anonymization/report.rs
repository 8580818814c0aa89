//! Batch reporting for anonymization runs
//!
//! [`BatchSummary`] aggregates per-report statistics across a batch and
//! records which inputs failed. Failed inputs are listed by source label
//! only; their text never appears in the summary.

use crate::domain::{AnonymizedReport, Placeholder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An input that could not be anonymized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Source label (usually the input path)
    pub source: String,
    /// Error description
    pub error: String,
}

/// Aggregate statistics over a batch of reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Inputs seen, successful or not
    pub total_reports: usize,

    /// Reports anonymized successfully
    pub anonymized_reports: usize,

    /// Reports with at least one placeholder in the output
    pub reports_with_redactions: usize,

    /// Total `[` count across all outputs
    pub total_redactions: usize,

    /// Placeholder occurrences across all outputs
    pub redactions_by_tag: BTreeMap<Placeholder, usize>,

    /// Protected medical terms across all inputs
    pub protected_terms: usize,

    /// Estimated LLM tokens across all outputs
    pub estimated_tokens: usize,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Average processing time per anonymized report (ms)
    pub avg_processing_time_ms: u64,

    /// Inputs excluded from the output
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successfully anonymized report
    pub fn add_report(&mut self, report: &AnonymizedReport) {
        self.total_reports += 1;
        self.anonymized_reports += 1;

        let stats = &report.stats;
        if report.has_redactions() {
            self.reports_with_redactions += 1;
        }
        self.total_redactions += stats.redaction_count;
        for (tag, count) in &stats.redactions_by_tag {
            *self.redactions_by_tag.entry(*tag).or_insert(0) += count;
        }
        self.protected_terms += stats.protected_term_count;
        self.estimated_tokens += stats.estimated_tokens;

        self.total_processing_time_ms += report.processing_time_ms;
        self.avg_processing_time_ms =
            self.total_processing_time_ms / self.anonymized_reports as u64;
    }

    /// Record an input that failed
    pub fn add_failure(&mut self, source: impl Into<String>, error: impl ToString) {
        self.total_reports += 1;
        self.failures.push(BatchFailure {
            source: source.into(),
            error: error.to_string(),
        });
    }

    /// Check if every input was anonymized
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Format summary for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  ANONYMIZATION SUMMARY                        \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Reports Processed:           {}\n",
            self.total_reports
        ));
        output.push_str(&format!(
            "  Reports Anonymized:          {}\n",
            self.anonymized_reports
        ));
        output.push_str(&format!(
            "  Reports with Redactions:     {}\n",
            self.reports_with_redactions
        ));
        output.push_str(&format!(
            "  Total Redactions:            {}\n",
            self.total_redactions
        ));
        output.push_str(&format!(
            "  Protected Medical Terms:     {}\n",
            self.protected_terms
        ));
        output.push_str(&format!(
            "  Estimated LLM Tokens:        {}\n",
            self.estimated_tokens
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.redactions_by_tag.is_empty() {
            output.push_str("🔍 REDACTIONS BY PLACEHOLDER\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut tags: Vec<_> = self.redactions_by_tag.iter().collect();
            tags.sort_by(|a, b| b.1.cmp(a.1));

            for (tag, count) in tags {
                output.push_str(&format!("  {:30} {:>5}\n", tag.tag(), count));
            }
            output.push('\n');
        }

        if !self.failures.is_empty() {
            output.push_str("⚠️  FAILED INPUTS (excluded from output)\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for failure in &self.failures {
                output.push_str(&format!("  • {}: {}\n", failure.source, failure.error));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format summary as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
