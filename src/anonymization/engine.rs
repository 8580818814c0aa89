//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that runs the fixed
//! pipeline over one report:
//!
//! 1. **Protected-term detection** over the raw text
//! 2. **Deterministic redaction** (phone, email, URL, titled names, age, IDs)
//! 3. **Entity redaction** of PERSON/DATE entities, gated by step 1
//!
//! and then computes [`ReportStats`](crate::domain::ReportStats) and writes an
//! audit entry if enabled.
//!
//! # Examples
//!
//! ```no_run
//! use medanon::anonymization::{AnonymizationEngine, AnonymizationConfig};
//! use medanon::domain::RawReport;
//!
//! # fn example() -> medanon::domain::Result<()> {
//! let engine = AnonymizationEngine::from_config(AnonymizationConfig::default())?;
//!
//! let report = RawReport::new("Dr. Sharma prescribed Tab. Augmentin 625mg. Ph 9876543210");
//! let anonymized = engine.anonymize(&report)?;
//! println!("{} ({} redactions)", anonymized.text, anonymized.stats.redaction_count);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    config::AnonymizationConfig,
    detector::{patterns::MedicalPatternRegistry, ProtectedTermDetector},
    recognizer::{build_recognizer, EntityRecognizer},
    redactor::{DeterministicRedactor, EntityRedactor},
    report::BatchSummary,
};
use crate::domain::{AnonymizedReport, MedAnonError, RawReport, Result};
use std::sync::Arc;
use std::time::Instant;

/// Main anonymization engine
///
/// Holds only immutable compiled patterns and a shared recognizer, so one
/// engine can serve any number of reports. Each call builds its own
/// protected-term set and working buffers.
pub struct AnonymizationEngine {
    detector: ProtectedTermDetector,
    deterministic: DeterministicRedactor,
    entities: EntityRedactor,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create an engine with an explicitly supplied recognizer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The pattern library cannot be loaded or compiled
    /// - Audit logger initialization fails
    pub fn new(config: AnonymizationConfig, recognizer: Arc<dyn EntityRecognizer>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| MedAnonError::Configuration(format!("{e:#}")))?;

        let registry = match config.pattern_library {
            Some(ref path) => MedicalPatternRegistry::from_file(path)?,
            None => MedicalPatternRegistry::default_patterns()?,
        }
        .with_additional_brands(&config.additional_brands)?;

        let detector = ProtectedTermDetector::new(Arc::new(registry));
        let deterministic = DeterministicRedactor::new()?;
        let entities = EntityRedactor::new(
            recognizer,
            detector.clone(),
            config.prefix_window,
            config.context_window,
        )?;

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?)
        } else {
            None
        };

        tracing::debug!(
            rules = deterministic.rules().len(),
            matchers = detector.registry().matchers().len(),
            recognizer = entities.backend_id(),
            audit = audit_logger.is_some(),
            "Anonymization engine initialized"
        );

        Ok(Self {
            detector,
            deterministic,
            entities,
            audit_logger,
        })
    }

    /// Create an engine with the built-in recognizer
    ///
    /// Fails with [`MedAnonError::RecognizerUnavailable`] if the configured
    /// gazetteer cannot be loaded.
    pub fn from_config(config: AnonymizationConfig) -> Result<Self> {
        let recognizer = build_recognizer(&config.recognizer)?;
        Self::new(config, recognizer)
    }

    /// Anonymize a single report
    ///
    /// Runs detect → deterministic → entity in that order. Idempotent: feeding
    /// the output back in returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`MedAnonError::Classification`] if the recognizer fails at
    /// any point; no partially redacted text is returned.
    pub fn anonymize(&self, report: &RawReport) -> Result<AnonymizedReport> {
        let start = Instant::now();
        let raw = report.as_str();

        let protected = self.detector.detect(raw);
        let redacted = self.deterministic.redact(raw);
        let pass = self.entities.redact(&redacted, &protected)?;

        let processing_time = start.elapsed().as_millis() as u64;
        let result = AnonymizedReport::new(pass.text, protected.len(), processing_time);

        tracing::debug!(
            report_id = %result.report_id,
            protected_terms = protected.len(),
            entities_redacted = pass.redacted,
            entities_preserved = pass.preserved,
            redactions = result.stats.redaction_count,
            duration_ms = processing_time,
            "Report anonymized"
        );

        if let Some(ref logger) = self.audit_logger {
            logger.log_anonymization(report, &result, self.entities.backend_id())?;
        }

        Ok(result)
    }

    /// Anonymize a plain string
    pub fn anonymize_text(&self, text: &str) -> Result<AnonymizedReport> {
        self.anonymize(&RawReport::new(text))
    }

    /// Anonymize a batch of labelled reports, one at a time
    ///
    /// Failed reports are recorded in the summary and left out of the
    /// output; they are never passed through unanonymized.
    pub fn anonymize_batch<I, S>(&self, reports: I) -> (Vec<(String, AnonymizedReport)>, BatchSummary)
    where
        I: IntoIterator<Item = (S, RawReport)>,
        S: Into<String>,
    {
        let mut results = Vec::new();
        let mut summary = BatchSummary::new();

        for (source, report) in reports {
            let source = source.into();
            match self.anonymize(&report) {
                Ok(result) => {
                    summary.add_report(&result);
                    results.push((source, result));
                }
                Err(e) => {
                    tracing::error!(error = %e, source = %source, "Failed to anonymize report");
                    summary.add_failure(source, &e);
                }
            }
        }

        (results, summary)
    }

    /// Recognizer backend in use
    pub fn recognizer_id(&self) -> &str {
        self.entities.backend_id()
    }

    /// Check if audit logging is active
    pub fn is_auditing(&self) -> bool {
        self.audit_logger.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::Entity;
    use crate::anonymization::recognizer::EntityStream;
    use crate::domain::ClassificationError;

    fn engine() -> AnonymizationEngine {
        AnonymizationEngine::from_config(AnonymizationConfig::default()).unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = AnonymizationEngine::from_config(AnonymizationConfig::default());
        assert!(engine.is_ok());
        assert!(!engine.unwrap().is_auditing());
    }

    #[test]
    fn test_anonymize_prescription() {
        let result = engine()
            .anonymize_text(
                "Tab. Augmentin 625mg twice daily. Dr. Sharma advised rest. Contact: 9876543210, age 45yrs.",
            )
            .unwrap();

        assert_eq!(
            result.text,
            "Tab. Augmentin 625mg twice daily. [DOCTOR_NAME] advised rest. Contact: [PHONE], age [AGE]."
        );
        assert_eq!(result.stats.redaction_count, 3);
        assert!(result.stats.protected_term_count > 0);
    }

    #[test]
    fn test_anonymize_is_idempotent() {
        let engine = engine();
        let once = engine
            .anonymize_text("Mrs Kavita Rao seen by Priya Sharma on 12/03/2024, ph 98450 12345")
            .unwrap();
        let twice = engine.anonymize_text(&once.text).unwrap();
        assert_eq!(once.text, twice.text);
    }

    #[test]
    fn test_additional_brands_are_protected() {
        struct FlagsBrand;
        impl EntityRecognizer for FlagsBrand {
            fn backend_id(&self) -> &str {
                "flags-brand"
            }
            fn recognize<'a>(
                &'a self,
                text: &'a str,
            ) -> std::result::Result<EntityStream<'a>, ClassificationError> {
                let found: Vec<std::result::Result<Entity, ClassificationError>> = text
                    .find("Zyvana")
                    .map(|start| Entity {
                        text: "Zyvana".to_string(),
                        category: crate::anonymization::models::EntityCategory::Person,
                        start,
                        end: start + 6,
                    })
                    .into_iter()
                    .map(Ok)
                    .collect();
                Ok(Box::new(found.into_iter()))
            }
        }

        let config = AnonymizationConfig {
            additional_brands: vec!["Zyvana".to_string()],
            ..Default::default()
        };
        let engine = AnonymizationEngine::new(config, Arc::new(FlagsBrand)).unwrap();
        let result = engine.anonymize_text("Started Zyvana at night").unwrap();
        assert_eq!(result.text, "Started Zyvana at night");

        let plain = AnonymizationEngine::new(AnonymizationConfig::default(), Arc::new(FlagsBrand))
            .unwrap()
            .anonymize_text("Started Zyvana at night")
            .unwrap();
        assert_eq!(plain.text, "Started [PERSON_NAME] at night");
    }

    #[test]
    fn test_batch_excludes_failures() {
        struct FailsOnMarker;
        impl EntityRecognizer for FailsOnMarker {
            fn backend_id(&self) -> &str {
                "fails-on-marker"
            }
            fn recognize<'a>(
                &'a self,
                text: &'a str,
            ) -> std::result::Result<EntityStream<'a>, ClassificationError> {
                if text.contains("boom") {
                    Err(ClassificationError::new("fails-on-marker", "cannot tag"))
                } else {
                    Ok(Box::new(std::iter::empty::<
                        std::result::Result<Entity, ClassificationError>,
                    >()))
                }
            }
        }

        let engine =
            AnonymizationEngine::new(AnonymizationConfig::default(), Arc::new(FailsOnMarker))
                .unwrap();
        let (results, summary) = engine.anonymize_batch(vec![
            ("a.txt", RawReport::new("mail a@b.com")),
            ("b.txt", RawReport::new("boom 9876543210")),
        ]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "a.txt");
        assert_eq!(results[0].1.text, "mail [EMAIL]");
        assert_eq!(summary.total_reports, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].source, "b.txt");
    }

    #[test]
    fn test_audit_written_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AnonymizationConfig::default();
        config.audit.enabled = true;
        config.audit.log_path = dir.path().join("audit.log");

        let engine = AnonymizationEngine::from_config(config).unwrap();
        assert!(engine.is_auditing());
        engine.anonymize_text("reach me at john.doe@example.com").unwrap();

        let content = std::fs::read_to_string(dir.path().join("audit.log")).unwrap();
        assert!(content.contains("\"EMAIL\":1"));
        assert!(!content.contains("john.doe"));
    }
}
