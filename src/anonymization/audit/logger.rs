//! Audit logger for anonymization runs

use crate::domain::{AnonymizedReport, MedAnonError, Placeholder, RawReport, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    report_id: String,
    /// SHA-256 hash of the raw input (never log plaintext report text)
    input_hash: String,
    char_count: usize,
    word_count: usize,
    redaction_count: usize,
    redactions_by_tag: BTreeMap<Placeholder, usize>,
    protected_term_count: usize,
    recognizer: String,
    processing_time_ms: u64,
}

/// Audit logger for anonymization runs
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            // Ensure parent directory exists
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MedAnonError::Audit(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Record one anonymized report
    pub fn log_anonymization(
        &self,
        raw: &RawReport,
        report: &AnonymizedReport,
        recognizer: &str,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: report.timestamp.to_rfc3339(),
            report_id: report.report_id.to_string(),
            input_hash: hash_text(raw.as_str()),
            char_count: report.stats.char_count,
            word_count: report.stats.word_count,
            redaction_count: report.stats.redaction_count,
            redactions_by_tag: report.stats.redactions_by_tag.clone(),
            protected_term_count: report.stats.protected_term_count,
            recognizer: recognizer.to_string(),
            processing_time_ms: report.processing_time_ms,
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                MedAnonError::Audit(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        let line = if self.json_format {
            serde_json::to_string(entry)?
        } else {
            format!(
                "[{}] Report: {} | Input: {} | Redactions: {} | Protected: {} | Time: {}ms",
                entry.timestamp,
                entry.report_id,
                &entry.input_hash[..12],
                entry.redaction_count,
                entry.protected_term_count,
                entry.processing_time_ms
            )
        };

        writeln!(file, "{line}")
            .map_err(|e| MedAnonError::Audit(format!("Failed to write audit entry: {e}")))
    }
}

/// Hash text using SHA-256
pub fn hash_text(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> (RawReport, AnonymizedReport) {
        let raw = RawReport::new("Mr. Rahul Verma, ph 9876543210");
        let report = AnonymizedReport::new("[PATIENT_NAME], ph [PHONE]".to_string(), 0, 3);
        (raw, report)
    }

    #[test]
    fn test_audit_logger_creation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("audit.log");

        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();
        assert!(logger.enabled);
        assert!(log_path.parent().unwrap().exists());
    }

    #[test]
    fn test_hash_text() {
        let hash1 = hash_text("test@example.com");
        let hash2 = hash_text("test@example.com");
        let hash3 = hash_text("different@example.com");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_log_anonymization_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();

        let (raw, report) = sample();
        logger.log_anonymization(&raw, &report, "rules").unwrap();
        logger.log_anonymization(&raw, &report, "rules").unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);

        let entry: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(entry["report_id"], report.report_id.to_string());
        assert_eq!(entry["redactions_by_tag"]["PHONE"], 1);
        assert_eq!(entry["input_hash"], hash_text(raw.as_str()));

        assert!(!content.contains("Rahul"));
        assert!(!content.contains("9876543210"));
    }

    #[test]
    fn test_log_anonymization_plain_text() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false, true).unwrap();

        let (raw, report) = sample();
        logger.log_anonymization(&raw, &report, "rules").unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Redactions: 2"));
        assert!(!content.contains("Rahul"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, false).unwrap();

        let (raw, report) = sample();
        logger.log_anonymization(&raw, &report, "rules").unwrap();
        assert!(!log_path.exists());
    }
}
