//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels (`RUST_LOG` overrides the configured level)
//! - Console output on stderr
//! - Optional JSON file logging with daily rotation
//!
//! Log events carry counts, hashes and report ids only. Report text and
//! matched PII are never logged.
//!
//! # Example
//!
//! ```no_run
//! use medanon::logging::init_logging;
//! use medanon::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of processing for one input
///
/// # Example
///
/// ```no_run
/// use medanon::log_report_start;
///
/// log_report_start!("reports/cbc.pdf", "pdf");
/// ```
#[macro_export]
macro_rules! log_report_start {
    ($source:expr, $extractor:expr) => {
        tracing::info!(
            source = %$source,
            extractor = $extractor,
            "Processing report"
        );
    };
}

/// Log the completion of one anonymized report
///
/// # Example
///
/// ```no_run
/// use medanon::log_report_complete;
/// use medanon::domain::AnonymizedReport;
///
/// let report = AnonymizedReport::new("[PATIENT_NAME], Hb 9.1".to_string(), 0, 3);
/// log_report_complete!("reports/cbc.pdf", &report);
/// ```
#[macro_export]
macro_rules! log_report_complete {
    ($source:expr, $report:expr) => {
        tracing::info!(
            source = %$source,
            report_id = %$report.report_id,
            redactions = $report.stats.redaction_count,
            protected_terms = $report.stats.protected_term_count,
            duration_ms = $report.processing_time_ms,
            "Report anonymized"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use medanon::log_error_with_context;
/// use medanon::domain::MedAnonError;
///
/// let error = MedAnonError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{AnonymizedReport, MedAnonError};

    #[test]
    fn test_macros_expand() {
        let report = AnonymizedReport::new("[EMAIL]".to_string(), 0, 1);
        log_report_start!("a.txt", "text");
        log_report_complete!("a.txt", &report);
        log_error_with_context!(&MedAnonError::Io("disk".to_string()), "writing output");
    }
}
