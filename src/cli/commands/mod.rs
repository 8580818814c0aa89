//! CLI command implementations
//!
//! Commands return `anyhow::Result<i32>` where the integer is the process
//! exit code. Domain errors are printed and mapped through
//! [`MedAnonError::exit_code`]; only unexpected failures surface as `Err`.

pub mod anonymize;
pub mod ask;
pub mod init;
pub mod insight;
pub mod validate;

use crate::adapters::extraction::extract_file;
use crate::anonymization::AnonymizationEngine;
use crate::config::{load_config, load_config_from_str, MedAnonConfig};
use crate::domain::{AnonymizedReport, MedAnonError, Result};
use std::path::Path;

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "medanon.toml";

/// Resolve the effective configuration
///
/// An explicit path must exist. Without one, `./medanon.toml` is used if
/// present and built-in defaults (plus `MEDANON_*` overrides) otherwise.
pub fn resolve_config(config_path: Option<&str>) -> Result<MedAnonConfig> {
    match config_path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => load_config_from_str(""),
    }
}

/// Extract and anonymize a single file
pub fn anonymize_file(engine: &AnonymizationEngine, path: &Path) -> Result<AnonymizedReport> {
    let source = path.display().to_string();
    crate::log_report_start!(source, extension_of(path));

    let raw = extract_file(path)?;
    let report = engine.anonymize(&raw)?;

    crate::log_report_complete!(source, report);
    Ok(report)
}

/// Print a domain error and return its exit code
pub(crate) fn report_error(context: &str, error: &MedAnonError) -> i32 {
    crate::log_error_with_context!(error, context);
    eprintln!("❌ {context}");
    eprintln!("   Error: {error}");
    error.exit_code()
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}
