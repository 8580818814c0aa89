//! Anonymization configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Anonymization engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Path to a replacement medical pattern library TOML file
    pub pattern_library: Option<PathBuf>,

    /// Extra brand names appended to the brand allow-list
    #[serde(default)]
    pub additional_brands: Vec<String>,

    /// Characters inspected immediately before a PERSON candidate
    #[serde(default = "default_prefix_window")]
    pub prefix_window: usize,

    /// Characters inspected on both sides of a PERSON candidate
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Built-in entity recognizer configuration
    #[serde(default)]
    pub recognizer: RecognizerConfig,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_prefix_window() -> usize {
    10
}

fn default_context_window() -> usize {
    20
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            pattern_library: None,
            additional_brands: Vec::new(),
            prefix_window: default_prefix_window(),
            context_window: default_context_window(),
            recognizer: RecognizerConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        if self.additional_brands.iter().any(|b| b.trim().is_empty()) {
            anyhow::bail!("additional_brands must not contain empty names");
        }

        if self.prefix_window == 0 || self.context_window == 0 {
            anyhow::bail!("prefix_window and context_window must be greater than 0");
        }

        self.recognizer
            .validate()
            .context("Invalid recognizer configuration")?;

        self.audit
            .validate()
            .context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_ADDITIONAL_BRANDS") {
            self.additional_brands = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_PREFIX_WINDOW") {
            self.prefix_window = val
                .parse()
                .context("Invalid MEDANON_ANONYMIZATION_PREFIX_WINDOW value")?;
        }

        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_CONTEXT_WINDOW") {
            self.context_window = val
                .parse()
                .context("Invalid MEDANON_ANONYMIZATION_CONTEXT_WINDOW value")?;
        }

        self.recognizer.apply_env_overrides()?;
        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Built-in recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Extra given-name list, one name per line, merged with the built-in list
    pub gazetteer_path: Option<PathBuf>,

    /// Shortest candidate name (in characters) the recognizer reports
    #[serde(default = "default_min_name_length")]
    pub min_name_length: usize,
}

fn default_min_name_length() -> usize {
    2
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            gazetteer_path: None,
            min_name_length: default_min_name_length(),
        }
    }
}

impl RecognizerConfig {
    /// Validate recognizer configuration
    ///
    /// A missing gazetteer is not rejected here: the engine reports it as
    /// [`crate::domain::MedAnonError::RecognizerUnavailable`] when it builds
    /// the recognizer.
    pub fn validate(&self) -> Result<()> {
        if self.min_name_length == 0 {
            anyhow::bail!("min_name_length must be greater than 0");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("MEDANON_RECOGNIZER_GAZETTEER_PATH") {
            self.gazetteer_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("MEDANON_RECOGNIZER_MIN_NAME_LENGTH") {
            self.min_name_length = val
                .parse()
                .context("Invalid MEDANON_RECOGNIZER_MIN_NAME_LENGTH value")?;
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            // Ensure parent directory exists or can be created
            if let Some(parent) = self.log_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!(
                            "Failed to create audit log directory: {}",
                            parent.display()
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid MEDANON_ANONYMIZATION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("MEDANON_ANONYMIZATION_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid MEDANON_ANONYMIZATION_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
