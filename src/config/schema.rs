//! Configuration schema types
//!
//! This module defines the `medanon.toml` structure.

use crate::anonymization::AnonymizationConfig;
use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main medanon configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedAnonConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Anonymization pipeline settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Downstream language model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MedAnonConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.anonymization
            .validate()
            .map_err(|e| format!("anonymization: {e:#}"))?;
        self.llm.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Language model configuration
///
/// The API key is only required by the `ask` and `insight` commands, so an
/// absent key is not a validation error here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (only "gemini" is supported)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key, zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// REST API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Cost in dollars per 1,000 input tokens
    #[serde(default = "default_input_cost_per_1k")]
    pub input_cost_per_1k: f64,

    /// Cost in dollars per 1,000 output tokens
    #[serde(default = "default_output_cost_per_1k")]
    pub output_cost_per_1k: f64,
}

impl LlmConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_providers = ["gemini"];
        if !valid_providers.contains(&self.provider.as_str()) {
            return Err(format!(
                "Invalid llm.provider '{}'. Must be one of: {}",
                self.provider,
                valid_providers.join(", ")
            ));
        }

        if self.model.trim().is_empty() {
            return Err("llm.model cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid llm.base_url '{}': {e}", self.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("llm.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("llm.timeout_seconds must be > 0".to_string());
        }

        if self.input_cost_per_1k < 0.0 || self.output_cost_per_1k < 0.0 {
            return Err("llm cost rates cannot be negative".to_string());
        }

        Ok(())
    }

    /// Whether an API key is present
    pub fn has_api_key(&self) -> bool {
        use secrecy::ExposeSecret;

        self.api_key
            .as_ref()
            .map(|k| !k.expose_secret().is_empty())
            .unwrap_or(false)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            input_cost_per_1k: default_input_cost_per_1k(),
            output_cost_per_1k: default_output_cost_per_1k(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, size)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Maximum log file size in MB (for size-based rotation)
    #[serde(default = "default_local_max_size_mb")]
    pub local_max_size_mb: u64,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "size"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_max_size_mb == 0 {
            return Err("logging.local_max_size_mb must be > 0".to_string());
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_size_mb: default_local_max_size_mb(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_input_cost_per_1k() -> f64 {
    0.000035
}

fn default_output_cost_per_1k() -> f64 {
    0.000175
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_size_mb() -> u64 {
    100
}
