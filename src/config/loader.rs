//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MedAnonConfig;
use super::secret::secret_string;
use crate::domain::errors::MedAnonError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MedAnonConfig
/// 4. Applies environment variable overrides (MEDANON_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`MedAnonError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use medanon::config::loader::load_config;
///
/// let config = load_config("medanon.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MedAnonConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MedAnonError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedAnonError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn load_config_from_str(contents: &str) -> Result<MedAnonConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: MedAnonConfig = toml::from_str(&contents)
        .map_err(|e| MedAnonError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MedAnonError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MedAnonError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MedAnonError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the MEDANON_* prefix
///
/// Variables follow the pattern MEDANON_<SECTION>_<KEY>, for example
/// MEDANON_LLM_MODEL or MEDANON_ANONYMIZATION_PREFIX_WINDOW.
fn apply_env_overrides(config: &mut MedAnonConfig) -> Result<()> {
    if let Ok(val) = std::env::var("MEDANON_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| MedAnonError::Configuration(format!("{e:#}")))?;

    // LLM overrides
    if let Ok(val) = std::env::var("MEDANON_LLM_API_KEY") {
        config.llm.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("MEDANON_LLM_MODEL") {
        config.llm.model = val;
    }
    if let Ok(val) = std::env::var("MEDANON_LLM_BASE_URL") {
        config.llm.base_url = val;
    }
    if let Ok(val) = std::env::var("MEDANON_LLM_TIMEOUT_SECONDS") {
        config.llm.timeout_seconds = val.parse().map_err(|_| {
            MedAnonError::Configuration(format!("Invalid MEDANON_LLM_TIMEOUT_SECONDS value: {val}"))
        })?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("MEDANON_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MEDANON_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("MEDANON_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
