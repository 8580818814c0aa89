//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "medanon.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing medanon configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put MEDANON_LLM_API_KEY in a .env file (needed for ask/insight)");
                println!("  3. Validate configuration: medanon validate-config");
                println!("  4. Anonymize a report: medanon anonymize report.pdf");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate the configuration template
    fn generate_config() -> String {
        r#"# medanon configuration
#
# Every setting is optional; the values below are the defaults.
# Any key can be overridden with MEDANON_<SECTION>_<KEY>, for example
# MEDANON_LLM_MODEL or MEDANON_ANONYMIZATION_CONTEXT_WINDOW.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Replace the built-in medical pattern library
# pattern_library = "patterns/custom_medical.toml"

# Extra brand names that must never be redacted
additional_brands = []

# Characters inspected before a name candidate for clinical cue words
prefix_window = 10

# Characters inspected on both sides of a name candidate
context_window = 20

[anonymization.recognizer]
# Extra given names, one per line, merged with the built-in list
# gazetteer_path = "names.txt"

# Shortest name the recognizer reports
min_name_length = 2

[anonymization.audit]
# One line per anonymized report; input is stored as a SHA-256 hash only
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Language model (ask / insight)
# ============================================================================
[llm]
provider = "gemini"
# Only the anonymized report is ever sent
# api_key = "${MEDANON_LLM_API_KEY}"
model = "gemini-1.5-flash"
base_url = "https://generativelanguage.googleapis.com/v1beta"
timeout_seconds = 60

# Dollars per 1,000 tokens, used for cost estimates
input_cost_per_1k = 0.000035
output_cost_per_1k = 0.000175

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
local_max_size_mb = 100
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[test]
    fn test_generated_config_is_valid() {
        let config = load_config_from_str(&InitArgs::generate_config()).unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.anonymization.context_window, 20);
        assert!(!config.anonymization.audit.enabled);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medanon.toml");
        fs::write(&path, "# mine").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");

        let forced = InitArgs {
            force: true,
            ..args
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[anonymization]"));
    }
}
