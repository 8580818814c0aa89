//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Besides checking
//! the TOML file it builds the anonymization engine, so a broken pattern
//! library or gazetteer is reported here rather than on first use.

use super::{resolve_config, DEFAULT_CONFIG_PATH};
use crate::anonymization::AnonymizationEngine;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration file: {shown}");
        println!();

        let config = match resolve_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded and validated");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let engine = match AnonymizationEngine::from_config(config.anonymization.clone()) {
            Ok(engine) => {
                println!("✅ Anonymization engine initialized");
                engine
            }
            Err(e) => {
                println!("❌ Anonymization engine could not be initialized");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let anon = &config.anonymization;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Pattern Library: {}",
            anon.pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        println!("  Additional Brands: {}", anon.additional_brands.len());
        println!(
            "  Context Windows: prefix {} / around {}",
            anon.prefix_window, anon.context_window
        );
        println!("  Recognizer: {}", engine.recognizer_id());
        println!(
            "  Audit: {}",
            if engine.is_auditing() {
                anon.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!("  LLM Provider: {}", config.llm.provider);
        println!("  LLM Model: {}", config.llm.model);
        println!(
            "  LLM API Key: {}",
            if config.llm.has_api_key() {
                "set"
            } else {
                "not set (ask/insight unavailable)"
            }
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}
