//! Configuration management for medanon.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! medanon reads `medanon.toml` with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDANON_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use medanon::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medanon.toml")?;
//!
//! println!("Model: {}", config.llm.model);
//! println!("Context window: {}", config.anonymization.context_window);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AnonymizationConfig`](crate::anonymization::AnonymizationConfig) - Pattern library, windows, recognizer, audit
//! - [`LlmConfig`] - Gemini model, API key, timeout, cost rates
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! additional_brands = ["Crocin"]
//!
//! [anonymization.audit]
//! enabled = true
//!
//! [llm]
//! api_key = "${MEDANON_LLM_API_KEY}"
//! model = "gemini-1.5-flash"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{ApplicationConfig, LlmConfig, LoggingConfig, MedAnonConfig};
pub use secret::{secret_string, SecretString, SecretValue};
