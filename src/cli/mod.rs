//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for medanon using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// medanon - Medical report anonymizer
#[derive(Parser, Debug)]
#[command(name = "medanon")]
#[command(version, about, long_about = None)]
#[command(author = "Medanon Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ./medanon.toml when present)
    #[arg(short, long, env = "MEDANON_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDANON_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize one or more PDF or text reports
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Anonymize a report and ask the language model a question about it
    Ask(commands::ask::AskArgs),

    /// Anonymize a report and get a one-line clinical insight
    Insight(commands::insight::InsightArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
