// Medanon - Medical report anonymizer
// Copyright (c) 2025 Medanon Contributors
// Licensed under the MIT License

use clap::Parser;
use medanon::cli::commands::resolve_config;
use medanon::cli::{Cli, Commands};
use medanon::config::LoggingConfig;
use medanon::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging follows the config file when it loads; the command itself
    // reports configuration errors.
    let settings = resolve_config(cli.config.as_deref()).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| settings.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = settings
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "medanon - Medical report anonymizer"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Anonymize(args) => args.execute(config).await,
        Commands::Ask(args) => args.execute(config).await,
        Commands::Insight(args) => args.execute(config).await,
        Commands::ValidateConfig(args) => args.execute(config).await,
        Commands::Init(args) => args.execute().await,
    }
}
