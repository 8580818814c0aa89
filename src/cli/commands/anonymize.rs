//! Anonymize command implementation
//!
//! Extracts each input, runs it through the anonymization engine and writes
//! the results. Inputs that fail extraction or anonymization are listed in
//! the summary and left out of the output.

use super::{report_error, resolve_config};
use crate::adapters::extraction::extract_file;
use crate::anonymization::{AnonymizationEngine, BatchSummary};
use crate::domain::{AnonymizedReport, RawReport};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for anonymized reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Anonymized text only
    Text,
    /// Anonymized text with statistics and report id
    Json,
}

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// PDF or text files to anonymize
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input) or directory (multiple inputs); stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print a batch summary after processing
    #[arg(long)]
    pub summary: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    source: &'a str,
    #[serde(flatten)]
    report: &'a AnonymizedReport,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!(inputs = self.inputs.len(), "Starting anonymize command");

        let config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_error("Failed to load configuration", &e)),
        };

        let engine = match AnonymizationEngine::from_config(config.anonymization) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize anonymization engine", &e)),
        };

        let mut extracted: Vec<(String, RawReport)> = Vec::new();
        let mut extraction_failures: Vec<(String, String)> = Vec::new();
        for path in &self.inputs {
            let source = path.display().to_string();
            match extract_file(path) {
                Ok(raw) => extracted.push((source, raw)),
                Err(e) => {
                    crate::log_error_with_context!(&e, "Text extraction failed");
                    eprintln!("⚠️  Skipping {source}: {e}");
                    extraction_failures.push((source, e.to_string()));
                }
            }
        }

        let (results, mut summary) = engine.anonymize_batch(extracted);
        let classification_failed = !summary.is_complete();
        let extraction_failed = !extraction_failures.is_empty();
        for (source, error) in extraction_failures {
            summary.add_failure(source, error);
        }

        for (source, report) in &results {
            crate::log_report_complete!(source, report);
        }

        self.write_results(&results)?;

        if self.summary {
            eprint!("{}", summary.format_console());
        }

        Ok(exit_code(&summary, classification_failed, extraction_failed))
    }

    fn write_results(&self, results: &[(String, AnonymizedReport)]) -> anyhow::Result<()> {
        match &self.output {
            None => {
                for (source, report) in results {
                    if results.len() > 1 && self.format == OutputFormat::Text {
                        println!("==> {source} <==");
                    }
                    println!("{}", self.render(source, report)?);
                }
            }
            Some(path) if self.inputs.len() == 1 => {
                if let Some((source, report)) = results.first() {
                    fs::write(path, self.render(source, report)?)?;
                    println!("✅ Wrote {}", path.display());
                }
            }
            Some(dir) => {
                fs::create_dir_all(dir)?;
                for (source, report) in results {
                    let target = dir.join(self.output_name(Path::new(source)));
                    fs::write(&target, self.render(source, report)?)?;
                    println!("✅ Wrote {}", target.display());
                }
            }
        }
        Ok(())
    }

    fn render(&self, source: &str, report: &AnonymizedReport) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Text => report.text.clone(),
            OutputFormat::Json => serde_json::to_string_pretty(&JsonOutput { source, report })?,
        })
    }

    fn output_name(&self, source: &Path) -> String {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        match self.format {
            OutputFormat::Text => format!("{stem}.anonymized.txt"),
            OutputFormat::Json => format!("{stem}.anonymized.json"),
        }
    }
}

/// Any failed input fails the run; recognizer failures outrank extraction
/// failures.
fn exit_code(summary: &BatchSummary, classification_failed: bool, extraction_failed: bool) -> i32 {
    if summary.is_complete() {
        0
    } else if extraction_failed && !classification_failed {
        3
    } else {
        5
    }
}
