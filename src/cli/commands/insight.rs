//! Insight command implementation

use super::{anonymize_file, report_error, resolve_config};
use crate::adapters::llm::{ChatModel, GeminiClient};
use crate::anonymization::{AnonymizationConfig, AnonymizationEngine};
use crate::domain::MedAnonError;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the insight command
#[derive(Args, Debug)]
pub struct InsightArgs {
    /// PDF or text report
    pub input: PathBuf,

    /// Earlier reports for the same patient, oldest first
    #[arg(short, long)]
    pub previous: Vec<PathBuf>,
}

impl InsightArgs {
    /// Execute the insight command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_error("Failed to load configuration", &e)),
        };

        let client = match GeminiClient::new(&config.llm) {
            Ok(client) => client,
            Err(e) => {
                return Ok(report_error(
                    "Language model is not available",
                    &MedAnonError::Service(e),
                ))
            }
        };

        self.run(config.anonymization, &client).await
    }

    /// Anonymize every input and request the insight
    ///
    /// Earlier reports are anonymized with the same engine before they are
    /// sent as history.
    pub async fn run(
        &self,
        anonymization: AnonymizationConfig,
        model: &dyn ChatModel,
    ) -> anyhow::Result<i32> {
        let engine = match AnonymizationEngine::from_config(anonymization) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize anonymization engine", &e)),
        };

        let mut previous = Vec::with_capacity(self.previous.len());
        for path in self.previous.iter() {
            match anonymize_file(&engine, path) {
                Ok(report) => previous.push(report.text),
                Err(e) => {
                    let context = format!("Failed to anonymize {}", path.display());
                    return Ok(report_error(&context, &e));
                }
            }
        }

        let current = match anonymize_file(&engine, &self.input) {
            Ok(report) => report,
            Err(e) => {
                let context = format!("Failed to anonymize {}", self.input.display());
                return Ok(report_error(&context, &e));
            }
        };

        tracing::info!(
            report_id = %current.report_id,
            previous = previous.len(),
            model = model.model_id(),
            "Requesting insight"
        );

        match model.insight(&current.text, &previous).await {
            Ok(insight) => {
                println!("💡 {insight}");
                Ok(0)
            }
            Err(e) => Ok(report_error(
                "Language model request failed",
                &MedAnonError::Service(e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceError;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Default)]
    struct HistoryModel {
        seen: Mutex<Option<(String, Vec<String>)>>,
    }

    #[async_trait]
    impl ChatModel for HistoryModel {
        fn model_id(&self) -> &str {
            "history"
        }

        async fn ask(&self, _context: &str, _question: &str) -> Result<String, ServiceError> {
            unreachable!()
        }

        async fn insight(&self, report: &str, previous: &[String]) -> Result<String, ServiceError> {
            *self.seen.lock().unwrap() = Some((report.to_string(), previous.to_vec()));
            Ok("HbA1c rising steadily".to_string())
        }
    }

    fn report_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[tokio::test]
    async fn test_previous_reports_are_anonymized() {
        let jan = report_file("HbA1c 7.1%. Contact 9876543210");
        let mar = report_file("HbA1c 8.2%. Email rao@clinic.in");
        let model = HistoryModel::default();
        let args = InsightArgs {
            input: mar.path().to_path_buf(),
            previous: vec![jan.path().to_path_buf()],
        };

        let code = args.run(Default::default(), &model).await.unwrap();
        assert_eq!(code, 0);

        let seen = model.seen.lock().unwrap();
        let (report, previous) = seen.as_ref().unwrap();
        assert_eq!(report, "HbA1c 8.2%. Email [EMAIL]");
        assert_eq!(previous, &vec!["HbA1c 7.1%. Contact [PHONE]".to_string()]);
    }

    #[tokio::test]
    async fn test_unreadable_previous_report() {
        let mar = report_file("HbA1c 8.2%");
        let model = HistoryModel::default();
        let args = InsightArgs {
            input: mar.path().to_path_buf(),
            previous: vec![PathBuf::from("/nonexistent/jan.txt")],
        };

        let code = args.run(Default::default(), &model).await.unwrap();
        assert_eq!(code, 3);
        assert!(model.seen.lock().unwrap().is_none());
    }
}
