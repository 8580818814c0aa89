//! Ask command implementation
//!
//! Anonymizes a report, then asks the language model a question about it.
//! Only the anonymized text is sent.

use super::{anonymize_file, report_error, resolve_config};
use crate::adapters::llm::{ChatMessage, ChatModel, ConversationUsage, GeminiClient};
use crate::anonymization::AnonymizationEngine;
use crate::config::LlmConfig;
use crate::domain::MedAnonError;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// PDF or text report
    pub input: PathBuf,

    /// Question about the report
    #[arg(short, long)]
    pub question: String,

    /// Print the anonymized report before the answer
    #[arg(long)]
    pub show_report: bool,
}

impl AskArgs {
    /// Execute the ask command
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

        self.run(&config.llm, config.anonymization, &client).await
    }

    /// Anonymize and ask using an already constructed model
    pub async fn run(
        &self,
        llm: &LlmConfig,
        anonymization: crate::anonymization::AnonymizationConfig,
        model: &dyn ChatModel,
    ) -> anyhow::Result<i32> {
        let engine = match AnonymizationEngine::from_config(anonymization) {
            Ok(engine) => engine,
            Err(e) => return Ok(report_error("Failed to initialize anonymization engine", &e)),
        };

        let report = match anonymize_file(&engine, &self.input) {
            Ok(report) => report,
            Err(e) => {
                let context = format!("Failed to anonymize {}", self.input.display());
                return Ok(report_error(&context, &e));
            }
        };

        if self.show_report {
            println!("📄 Anonymized report:");
            println!("{}", report.text);
            println!();
        }

        tracing::info!(
            report_id = %report.report_id,
            model = model.model_id(),
            "Asking language model"
        );

        let answer = match model.ask(&report.text, &self.question).await {
            Ok(answer) => answer,
            Err(e) => {
                return Ok(report_error(
                    "Language model request failed",
                    &MedAnonError::Service(e),
                ))
            }
        };

        println!("💬 {}", answer.trim());
        println!();

        let history = [
            ChatMessage::user(self.question.clone()),
            ChatMessage::assistant(answer),
        ];
        let usage = ConversationUsage::for_config(&report.text, &history, llm);
        println!("📊 {}", usage.format_line());

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceError;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;

    struct RecordingModel {
        contexts: Mutex<Vec<String>>,
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        fn model_id(&self) -> &str {
            "recording"
        }

        async fn ask(&self, context: &str, _question: &str) -> Result<String, ServiceError> {
            self.contexts.lock().unwrap().push(context.to_string());
            self.reply
                .clone()
                .map_err(|_| ServiceError::QuotaExceeded("daily limit".to_string()))
        }

        async fn insight(&self, _report: &str, _previous: &[String]) -> Result<String, ServiceError> {
            unreachable!()
        }
    }

    fn report_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[tokio::test]
    async fn test_only_anonymized_text_is_sent() {
        let file = report_file("Mrs. Kavita Rao, ph 9876543210. Hb 9.1 g/dL");
        let model = RecordingModel {
            contexts: Mutex::new(Vec::new()),
            reply: Ok("Mild anaemia.".to_string()),
        };
        let args = AskArgs {
            input: file.path().to_path_buf(),
            question: "Is Hb low?".to_string(),
            show_report: false,
        };

        let code = args
            .run(&LlmConfig::default(), Default::default(), &model)
            .await
            .unwrap();

        assert_eq!(code, 0);
        let sent = model.contexts.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].contains("Kavita"));
        assert!(!sent[0].contains("9876543210"));
        assert!(sent[0].contains("[PATIENT_NAME]"));
        assert!(sent[0].contains("Hb 9.1 g/dL"));
    }

    #[tokio::test]
    async fn test_service_failure_exit_code() {
        let file = report_file("Hb 9.1 g/dL");
        let model = RecordingModel {
            contexts: Mutex::new(Vec::new()),
            reply: Err(()),
        };
        let args = AskArgs {
            input: file.path().to_path_buf(),
            question: "Is Hb low?".to_string(),
            show_report: false,
        };

        let code = args
            .run(&LlmConfig::default(), Default::default(), &model)
            .await
            .unwrap();
        assert_eq!(code, 4);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        std::env::remove_var("MEDANON_LLM_API_KEY");
        let file = report_file("Hb 9.1 g/dL");
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("medanon.toml");
        std::fs::write(&config_path, "[llm]\nmodel = \"gemini-1.5-flash\"\n").unwrap();

        let args = AskArgs {
            input: file.path().to_path_buf(),
            question: "Is Hb low?".to_string(),
            show_report: false,
        };
        let code = args.execute(config_path.to_str()).await.unwrap();
        assert_eq!(code, 2);
    }
}
