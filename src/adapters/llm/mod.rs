//! Downstream language model adapter
//!
//! The anonymized report is the only report text that ever leaves the
//! process. [`ChatModel`] abstracts the provider; [`GeminiClient`] talks to
//! the Gemini `generateContent` REST endpoint.

pub mod gemini;
pub mod prompts;
pub mod usage;

pub use gemini::GeminiClient;
pub use usage::{ChatMessage, ConversationUsage};

use crate::domain::ServiceError;
use async_trait::async_trait;

/// A text-generation service answering questions about anonymized reports
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, used in logs
    fn model_id(&self) -> &str;

    /// Answer `question` using the anonymized report as context
    async fn ask(&self, context: &str, question: &str) -> Result<String, ServiceError>;

    /// One-line insight for a report, optionally against earlier reports
    async fn insight(&self, report: &str, previous: &[String]) -> Result<String, ServiceError>;
}
