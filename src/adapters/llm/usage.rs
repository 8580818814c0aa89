//! Token and cost accounting for a report conversation

use crate::config::LlmConfig;
use crate::domain::estimate_tokens;
use serde::{Deserialize, Serialize};

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation about a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Estimated token usage and cost of a conversation
///
/// Cost assumes half the tokens are billed as input and half as output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversationUsage {
    pub report_tokens: usize,
    pub chat_tokens: usize,
    pub total_tokens: usize,
    pub estimated_cost: f64,
}

impl ConversationUsage {
    /// Account for a report plus its chat history at the given per-1k rates
    pub fn estimate(
        report: &str,
        history: &[ChatMessage],
        input_cost_per_1k: f64,
        output_cost_per_1k: f64,
    ) -> Self {
        let report_tokens = estimate_tokens(report);
        let chat_tokens = history.iter().map(|m| estimate_tokens(&m.content)).sum();
        let total_tokens = report_tokens + chat_tokens;

        let half = total_tokens as f64 * 0.5 / 1000.0;
        let estimated_cost = half * input_cost_per_1k + half * output_cost_per_1k;

        Self {
            report_tokens,
            chat_tokens,
            total_tokens,
            estimated_cost,
        }
    }

    /// Account using the rates from the LLM configuration
    pub fn for_config(report: &str, history: &[ChatMessage], config: &LlmConfig) -> Self {
        Self::estimate(
            report,
            history,
            config.input_cost_per_1k,
            config.output_cost_per_1k,
        )
    }

    /// One-line console rendering
    pub fn format_line(&self) -> String {
        format!(
            "Tokens: {} (report {}, chat {}) | Estimated cost: ${:.6}",
            self.total_tokens, self.report_tokens, self.chat_tokens, self.estimated_cost
        )
    }
}
