//! Gemini REST client
//!
//! Calls `POST {base_url}/models/{model}:generateContent?key=...` and returns
//! the text of the first candidate. Requests are never retried.

use super::{prompts, ChatModel};
use crate::config::{LlmConfig, SecretString};
use crate::domain::ServiceError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini `generateContent` client
///
/// # Example
///
/// ```no_run
/// use medanon::adapters::llm::{ChatModel, GeminiClient};
/// use medanon::config::LlmConfig;
///
/// # async fn example() -> Result<(), medanon::domain::ServiceError> {
/// let client = GeminiClient::new(&LlmConfig::default())?;
/// let answer = client.ask("[PATIENT_NAME], Hb 9.1 g/dL", "Is this anaemia?").await?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client from the LLM configuration
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotConfigured`] if no API key is set or the
    /// HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, ServiceError> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .cloned()
            .ok_or_else(|| {
                ServiceError::NotConfigured(
                    "llm.api_key is not set (use MEDANON_LLM_API_KEY)".to_string(),
                )
            })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ServiceError::NotConfigured(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Send one prompt and return the generated text
    pub async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling language model");

        let key: &str = self.api_key.expose_secret().as_ref();
        let resp = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(map_status(status, message));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                ServiceError::InvalidResponse("response contained no candidate text".to_string())
            })
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn ask(&self, context: &str, question: &str) -> Result<String, ServiceError> {
        self.generate(&prompts::chat_prompt(context, question)).await
    }

    async fn insight(&self, report: &str, previous: &[String]) -> Result<String, ServiceError> {
        let text = self
            .generate(&prompts::insight_prompt(report, previous))
            .await?;
        Ok(text.trim().to_string())
    }
}

fn map_send_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(err.to_string())
    } else {
        ServiceError::Network(err.to_string())
    }
}

fn map_status(status: StatusCode, message: String) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::QuotaExceeded(message),
        _ => ServiceError::Http {
            status: status.as_u16(),
            message,
        },
    }
}
