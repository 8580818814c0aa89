//! Domain error types
//!
//! This module defines the error hierarchy for medanon. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main medanon error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MedAnonError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The entity recognizer could not be constructed. Fatal at startup.
    #[error("Entity recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    /// Text extraction errors
    #[error("Could not extract text: {0}")]
    Extraction(#[from] ExtractionError),

    /// Entity recognition failed mid-document
    #[error("Entity classification failed: {0}")]
    Classification(#[from] ClassificationError),

    /// Downstream language-model errors
    #[error("Language model service error: {0}")]
    Service(#[from] ServiceError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Audit trail errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Text extraction errors
///
/// Raised by the extraction collaborator before the pipeline ever sees the
/// text. No partial output is produced.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PDF could not be parsed
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    /// The PDF is encrypted
    #[error("PDF is encrypted")]
    Encrypted,

    /// Extraction succeeded but produced no text (e.g. scanned image PDF)
    #[error("document contains no extractable text")]
    NoText,

    /// Input bytes are not valid UTF-8
    #[error("Text encoding error: {0}")]
    Encoding(String),

    /// File type not handled by any extractor
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}

/// Entity recognition failure
///
/// Propagated as-is: a document whose entity pass failed must never be
/// returned as if it were anonymized.
#[derive(Debug, Error)]
#[error("{backend}: {message}")]
pub struct ClassificationError {
    /// Recognizer backend identifier
    pub backend: String,
    /// Failure description
    pub message: String,
}

impl ClassificationError {
    /// Creates a new classification error
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

/// Language model service errors
///
/// These errors don't expose the HTTP client types. The core never retries.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No API key or provider configured
    #[error("Language model not configured: {0}")]
    NotConfigured(String),

    /// Authentication failed (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Quota or rate limit exceeded (429)
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Network/connection errors
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other non-success status
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },
}

impl From<std::io::Error> for MedAnonError {
    fn from(err: std::io::Error) -> Self {
        MedAnonError::Io(err.to_string())
    }
}

impl From<std::io::Error> for ExtractionError {
    fn from(err: std::io::Error) -> Self {
        ExtractionError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MedAnonError {
    fn from(err: serde_json::Error) -> Self {
        MedAnonError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MedAnonError {
    fn from(err: toml::de::Error) -> Self {
        MedAnonError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl MedAnonError {
    /// Process exit code for this error
    ///
    /// 2 = configuration, 3 = extraction, 4 = downstream service, 5 = fatal.
    /// A language model with no API key counts as a configuration error.
    pub fn exit_code(&self) -> i32 {
        match self {
            MedAnonError::Configuration(_)
            | MedAnonError::Validation(_)
            | MedAnonError::Service(ServiceError::NotConfigured(_)) => 2,
            MedAnonError::Extraction(_) => 3,
            MedAnonError::Service(_) => 4,
            _ => 5,
        }
    }
}
