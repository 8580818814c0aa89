//! Anonymization module for medanon
//!
//! This module removes personally identifying information from free-text
//! medical reports while keeping medical vocabulary (drug names, dosages,
//! instructions) intact.
//!
//! # Architecture
//!
//! The anonymization pipeline consists of:
//! - **Detection**: medical-pattern matching that yields the protected-term set
//! - **Deterministic redaction**: ordered regex rules for phones, emails, URLs,
//!   titled names, ages and IDs
//! - **Entity redaction**: recognizer-driven PERSON/DATE redaction with
//!   protected-term precedence and context windows
//! - **Audit**: structured per-report logging with hashed inputs
//!
//! # Usage
//!
//! ```rust,ignore
//! use medanon::anonymization::{AnonymizationEngine, AnonymizationConfig};
//!
//! let engine = AnonymizationEngine::from_config(AnonymizationConfig::default())?;
//! let anonymized = engine.anonymize_text("Dr. Sharma, ph 9876543210")?;
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod recognizer;
pub mod redactor;
pub mod report;
pub mod text;

// Re-export main types
pub use config::{AnonymizationConfig, AuditConfig, RecognizerConfig};
pub use detector::{ProtectedTermDetector, ProtectedTermSet};
pub use engine::AnonymizationEngine;
pub use models::{Entity, EntityCategory};
pub use recognizer::{EntityRecognizer, EntityStream, RuleBasedRecognizer};
pub use report::{BatchFailure, BatchSummary};
