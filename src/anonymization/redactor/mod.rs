//! Redaction stages
//!
//! [`DeterministicRedactor`] handles high-confidence PII with ordered regex
//! rules; [`EntityRedactor`] handles recognizer-found PERSON and DATE
//! entities, gated by the protected-term set.

pub mod deterministic;
pub mod entity;

pub use deterministic::{DeterministicRedactor, PatternRule};
pub use entity::{EntityPass, EntityRedactor};
