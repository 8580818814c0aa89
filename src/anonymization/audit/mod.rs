//! Audit logging module
//!
//! Records one entry per anonymized report. Entries carry counts and a hash
//! of the input, never report text.

pub mod logger;

pub use logger::{hash_text, AuditLogger};
