// Medanon - Medical report anonymizer
// Copyright (c) 2025 Medanon Contributors
// Licensed under the MIT License

//! # medanon - Medical report anonymizer
//!
//! medanon removes personally identifying information from free-text medical
//! reports (prescriptions, lab reports, discharge summaries) while keeping
//! the medically meaningful content intact, so the text can be handed to a
//! language model.
//!
//! ## Overview
//!
//! - **Extracting** text from PDF and plain-text reports
//! - **Detecting** protected medical terms (dosage forms, drug names, brands)
//! - **Redacting** phones, emails, URLs, titled names, ages and IDs with
//!   deterministic rules
//! - **Redacting** remaining person names and dates found by an entity
//!   recognizer, unless they are protected or in clinical context
//! - **Asking** a language model about the anonymized report
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Detection, redaction, the pipeline engine and audit
//! - [`adapters`] - Text extraction and the language model client
//! - [`domain`] - Report types, placeholders and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medanon::anonymization::{AnonymizationConfig, AnonymizationEngine};
//!
//! fn main() -> medanon::domain::Result<()> {
//!     let engine = AnonymizationEngine::from_config(AnonymizationConfig::default())?;
//!
//!     let report = engine.anonymize_text(
//!         "Tab. Augmentin 625mg twice daily. Dr. Sharma advised rest. Contact: 9876543210",
//!     )?;
//!
//!     // Tab. Augmentin 625mg twice daily. [DOCTOR_NAME] advised rest. Contact: [PHONE]
//!     println!("{}", report.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Placeholders
//!
//! Output only ever contains these tags in place of removed text:
//! `[PHONE]`, `[EMAIL]`, `[WEB]`, `[DOCTOR_NAME]`, `[PATIENT_NAME]`,
//! `[PERSON_NAME]`, `[DATE]`, `[AGE]`, `[PATIENT_ID]`, `[ID]`.
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], backed by
//! [`domain::MedAnonError`]. A report whose entity pass failed is an error;
//! partially redacted text is never returned.
//!
//! ```rust,no_run
//! use medanon::domain::MedAnonError;
//!
//! fn example() -> Result<(), MedAnonError> {
//!     let config = medanon::config::load_config("medanon.toml")?;
//!     let raw = medanon::adapters::extraction::extract_file("report.pdf".as_ref())?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
