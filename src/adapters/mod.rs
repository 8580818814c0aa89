//! Adapters for external systems
//!
//! - [`extraction`] turns PDF and text files into report text
//! - [`llm`] sends anonymized reports to a language model

pub mod extraction;
pub mod llm;
