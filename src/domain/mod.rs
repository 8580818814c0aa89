//! Domain models and types for medanon.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Report models** ([`RawReport`], [`AnonymizedReport`], [`ReportStats`])
//! - **Placeholder vocabulary** ([`Placeholder`])
//! - **Error types** ([`MedAnonError`], [`ExtractionError`], [`ClassificationError`], [`ServiceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MedAnonError>`]:
//!
//! ```rust,no_run
//! use medanon::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = medanon::config::load_config("medanon.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod placeholder;
pub mod report;
pub mod result;

pub use errors::{ClassificationError, ExtractionError, MedAnonError, ServiceError};
pub use placeholder::Placeholder;
pub use report::{estimate_tokens, AnonymizedReport, RawReport, ReportStats};
pub use result::Result;
