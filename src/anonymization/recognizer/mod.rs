//! Named-entity recognition
//!
//! The entity pass depends only on the [`EntityRecognizer`] trait. Backends
//! are constructed once at startup and shared read-only behind an `Arc`.
//! [`RuleBasedRecognizer`] is the built-in backend; other backends (a model
//! server, a bundled statistical tagger) plug in by implementing the trait.

pub mod gazetteer;
pub mod rules;

pub use gazetteer::Gazetteer;
pub use rules::RuleBasedRecognizer;

use crate::anonymization::config::RecognizerConfig;
use crate::anonymization::models::Entity;
use crate::domain::{ClassificationError, Result};
use std::sync::Arc;

/// Lazy, finite, non-restartable sequence of recognized entities
///
/// Any item may be an error; consumers must stop at the first one.
pub type EntityStream<'a> =
    Box<dyn Iterator<Item = std::result::Result<Entity, ClassificationError>> + 'a>;

/// Pluggable named-entity recognizer
pub trait EntityRecognizer: Send + Sync {
    /// Human-readable backend identifier (e.g. "rules", "spacy")
    fn backend_id(&self) -> &str;

    /// Recognize entities in `text`
    ///
    /// Entity offsets index `text` exactly as passed.
    fn recognize<'a>(
        &'a self,
        text: &'a str,
    ) -> std::result::Result<EntityStream<'a>, ClassificationError>;
}

/// Build the built-in recognizer from configuration
///
/// Fails with [`crate::domain::MedAnonError::RecognizerUnavailable`] if the
/// configured gazetteer cannot be loaded.
pub fn build_recognizer(config: &RecognizerConfig) -> Result<Arc<dyn EntityRecognizer>> {
    let recognizer = RuleBasedRecognizer::from_config(config)?;
    tracing::info!(
        backend = recognizer.backend_id(),
        gazetteer_size = recognizer.gazetteer().len(),
        "Entity recognizer ready"
    );
    Ok(Arc::new(recognizer))
}
