//! Entity classification and redaction
//!
//! Runs the injected recognizer over an immutable snapshot of the partially
//! redacted text, decides redact-or-preserve per entity, and rebuilds the
//! output in a single splice.

use crate::anonymization::detector::{ProtectedTermDetector, ProtectedTermSet};
use crate::anonymization::models::{Entity, EntityCategory};
use crate::anonymization::recognizer::EntityRecognizer;
use crate::anonymization::text::{splice, window_around, window_before, word_occurrences, Span};
use crate::domain::{ClassificationError, MedAnonError, Placeholder, Result};
use regex::Regex;
use std::sync::Arc;

/// Outcome of the entity pass over one document
#[derive(Debug, Clone)]
pub struct EntityPass {
    /// Rewritten text
    pub text: String,
    /// Entities that were redacted
    pub redacted: usize,
    /// PERSON/DATE entities kept as medical vocabulary or by context
    pub preserved: usize,
}

/// Decision for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Redact(Placeholder),
    Preserve,
    Ignore,
}

/// Entity-level redactor
#[derive(Clone)]
pub struct EntityRedactor {
    recognizer: Arc<dyn EntityRecognizer>,
    detector: ProtectedTermDetector,
    placeholder_tag: Regex,
    prefix_window: usize,
    context_window: usize,
}

impl std::fmt::Debug for EntityRedactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRedactor")
            .field("recognizer", &self.recognizer.backend_id())
            .field("prefix_window", &self.prefix_window)
            .field("context_window", &self.context_window)
            .finish()
    }
}

impl EntityRedactor {
    pub fn new(
        recognizer: Arc<dyn EntityRecognizer>,
        detector: ProtectedTermDetector,
        prefix_window: usize,
        context_window: usize,
    ) -> Result<Self> {
        let placeholder_tag = Regex::new(r"\[[A-Z_]+\]")
            .map_err(|e| MedAnonError::Configuration(format!("Invalid placeholder pattern: {e}")))?;

        Ok(Self {
            recognizer,
            detector,
            placeholder_tag,
            prefix_window,
            context_window,
        })
    }

    /// Recognizer backend in use
    pub fn backend_id(&self) -> &str {
        self.recognizer.backend_id()
    }

    /// Redact PERSON and DATE entities in `text`
    ///
    /// Any recognizer error, at start or mid-stream, fails the whole
    /// document; no partially redacted text is returned.
    pub fn redact(&self, text: &str, protected: &ProtectedTermSet) -> Result<EntityPass> {
        let snapshot = text;
        let existing_tags: Vec<Span> = self
            .placeholder_tag
            .find_iter(snapshot)
            .map(|m| Span::new(m.start(), m.end()))
            .collect();

        let mut planned: Vec<(Span, Placeholder)> = Vec::new();
        let mut redacted = 0;
        let mut preserved = 0;

        for entity in self.recognizer.recognize(snapshot)? {
            let entity = entity?;
            validate_offsets(self.backend_id(), snapshot, &entity)?;

            let placeholder = match self.classify(snapshot, &entity, protected) {
                Verdict::Redact(placeholder) => placeholder,
                Verdict::Preserve => {
                    preserved += 1;
                    continue;
                }
                Verdict::Ignore => continue,
            };
            redacted += 1;

            let mut spans = word_occurrences(snapshot, &entity.text);
            if !spans.contains(&entity.span()) {
                spans.push(entity.span());
            }

            for span in spans {
                let inside_tag = existing_tags.iter().any(|t| t.overlaps(&span));
                let claimed = planned.iter().any(|(p, _)| p.overlaps(&span));
                if !inside_tag && !claimed {
                    planned.push((span, placeholder));
                }
            }
        }

        planned.sort_by_key(|(span, _)| *span);
        let replacements: Vec<(Span, &str)> = planned
            .iter()
            .map(|(span, placeholder)| (*span, placeholder.tag()))
            .collect();

        tracing::debug!(
            backend = self.backend_id(),
            redacted,
            preserved,
            occurrences = replacements.len(),
            "Entity pass complete"
        );

        Ok(EntityPass {
            text: splice(snapshot, &replacements),
            redacted,
            preserved,
        })
    }

    fn classify(&self, snapshot: &str, entity: &Entity, protected: &ProtectedTermSet) -> Verdict {
        match entity.category {
            EntityCategory::Date => {
                if entity.is_already_redacted() {
                    Verdict::Ignore
                } else if protected.covers(&entity.text) {
                    Verdict::Preserve
                } else {
                    Verdict::Redact(Placeholder::Date)
                }
            }
            EntityCategory::Person => {
                if entity.is_already_redacted() {
                    Verdict::Ignore
                } else if protected.covers(&entity.text)
                    || self.detector.is_medical(&entity.text)
                    || self.has_medical_context(snapshot, entity.span())
                {
                    Verdict::Preserve
                } else {
                    Verdict::Redact(Placeholder::PersonName)
                }
            }
            EntityCategory::Organization | EntityCategory::Location | EntityCategory::Other => {
                Verdict::Ignore
            }
        }
    }

    fn has_medical_context(&self, snapshot: &str, span: Span) -> bool {
        let keywords = self.detector.registry().keywords();

        let prefix = window_before(snapshot, span.start, self.prefix_window).to_lowercase();
        if keywords.prefix.iter().any(|k| prefix.contains(k.as_str())) {
            return true;
        }

        let context = window_around(snapshot, span, self.context_window).to_lowercase();
        keywords.window.iter().any(|k| context.contains(k.as_str()))
    }
}

fn validate_offsets(
    backend: &str,
    snapshot: &str,
    entity: &Entity,
) -> std::result::Result<(), ClassificationError> {
    let valid = entity.start < entity.end
        && snapshot.get(entity.start..entity.end) == Some(entity.text.as_str());
    if valid {
        Ok(())
    } else {
        Err(ClassificationError::new(
            backend,
            format!(
                "entity offsets {}..{} do not index the input",
                entity.start, entity.end
            ),
        ))
    }
}
