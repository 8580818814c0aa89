//! Recognized entity data models

use crate::anonymization::text::Span;
use crate::domain::Placeholder;
use serde::{Deserialize, Serialize};

/// Semantic category assigned by an entity recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    /// Person names
    Person,
    /// Calendar dates
    Date,
    /// Organizations (hospitals, labs)
    Organization,
    /// Places
    Location,
    /// Anything else a backend may emit
    Other,
}

impl EntityCategory {
    /// Label used by recognizer backends (spaCy-style)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Date => "DATE",
            Self::Organization => "ORG",
            Self::Location => "GPE",
            Self::Other => "MISC",
        }
    }

    /// Parse a backend label, mapping unknown labels to [`EntityCategory::Other`]
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "PERSON" | "PER" => Self::Person,
            "DATE" => Self::Date,
            "ORG" | "ORGANIZATION" => Self::Organization,
            "GPE" | "LOC" | "LOCATION" => Self::Location,
            _ => Self::Other,
        }
    }

    /// Placeholder written over entities of this category, if they are redacted at all
    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            Self::Person => Some(Placeholder::PersonName),
            Self::Date => Some(Placeholder::Date),
            Self::Organization | Self::Location | Self::Other => None,
        }
    }
}

/// A recognized named span of text
///
/// `start` and `end` are byte offsets into the exact buffer that was handed to
/// the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Matched text
    pub text: String,
    /// Assigned category
    pub category: EntityCategory,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Entity {
    /// Create an entity from the buffer it was found in
    pub fn from_span(source: &str, category: EntityCategory, span: Span) -> Self {
        Self {
            text: source[span.start..span.end].to_string(),
            category,
            start: span.start,
            end: span.end,
        }
    }

    /// Byte span of the entity
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Whether the entity already contains a placeholder fragment
    pub fn is_already_redacted(&self) -> bool {
        self.text.contains('[')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(EntityCategory::from_label("PERSON"), EntityCategory::Person);
        assert_eq!(EntityCategory::from_label("per"), EntityCategory::Person);
        assert_eq!(EntityCategory::from_label("DATE"), EntityCategory::Date);
        assert_eq!(EntityCategory::from_label("CARDINAL"), EntityCategory::Other);
    }

    #[test]
    fn test_placeholder_mapping() {
        assert_eq!(
            EntityCategory::Person.placeholder(),
            Some(Placeholder::PersonName)
        );
        assert_eq!(EntityCategory::Date.placeholder(), Some(Placeholder::Date));
        assert_eq!(EntityCategory::Organization.placeholder(), None);
    }

    #[test]
    fn test_entity_from_span() {
        let text = "seen by Rahul Verma today";
        let entity = Entity::from_span(text, EntityCategory::Person, Span::new(8, 19));
        assert_eq!(entity.text, "Rahul Verma");
        assert_eq!(entity.span(), Span::new(8, 19));
        assert!(!entity.is_already_redacted());
    }
}
