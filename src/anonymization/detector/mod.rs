//! Protected-term detection
//!
//! Scans raw report text for medicine and dosage vocabulary and produces the
//! [`ProtectedTermSet`] that gates every later redaction decision.

pub mod patterns;

use crate::anonymization::text::contains_word;
use patterns::MedicalPatternRegistry;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Literal medical terms found in one report
///
/// Deduplicated by matched text, not by position: once a string is protected
/// it is protected everywhere in the document. Built fresh per report and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ProtectedTermSet {
    terms: BTreeSet<String>,
    folded: HashSet<String>,
}

impl ProtectedTermSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.folded.insert(term.to_lowercase());
        self.terms.insert(term.to_string());
    }

    /// Exact (case-insensitive) membership
    pub fn contains(&self, text: &str) -> bool {
        self.folded.contains(&text.trim().to_lowercase())
    }

    /// True if `candidate` is a protected term or a whole word inside one
    ///
    /// `"Augmentin"` is covered by the term `"Tab. Augmentin"`.
    pub fn covers(&self, candidate: &str) -> bool {
        let needle = candidate.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.folded.contains(&needle) || self.folded.iter().any(|t| contains_word(t, &needle))
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if no term was found
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate terms in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ProtectedTermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for term in iter {
            set.insert(term.as_ref());
        }
        set
    }
}

/// Medical vocabulary detector
///
/// Pure and deterministic: the same text always yields the same set.
#[derive(Debug, Clone)]
pub struct ProtectedTermDetector {
    registry: Arc<MedicalPatternRegistry>,
}

impl ProtectedTermDetector {
    /// Create a detector over a compiled registry
    pub fn new(registry: Arc<MedicalPatternRegistry>) -> Self {
        Self { registry }
    }

    /// Create a detector with the built-in patterns
    pub fn with_default_patterns() -> crate::domain::Result<Self> {
        Ok(Self::new(Arc::new(MedicalPatternRegistry::default_patterns()?)))
    }

    /// Underlying registry
    pub fn registry(&self) -> &MedicalPatternRegistry {
        &self.registry
    }

    /// Collect every literal medical match in `text`
    pub fn detect(&self, text: &str) -> ProtectedTermSet {
        let mut set = ProtectedTermSet::new();

        for matcher in self.registry.matchers() {
            for found in matcher.regex.find_iter(text) {
                set.insert(found.as_str());
            }
        }

        tracing::debug!(protected_terms = set.len(), "Protected terms detected");
        set
    }

    /// Whether an entity's own text reads as medical vocabulary
    ///
    /// True when it matches any medical matcher, contains a dosage quantity,
    /// or contains one of the entity keywords.
    pub fn is_medical(&self, entity_text: &str) -> bool {
        if self
            .registry
            .matchers()
            .iter()
            .any(|m| m.regex.is_match(entity_text))
        {
            return true;
        }

        if self.registry.dosage_quantity().is_match(entity_text) {
            return true;
        }

        let lowered = entity_text.to_lowercase();
        self.registry
            .keywords()
            .entity
            .iter()
            .any(|k| lowered.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ProtectedTermDetector {
        ProtectedTermDetector::with_default_patterns().unwrap()
    }

    #[test]
    fn test_detect_dosage_form_and_quantity() {
        let set = detector().detect("Tab. Augmentin 625mg twice daily");
        assert!(set.contains("Tab. Augmentin"));
        assert!(set.contains("625mg"));
        assert!(set.contains("augmentin 625mg"));
    }

    #[test]
    fn test_detect_drug_suffix() {
        let set = detector().detect("Started amoxicillin and pantoprazole.");
        assert!(set.contains("amoxicillin"));
        assert!(set.contains("pantoprazole"));
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        let set = detector().detect("CAP. OMEZ 20 MG");
        assert!(set.contains("CAP. OMEZ"));
        assert!(set.contains("20 MG"));
    }

    #[test]
    fn test_detect_is_deterministic() {
        let text = "Hexigel gum paint, massage x 3 days. Enzoflam 1-0-1";
        let a: Vec<String> = detector().detect(text).iter().map(String::from).collect();
        let b: Vec<String> = detector().detect(text).iter().map(String::from).collect();
        assert_eq!(a, b);
        assert!(a.iter().any(|t| t == "Hexigel"));
        assert!(a.iter().any(|t| t == "paint"));
    }

    #[test]
    fn test_dedup_by_literal_text() {
        let set = detector().detect("500mg in the morning, 500mg at night");
        assert_eq!(set.iter().filter(|t| *t == "500mg").count(), 1);
    }

    #[test]
    fn test_detect_nothing_in_plain_text() {
        let set = detector().detect("Patient walked in with a cough.");
        assert!(set.is_empty());
    }

    #[test]
    fn test_covers_whole_words_only() {
        let set: ProtectedTermSet = ["Tab. Augmentin", "625mg"].into_iter().collect();
        assert!(set.covers("Augmentin"));
        assert!(set.covers("augmentin"));
        assert!(!set.covers("Aug"));
        assert!(!set.covers(""));
    }

    #[test]
    fn test_is_medical() {
        let d = detector();
        assert!(d.is_medical("Augmentin"));
        assert!(d.is_medical("Rahul 5mg"));
        assert!(d.is_medical("Cream Base"));
        assert!(d.is_medical("Omeprazole"));
        assert!(!d.is_medical("Rahul Verma"));
        assert!(!d.is_medical("Priya Sharma"));
    }
}
