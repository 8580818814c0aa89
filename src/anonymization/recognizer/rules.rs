//! Rule and gazetteer based entity recognizer
//!
//! Finds PERSON entities from label cues (`Name:`, `Referred by`, ...) and
//! from capitalized runs that start with a known given name, and DATE
//! entities from common numeric and written date formats.

use super::gazetteer::Gazetteer;
use super::{EntityRecognizer, EntityStream};
use crate::anonymization::config::RecognizerConfig;
use crate::anonymization::models::{Entity, EntityCategory};
use crate::anonymization::text::{words_with_offsets, Span};
use crate::domain::{ClassificationError, MedAnonError, Result};
use regex::Regex;

const MAX_NAME_WORDS: usize = 4;

const NAME_WORD: &str = r"[A-Z][A-Za-z\x27\-]+";

const MONTHS: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

// Capitalized words that end (or never start) a name run.
const STOP_WORDS: &[&str] = &[
    "TAB", "TABLET", "CAP", "CAPSULE", "INJ", "INJECTION", "SYP", "SYRUP", "RX", "ADV", "ADVICE",
    "DR", "DOCTOR", "MR", "MRS", "MS", "MISS", "MASTER", "AGE", "SEX", "MALE", "FEMALE", "DATE",
    "PATIENT", "PERSON", "NAME", "ID", "UHID", "MRN", "PHONE", "EMAIL", "WEB", "HOSPITAL",
    "CLINIC", "DEPT", "DEPARTMENT", "OPD", "IPD", "DIAGNOSIS", "HISTORY", "COMPLAINT",
    "COMPLAINTS", "EXAMINATION", "IMPRESSION", "REPORT", "PHYSICIAN", "SURGEON", "CONSULTANT",
    "DENTIST", "MBBS", "MD", "BDS", "MDS", "THE", "AND", "OF", "WITH", "FOR", "ON", "AT", "MONDAY",
    "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY", "SUNDAY",
];

/// Built-in recognizer backed by a given-name gazetteer and date patterns
#[derive(Debug, Clone)]
pub struct RuleBasedRecognizer {
    gazetteer: Gazetteer,
    min_name_length: usize,
    capitalized_run: Regex,
    label_cues: Vec<Regex>,
    date_patterns: Vec<Regex>,
}

impl RuleBasedRecognizer {
    /// Create a recognizer over a gazetteer
    pub fn new(gazetteer: Gazetteer, min_name_length: usize) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                MedAnonError::RecognizerUnavailable(format!("Invalid recognizer pattern: {e}"))
            })
        };

        let capitalized_run = compile(&format!(r"\b{NAME_WORD}(?:[ \t]+{NAME_WORD})*"))?;

        let name_group = format!(r"(?P<name>{NAME_WORD}(?:[ \t]+{NAME_WORD}){{0,3}})");
        let label_cues = vec![
            compile(&format!(
                r"\b(?:Patient[ \t]+Name|Name|Patient)[ \t]*:[ \t]*{name_group}"
            ))?,
            compile(&format!(
                r"\b(?:Referred[ \t]+by|Consultant|Signed[ \t]+by)[ \t]*:?[ \t]*{name_group}"
            ))?,
        ];

        let date_patterns = vec![
            compile(r"\b\d{4}-\d{2}-\d{2}\b")?,
            compile(r"\b\d{1,2}[/\-.]\d{1,2}[/\-.](?:\d{4}|\d{2})\b")?,
            compile(&format!(
                r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?[ \t]+{MONTHS}\.?,?[ \t]+\d{{4}}\b"
            ))?,
            compile(&format!(
                r"(?i)\b{MONTHS}\.?[ \t]+\d{{1,2}}(?:st|nd|rd|th)?,?[ \t]+\d{{4}}\b"
            ))?,
            compile(&format!(r"\b{MONTHS}[ \t]+\d{{4}}\b"))?,
        ];

        Ok(Self {
            gazetteer,
            min_name_length,
            capitalized_run,
            label_cues,
            date_patterns,
        })
    }

    /// Create a recognizer from configuration
    ///
    /// The built-in given-name list is always loaded; a configured gazetteer
    /// file extends it and must be readable and non-empty.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self> {
        let mut gazetteer = Gazetteer::builtin();
        if let Some(ref path) = config.gazetteer_path {
            gazetteer.extend(Gazetteer::from_file(path)?);
        }
        Self::new(gazetteer, config.min_name_length)
    }

    /// Create a recognizer with the built-in gazetteer
    pub fn with_builtin_gazetteer() -> Result<Self> {
        Self::from_config(&RecognizerConfig::default())
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    fn find_dates(&self, text: &str) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();
        for pattern in &self.date_patterns {
            for found in pattern.find_iter(text) {
                let span = Span::new(found.start(), found.end());
                if !spans.iter().any(|s| s.overlaps(&span)) {
                    spans.push(span);
                }
            }
        }
        spans
    }

    fn find_labelled_names(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for cue in &self.label_cues {
            for caps in cue.captures_iter(text) {
                let Some(name) = caps.name("name") else {
                    continue;
                };
                let words = words_with_offsets(name.as_str());
                let kept = words.iter().take_while(|(_, w)| !is_stop_word(w)).count();
                if let Some(span) = name_span(name.start(), &words[..kept]) {
                    spans.push(span);
                }
            }
        }
        spans
    }

    fn find_gazetteer_names(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for run in self.capitalized_run.find_iter(text) {
            let words = words_with_offsets(run.as_str());
            let mut i = 0;
            while i < words.len() {
                let word = words[i].1;
                if is_stop_word(word) || !self.gazetteer.contains(strip_possessive(word)) {
                    i += 1;
                    continue;
                }

                let mut j = i + 1;
                while j < words.len()
                    && j - i < MAX_NAME_WORDS
                    && !is_stop_word(words[j].1)
                    && strip_possessive(words[j - 1].1) == words[j - 1].1
                {
                    j += 1;
                }

                if let Some(span) = name_span(run.start(), &words[i..j]) {
                    spans.push(span);
                }
                i = j;
            }
        }
        spans
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn backend_id(&self) -> &str {
        "rules"
    }

    fn recognize<'a>(
        &'a self,
        text: &'a str,
    ) -> std::result::Result<EntityStream<'a>, ClassificationError> {
        let mut claimed: Vec<(Span, EntityCategory)> = self
            .find_dates(text)
            .into_iter()
            .map(|span| (span, EntityCategory::Date))
            .collect();

        let people = self
            .find_labelled_names(text)
            .into_iter()
            .chain(self.find_gazetteer_names(text));
        for span in people {
            if text[span.start..span.end].chars().count() < self.min_name_length {
                continue;
            }
            if !claimed.iter().any(|(s, _)| s.overlaps(&span)) {
                claimed.push((span, EntityCategory::Person));
            }
        }

        claimed.sort_by_key(|(span, _)| *span);

        let entities = claimed
            .into_iter()
            .map(move |(span, category)| {
                Ok::<_, ClassificationError>(Entity::from_span(text, category, span))
            });
        Ok(Box::new(entities))
    }
}

fn is_stop_word(word: &str) -> bool {
    let upper = strip_possessive(word).to_uppercase();
    STOP_WORDS.contains(&upper.as_str())
}

fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .unwrap_or(word)
        .trim_end_matches(['\'', '-'])
}

/// Span covering `words` (offsets relative to `base`), minus a trailing possessive
fn name_span(base: usize, words: &[(usize, &str)]) -> Option<Span> {
    let (first_offset, _) = words.first()?;
    let (last_offset, last_word) = words.last()?;
    let end = base + last_offset + strip_possessive(last_word).len();
    let start = base + first_offset;
    (end > start).then(|| Span::new(start, end))
}
