//! Deterministic regex redaction
//!
//! Applies the ordered [`PatternRule`] table. This stage never consults the
//! protected-term set: phone numbers, emails, URLs, titled names, ages and IDs
//! are never legitimate medical vocabulary.

use crate::anonymization::text::{words_with_offsets, Span};
use crate::domain::{MedAnonError, Placeholder, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashSet;

/// Rule definition from TOML
#[derive(Debug, Clone, Deserialize)]
struct RuleDefinition {
    name: String,
    placeholder: Placeholder,
    replacement: String,
    patterns: Vec<String>,
    #[serde(default)]
    stop_words: Vec<String>,
    #[serde(default)]
    min_digits: usize,
    #[serde(default)]
    defer_to: Vec<String>,
}

/// Rule library container
#[derive(Debug, Deserialize)]
struct RuleLibrary {
    #[serde(rename = "rule")]
    rules: Vec<RuleDefinition>,
}

/// A named substitution writing one placeholder tag over every match
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    placeholder: Placeholder,
    regexes: Vec<Regex>,
    replacement: String,
    stop_words: HashSet<String>,
    min_digits: usize,
    /// Indices of later rules whose matches this rule leaves alone
    deferred: Vec<usize>,
}

impl PatternRule {
    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder this rule writes
    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// Check whether any of the rule's patterns matches `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.regexes.iter().any(|r| r.is_match(text))
    }

    /// Rewrite every match in `text`
    pub fn apply(&self, text: &str) -> String {
        self.apply_around(text, &[])
    }

    /// Rewrite every match in `text` that does not overlap a match of one of
    /// the `reserved_by` rules
    fn apply_around(&self, text: &str, reserved_by: &[&PatternRule]) -> String {
        let mut current = text.to_string();
        for regex in &self.regexes {
            let reserved = reserved_spans(&current, reserved_by);
            let rewritten = regex.replace_all(&current, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let overlaps_reserved = caps.get(0).is_some_and(|m| {
                    let span = Span::new(m.start(), m.end());
                    reserved.iter().any(|r| r.overlaps(&span))
                });
                if overlaps_reserved || digit_count(whole) < self.min_digits {
                    return whole.to_string();
                }
                if self.stop_words.is_empty() {
                    let mut out = String::new();
                    caps.expand(&self.replacement, &mut out);
                    out
                } else {
                    self.replace_titled(caps)
                }
            });
            if let Cow::Owned(s) = rewritten {
                current = s;
            }
        }
        current
    }

    /// Replace a titled name, stopping at the first stop word
    ///
    /// `"Dr. Sharma Tab"` becomes `"[DOCTOR_NAME] Tab"`. If the very first
    /// word after the title is a stop word the match is left untouched.
    fn replace_titled(&self, caps: &Captures<'_>) -> String {
        let whole = &caps[0];
        let Some(name) = caps.name("name") else {
            return whole.to_string();
        };
        let name_offset = name.start() - caps.get(0).map_or(0, |m| m.start());

        let cut = words_with_offsets(name.as_str())
            .into_iter()
            .find(|(_, word)| self.is_stop_word(word))
            .map(|(offset, _)| offset);

        match cut {
            None => self.replacement.clone(),
            Some(0) => whole.to_string(),
            Some(offset) => {
                let kept = name.as_str()[..offset].trim_end();
                let rest = &whole[name_offset + kept.len()..];
                format!("{}{rest}", self.replacement)
            }
        }
    }

    fn is_stop_word(&self, word: &str) -> bool {
        let word = word.trim_end_matches(['.', ':', ',']);
        self.stop_words.contains(&word.to_uppercase())
    }
}

fn reserved_spans(text: &str, rules: &[&PatternRule]) -> Vec<Span> {
    rules
        .iter()
        .flat_map(|rule| rule.regexes.iter())
        .flat_map(|regex| regex.find_iter(text))
        .map(|m| Span::new(m.start(), m.end()))
        .collect()
}

fn digit_count(s: &str) -> usize {
    s.bytes().filter(u8::is_ascii_digit).count()
}

/// Ordered deterministic redactor
#[derive(Debug, Clone)]
pub struct DeterministicRedactor {
    rules: Vec<PatternRule>,
}

impl DeterministicRedactor {
    /// Create the built-in redactor
    pub fn new() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/redaction_rules.toml");
        Self::from_toml(default_toml)
    }

    /// Create a redactor from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: RuleLibrary = toml::from_str(content).map_err(|e| {
            MedAnonError::Configuration(format!("Failed to parse redaction rules: {e}"))
        })?;

        let defer_names: Vec<Vec<String>> =
            library.rules.iter().map(|def| def.defer_to.clone()).collect();
        let mut rules = library
            .rules
            .into_iter()
            .map(Self::compile_rule)
            .collect::<Result<Vec<_>>>()?;

        for (index, names) in defer_names.iter().enumerate() {
            let mut deferred = Vec::with_capacity(names.len());
            for name in names {
                let target = rules
                    .iter()
                    .position(|r| &r.name == name)
                    .filter(|&t| t > index)
                    .ok_or_else(|| {
                        MedAnonError::Configuration(format!(
                            "Rule '{}' defers to '{name}', which is not a later rule",
                            rules[index].name
                        ))
                    })?;
                deferred.push(target);
            }
            rules[index].deferred = deferred;
        }

        Ok(Self { rules })
    }

    fn compile_rule(def: RuleDefinition) -> Result<PatternRule> {
        if !def.replacement.contains(def.placeholder.tag()) {
            return Err(MedAnonError::Configuration(format!(
                "Rule '{}' replacement must contain {}",
                def.name,
                def.placeholder.tag()
            )));
        }

        let mut regexes = Vec::with_capacity(def.patterns.len());
        for pattern in &def.patterns {
            let regex = Regex::new(pattern).map_err(|e| {
                MedAnonError::Configuration(format!(
                    "Invalid regex in rule '{}': {pattern}: {e}",
                    def.name
                ))
            })?;

            if !def.stop_words.is_empty() && !regex.capture_names().any(|n| n == Some("name")) {
                return Err(MedAnonError::Configuration(format!(
                    "Rule '{}' uses stop_words but has no `name` group",
                    def.name
                )));
            }
            regexes.push(regex);
        }

        Ok(PatternRule {
            name: def.name,
            placeholder: def.placeholder,
            regexes,
            replacement: def.replacement,
            stop_words: def.stop_words.iter().map(|w| w.to_uppercase()).collect(),
            min_digits: def.min_digits,
            deferred: Vec::new(),
        })
    }

    /// Rules in application order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Apply every rule, in order, to `text`
    pub fn redact(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            let reserved_by: Vec<&PatternRule> =
                rule.deferred.iter().map(|&i| &self.rules[i]).collect();
            current = rule.apply_around(&current, &reserved_by);
        }
        current
    }
}
