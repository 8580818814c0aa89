//! Medical pattern library for protected-term detection

use crate::domain::{MedAnonError, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;

/// Family a medical matcher belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Dosage-form prefix followed by a drug name ("Tab. X")
    DosageForm,
    /// Common drug-name suffixes ("-cillin", "-prazole")
    DrugSuffix,
    /// Dosage quantities ("625mg")
    Dosage,
    /// Curated brand names
    Brand,
    /// Topical forms ("gel paint")
    Topical,
}

/// Matcher definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherDefinition {
    /// Matcher name, used in error messages and logs
    pub name: String,
    /// Matcher family
    pub kind: MatcherKind,
    /// Raw regex patterns
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Literal terms, matched as case-insensitive word prefixes
    #[serde(default)]
    pub terms: Vec<String>,
}

/// Context keyword definitions from TOML
#[derive(Debug, Clone, Deserialize)]
struct ContextDefinition {
    dosage_quantity: String,
    entity_keywords: Vec<String>,
    prefix_keywords: Vec<String>,
    window_keywords: Vec<String>,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(rename = "matcher")]
    matchers: Vec<MatcherDefinition>,
    context: ContextDefinition,
}

/// Compiled matcher with metadata
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    /// Matcher name
    pub name: String,
    /// Matcher family
    pub kind: MatcherKind,
    /// Compiled case-insensitive regex
    pub regex: Regex,
}

/// Lower-cased keyword lists consulted by the entity classifier
#[derive(Debug, Clone)]
pub struct ContextKeywords {
    /// Substrings that mark an entity's own text as medical
    pub entity: Vec<String>,
    /// Keywords looked for immediately before an entity
    pub prefix: Vec<String>,
    /// Keywords looked for around an entity
    pub window: Vec<String>,
}

/// Compiled, ordered medical pattern registry
#[derive(Debug, Clone)]
pub struct MedicalPatternRegistry {
    matchers: Vec<CompiledMatcher>,
    dosage_quantity: Regex,
    keywords: ContextKeywords,
}

impl MedicalPatternRegistry {
    /// Create a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MedAnonError::Configuration(format!(
                "Failed to read medical pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            MedAnonError::Configuration(format!("Failed to parse medical pattern library: {e}"))
        })?;

        let mut matchers = Vec::new();
        for def in &library.matchers {
            matchers.extend(Self::compile_definition(def)?);
        }

        let dosage_quantity = compile_case_insensitive(&library.context.dosage_quantity)
            .map_err(|e| {
                MedAnonError::Configuration(format!("Invalid dosage_quantity regex: {e}"))
            })?;

        let lower = |words: &[String]| words.iter().map(|w| w.to_lowercase()).collect();
        let keywords = ContextKeywords {
            entity: lower(&library.context.entity_keywords),
            prefix: lower(&library.context.prefix_keywords),
            window: lower(&library.context.window_keywords),
        };

        Ok(Self {
            matchers,
            dosage_quantity,
            keywords,
        })
    }

    /// Create the built-in registry
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/medical_terms.toml");
        Self::from_toml(default_toml)
    }

    /// Append extra brand names as a trailing brand matcher
    pub fn with_additional_brands(mut self, brands: &[String]) -> Result<Self> {
        if brands.is_empty() {
            return Ok(self);
        }

        let def = MatcherDefinition {
            name: "configured_brands".to_string(),
            kind: MatcherKind::Brand,
            patterns: Vec::new(),
            terms: brands.to_vec(),
        };
        self.matchers.extend(Self::compile_definition(&def)?);
        Ok(self)
    }

    /// All matchers, in declaration order
    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }

    /// Matchers of one family
    pub fn matchers_of_kind(&self, kind: MatcherKind) -> impl Iterator<Item = &CompiledMatcher> {
        self.matchers.iter().filter(move |m| m.kind == kind)
    }

    /// Regex for a bare dosage quantity
    pub fn dosage_quantity(&self) -> &Regex {
        &self.dosage_quantity
    }

    /// Context keyword lists
    pub fn keywords(&self) -> &ContextKeywords {
        &self.keywords
    }

    fn compile_definition(def: &MatcherDefinition) -> Result<Vec<CompiledMatcher>> {
        let mut sources = def.patterns.clone();

        let terms: Vec<String> = def
            .terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();
        if !terms.is_empty() {
            sources.push(format!(r"\b(?:{})\w*\b", terms.join("|")));
        }

        if sources.is_empty() {
            return Err(MedAnonError::Configuration(format!(
                "Matcher '{}' defines neither patterns nor terms",
                def.name
            )));
        }

        sources
            .iter()
            .map(|source| {
                let regex = compile_case_insensitive(source).map_err(|e| {
                    MedAnonError::Configuration(format!(
                        "Invalid regex in matcher '{}': {source}: {e}",
                        def.name
                    ))
                })?;
                Ok(CompiledMatcher {
                    name: def.name.clone(),
                    kind: def.kind,
                    regex,
                })
            })
            .collect()
    }
}

fn compile_case_insensitive(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
