//! Given-name gazetteer

use crate::domain::{MedAnonError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Case-insensitive set of given names
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    names: HashSet<String>,
}

impl Gazetteer {
    /// Built-in given-name list
    pub fn builtin() -> Self {
        let default_list = include_str!("../../../patterns/given_names.txt");
        Self::parse(default_list)
    }

    /// Parse one name per line; blank lines and `#` comments are ignored
    pub fn parse(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { names }
    }

    /// Load a name list from disk
    ///
    /// An unreadable or empty list makes the recognizer unavailable.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MedAnonError::RecognizerUnavailable(format!(
                "Failed to read gazetteer {}: {e}",
                path.display()
            ))
        })?;

        let gazetteer = Self::parse(&content);
        if gazetteer.is_empty() {
            return Err(MedAnonError::RecognizerUnavailable(format!(
                "Gazetteer {} contains no names",
                path.display()
            )));
        }
        Ok(gazetteer)
    }

    /// Merge another gazetteer into this one
    pub fn extend(&mut self, other: Gazetteer) {
        self.names.extend(other.names);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.names.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
