//! Built-in offline dictionary
//!
//! A JSON object mapping lowercase terms to entries:
//! ```text
//! {
//!   "apple": {
//!     "translation": "n. 苹果",
//!     "definition": "fruit with red or yellow or green skin",
//!     "examples": ["an apple a day"],
//!     "phonetic": "'æpl"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::client::LookupError;
use super::models::TranslationInfo;
use crate::words::normalize_term;

#[derive(Debug, Clone, Default)]
pub struct BuiltinDictionary {
    entries: HashMap<String, TranslationInfo>,
}

impl BuiltinDictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, TranslationInfo)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(term, info)| (normalize_term(&term), info))
                .collect(),
        }
    }

    /// Load a dictionary file
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, TranslationInfo> = serde_json::from_str(&content)?;
        let dictionary = Self::from_entries(entries);
        log::info!(
            "Loaded built-in dictionary with {} words from {:?}",
            dictionary.len(),
            path
        );
        Ok(dictionary)
    }

    /// Load a dictionary file, falling back to an empty dictionary on any error
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                log::warn!("Failed to load built-in dictionary {:?}: {}", path, e);
                Self::empty()
            }),
            None => Self::empty(),
        }
    }

    pub fn get(&self, term: &str) -> Option<&TranslationInfo> {
        self.entries.get(&normalize_term(term))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
