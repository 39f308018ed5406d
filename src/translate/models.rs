//! Data models for translation lookups

use serde::{Deserialize, Serialize};

/// What a lookup knows about a term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInfo {
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub phonetic: String,
}

impl TranslationInfo {
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty()
            && self.definition.is_empty()
            && self.examples.is_empty()
            && self.phonetic.is_empty()
    }
}

/// Configuration for translation lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Look up translations when saving words
    pub enabled: bool,
    /// Only words in this language are looked up
    pub source_lang: String,
    /// Language translations are requested in
    pub target_lang: String,
    /// MyMemory-compatible translate endpoint
    pub translate_url: String,
    /// dictionaryapi.dev-compatible entries endpoint (term is appended)
    pub dictionary_url: String,
    /// Upper bound for a whole lookup, in seconds
    pub timeout_secs: u64,
    /// Maximum number of cached lookups
    pub cache_capacity: usize,
    /// Optional offline dictionary (JSON object of term -> entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<std::path::PathBuf>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_lang: "en".to_string(),
            target_lang: "zh".to_string(),
            translate_url: "https://api.mymemory.translated.net/get".to_string(),
            dictionary_url: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            timeout_secs: 5,
            cache_capacity: super::DEFAULT_CACHE_CAPACITY,
            dictionary_path: None,
        }
    }
}

impl TranslationConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
