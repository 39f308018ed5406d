//! Translation resolution with caching and a timeout

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use super::cache::TranslationCache;
use super::client::TranslationLookup;
use super::dictionary::BuiltinDictionary;
use super::models::TranslationInfo;
use crate::words::normalize_term;

/// Resolves translations: cache, then built-in dictionary, then online.
///
/// A failed or slow online lookup yields `None`; callers save the word
/// without translation fields in that case.
pub struct Translator<L> {
    lookup: L,
    dictionary: BuiltinDictionary,
    cache: Mutex<TranslationCache>,
    timeout: Duration,
}

impl<L: TranslationLookup> Translator<L> {
    pub fn new(lookup: L, dictionary: BuiltinDictionary, cache: TranslationCache, timeout: Duration) -> Self {
        Self {
            lookup,
            dictionary,
            cache: Mutex::new(cache),
            timeout,
        }
    }

    pub async fn translate(&self, term: &str, from: &str, to: &str) -> Option<TranslationInfo> {
        let word = normalize_term(term);
        if word.is_empty() {
            return None;
        }

        if let Some(hit) = self.cached(&word) {
            log::debug!("Translation cache hit: {}", word);
            return Some(hit);
        }

        if let Some(entry) = self.dictionary.get(&word).cloned() {
            log::debug!("Built-in dictionary hit: {}", word);
            self.remember(&word, entry.clone());
            return Some(entry);
        }

        match tokio::time::timeout(self.timeout, self.lookup.lookup(&word, from, to)).await {
            Ok(Ok(info)) => {
                self.remember(&word, info.clone());
                Some(info)
            }
            Ok(Err(e)) => {
                log::warn!("Online translation failed for '{}': {}", word, e);
                None
            }
            Err(_) => {
                log::warn!(
                    "Online translation for '{}' timed out after {:?}",
                    word,
                    self.timeout
                );
                None
            }
        }
    }

    /// Stored form of the cache, for persisting between sessions
    pub fn cache_snapshot(&self) -> Option<Value> {
        let cache = self.cache.lock().ok()?;
        match cache.to_value() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Failed to serialize translation cache: {}", e);
                None
            }
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn cached(&self, word: &str) -> Option<TranslationInfo> {
        self.cache.lock().ok()?.get(word).cloned()
    }

    fn remember(&self, word: &str, info: TranslationInfo) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(word, info, Utc::now());
        }
    }
}
