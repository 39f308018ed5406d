//! Bounded cache of lookup results
//!
//! Entries are keyed by normalized term and stamped with the time they were
//! cached. When the cache grows past its capacity the oldest-cached entries
//! are evicted first. Re-caching a term refreshes its stamp.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::TranslationInfo;
use crate::words::normalize_term;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// A cached lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTranslation {
    #[serde(flatten)]
    pub info: TranslationInfo,
    /// Entries without a stamp sort as oldest
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TranslationCache {
    entries: HashMap<String, CachedTranslation>,
    capacity: usize,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Restore a cache from its stored form (a JSON object of term -> entry)
    pub fn from_value(value: Value, capacity: usize) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, CachedTranslation> = serde_json::from_value(value)?;
        let mut cache = Self { entries, capacity };
        cache.evict_overflow();
        Ok(cache)
    }

    /// Stored form of the cache
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<&TranslationInfo> {
        self.entries.get(&normalize_term(term)).map(|e| &e.info)
    }

    /// Cache a result, evicting the oldest entries if over capacity
    pub fn insert(&mut self, term: &str, info: TranslationInfo, now: DateTime<Utc>) {
        self.entries.insert(
            normalize_term(term),
            CachedTranslation {
                info,
                cached_at: now,
            },
        );
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        if self.entries.len() <= self.capacity {
            return;
        }

        let mut by_age: Vec<(DateTime<Utc>, String)> = self
            .entries
            .iter()
            .map(|(term, entry)| (entry.cached_at, term.clone()))
            .collect();
        by_age.sort();

        let excess = self.entries.len() - self.capacity;
        for (_, term) in by_age.into_iter().take(excess) {
            self.entries.remove(&term);
        }
        log::debug!("Translation cache evicted {} entries", excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn info(translation: &str) -> TranslationInfo {
        TranslationInfo {
            translation: translation.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_is_normalized() {
        let mut cache = TranslationCache::new(10);
        cache.insert("  Apple ", info("苹果"), t0());

        assert_eq!(cache.get("apple").unwrap().translation, "苹果");
        assert_eq!(cache.get("APPLE").unwrap().translation, "苹果");
        assert!(cache.get("pear").is_none());
    }

    #[test]
    fn test_evicts_oldest_cached_first() {
        let mut cache = TranslationCache::new(2);
        cache.insert("one", info("一"), t0());
        cache.insert("two", info("二"), t0() + Duration::seconds(1));
        cache.insert("three", info("三"), t0() + Duration::seconds(2));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("one").is_none());
        assert!(cache.get("two").is_some());
        assert!(cache.get("three").is_some());
    }

    #[test]
    fn test_recaching_refreshes_age() {
        let mut cache = TranslationCache::new(2);
        cache.insert("one", info("一"), t0());
        cache.insert("two", info("二"), t0() + Duration::seconds(1));
        cache.insert("one", info("一"), t0() + Duration::seconds(2));
        cache.insert("three", info("三"), t0() + Duration::seconds(3));

        assert!(cache.get("one").is_some());
        assert!(cache.get("two").is_none());
    }

    #[test]
    fn test_stored_form_round_trips_and_trims() {
        let stored = json!({
            "old": { "translation": "旧", "cachedAt": 1000 },
            "unstamped": { "translation": "无" },
            "new": { "translation": "新", "definition": "recent", "cachedAt": 2000 },
        });

        let cache = TranslationCache::from_value(stored, 2).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get("unstamped").is_none());
        assert_eq!(cache.get("new").unwrap().definition, "recent");

        let value = cache.to_value().unwrap();
        assert_eq!(value["old"]["cachedAt"], json!(1000));
        assert_eq!(value["new"]["translation"], json!("新"));
    }
}
