//! The word notebook wired to translation lookups
//!
//! Saving a word in the configured source language first resolves a
//! translation (cache, built-in dictionary, online), then stores the word.
//! The lookup runs before the notebook's write lock is taken.

use chrono::{DateTime, Utc};

use crate::store::KeyValueStore;
use crate::translate::{
    BuiltinDictionary, TranslationCache, TranslationConfig, TranslationInfo, TranslationLookup,
    Translator,
};
use crate::words::{NotebookError, NotebookSummary, Word, WordDraft, WordNotebook, WordUpdate};

/// Key of the persisted translation cache
pub const TRANSLATION_CACHE_KEY: &str = "translationCache";

pub type Result<T> = std::result::Result<T, NotebookError>;

pub struct Wordbook<S, L> {
    notebook: WordNotebook<S>,
    translator: Translator<L>,
    config: TranslationConfig,
}

impl<S: KeyValueStore, L: TranslationLookup> Wordbook<S, L> {
    /// Open the notebook, restore the translation cache and load the
    /// built-in dictionary. Cache and dictionary problems are logged and
    /// start empty.
    pub fn open(store: S, lookup: L, config: &TranslationConfig) -> Self {
        let cache = load_cache(&store, config.cache_capacity);
        let dictionary = BuiltinDictionary::load_or_empty(config.dictionary_path.as_deref());
        let translator = Translator::new(lookup, dictionary, cache, config.timeout());

        Self {
            notebook: WordNotebook::open(store),
            translator,
            config: config.clone(),
        }
    }

    pub fn notebook(&self) -> &WordNotebook<S> {
        &self.notebook
    }

    /// Look up a translation for `term` without saving anything.
    /// Returns `None` for other languages or when lookups are disabled.
    pub async fn translate(&self, term: &str, lang: &str) -> Option<TranslationInfo> {
        if !self.config.enabled || lang != self.config.source_lang {
            return None;
        }

        let info = self
            .translator
            .translate(term, &self.config.source_lang, &self.config.target_lang)
            .await;
        self.persist_cache();
        info.filter(|info| !info.is_empty())
    }

    /// Save a selected term, translating it first when possible
    pub async fn save_word(&self, draft: WordDraft, now: DateTime<Utc>) -> Result<Word> {
        let lang = draft.resolved_lang();
        let translation = self.translate(&draft.term, &lang).await;
        if translation.is_none() && lang == self.config.source_lang {
            log::debug!("No translation available for '{}'", draft.term.trim());
        }
        self.notebook.save_word(draft, translation.as_ref(), now)
    }

    // ==================== Notebook Operations ====================

    pub fn list_words(&self) -> Result<Vec<Word>> {
        self.notebook.list_words()
    }

    pub fn get_word(&self, id: &str) -> Result<Option<Word>> {
        self.notebook.get_word(id)
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Word>> {
        self.notebook.find_by_prefix(prefix)
    }

    pub fn due_words(&self, now: DateTime<Utc>) -> Result<Vec<Word>> {
        self.notebook.due_words(now)
    }

    pub fn search(&self, query: &str) -> Result<Vec<Word>> {
        self.notebook.search(query)
    }

    pub fn review_word(&self, id: &str, quality: i32, now: DateTime<Utc>) -> Result<Option<Word>> {
        self.notebook.review_word(id, quality, now)
    }

    pub fn update_word(&self, id: &str, update: WordUpdate) -> Result<Option<Word>> {
        self.notebook.update_word(id, update)
    }

    pub fn delete_word(&self, id: &str) -> Result<bool> {
        self.notebook.delete_word(id)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> Result<NotebookSummary> {
        self.notebook.summary(now)
    }

    fn persist_cache(&self) {
        let Some(snapshot) = self.translator.cache_snapshot() else {
            return;
        };
        if let Err(e) = self.notebook.store().set_one(TRANSLATION_CACHE_KEY, snapshot) {
            log::warn!("Failed to persist translation cache: {}", e);
        }
    }
}

fn load_cache<S: KeyValueStore>(store: &S, capacity: usize) -> TranslationCache {
    let value = match store.get_one(TRANSLATION_CACHE_KEY) {
        Ok(Some(value)) => value,
        Ok(None) => return TranslationCache::new(capacity),
        Err(e) => {
            log::warn!("Failed to read translation cache: {}", e);
            return TranslationCache::new(capacity);
        }
    };

    TranslationCache::from_value(value, capacity).unwrap_or_else(|e| {
        log::warn!("Discarding unreadable translation cache: {}", e);
        TranslationCache::new(capacity)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::translate::FakeLookup;
    use chrono::TimeZone;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn config() -> TranslationConfig {
        TranslationConfig {
            timeout_secs: 1,
            ..Default::default()
        }
    }

    fn draft(term: &str) -> WordDraft {
        WordDraft {
            context: format!("a sentence with {}", term),
            ..WordDraft::new(term)
        }
    }

    #[tokio::test]
    async fn test_english_word_is_translated() {
        let wordbook = Wordbook::open(MemoryStore::new(), FakeLookup::answering("你好"), &config());

        let word = wordbook.save_word(draft("Hello"), now()).await.unwrap();

        assert_eq!(word.term, "hello");
        assert_eq!(word.note, "你好");
        assert_eq!(word.definition, "a definition");
        assert_eq!(word.examples, vec!["an example".to_string()]);
        assert_eq!(word.phonetic, "/fake/");
    }

    #[tokio::test]
    async fn test_other_languages_are_not_looked_up() {
        let lookup = FakeLookup::answering("unused");
        let calls = lookup.calls.clone();
        let wordbook = Wordbook::open(MemoryStore::new(), lookup, &config());

        let word = wordbook.save_word(draft("学习"), now()).await.unwrap();

        assert_eq!(word.lang, "zh");
        assert!(word.note.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_still_saves() {
        let wordbook = Wordbook::open(MemoryStore::new(), FakeLookup::failing(), &config());

        let mut request = draft("obscure");
        request.note = Some("manual note".to_string());
        let word = wordbook.save_word(request, now()).await.unwrap();

        assert_eq!(word.note, "manual note");
        assert!(word.definition.is_empty());
        assert_eq!(wordbook.list_words().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_translation() {
        let lookup = FakeLookup::answering("unused");
        let calls = lookup.calls.clone();
        let config = TranslationConfig {
            enabled: false,
            ..config()
        };
        let wordbook = Wordbook::open(MemoryStore::new(), lookup, &config);

        wordbook.save_word(draft("hello"), now()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_survives_reopen() {
        let store = Arc::new(MemoryStore::new());

        let first = FakeLookup::answering("你好");
        let wordbook = Wordbook::open(store.clone(), first, &config());
        wordbook.save_word(draft("hello"), now()).await.unwrap();
        assert!(store.get_one(TRANSLATION_CACHE_KEY).unwrap().is_some());

        let second = FakeLookup::answering("different");
        let calls = second.calls.clone();
        let reopened = Wordbook::open(store.clone(), second, &config());
        let info = reopened.translate("hello", "en").await.unwrap();

        assert_eq!(info.translation, "你好");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_review_through_service() {
        let wordbook = Wordbook::open(MemoryStore::new(), FakeLookup::failing(), &config());
        let word = wordbook.save_word(draft("lucid"), now()).await.unwrap();

        let reviewed = wordbook.review_word(&word.id, 5, now()).unwrap().unwrap();
        assert_eq!(reviewed.schedule.reps, 1);
        assert!(wordbook.due_words(now()).unwrap().is_empty());
        assert_eq!(wordbook.summary(now()).unwrap().total_reviews, 1);
    }
}
