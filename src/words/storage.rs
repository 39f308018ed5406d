//! Storage operations for saved words
//!
//! All words live in one collection under the `words` key of a
//! [`KeyValueStore`]. Every mutation is a read-modify-write of the whole
//! collection, serialized by the notebook's write lock.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::mastery::{normalize_mastery, record_review_outcome};
use super::migration::migrate_mastery;
use super::models::*;
use crate::store::{KeyValueStore, StoreError};
use crate::translate::TranslationInfo;

/// Key of the word collection
pub const WORDS_KEY: &str = "words";

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Term is empty")]
    EmptyTerm,

    #[error("Notebook lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, NotebookError>;

/// Decoded word collection.
///
/// Records that do not decode as words are carried along untouched so a
/// write never drops data it could not read.
pub(super) struct WordCollection {
    pub words: Vec<Word>,
    pub unreadable: Vec<Value>,
    /// Records whose mastery fields were missing or stale
    pub backfilled: usize,
}

impl WordCollection {
    pub(super) fn from_value(value: Option<Value>) -> Self {
        let items = match value {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                log::warn!("Stored words are not a list; keeping the value aside");
                vec![other]
            }
        };

        let mut collection = Self {
            words: Vec::with_capacity(items.len()),
            unreadable: Vec::new(),
            backfilled: 0,
        };

        for item in items {
            let legacy = is_legacy_record(&item);
            match serde_json::from_value::<Word>(item.clone()) {
                Ok(mut word) => {
                    if normalize_mastery(&mut word) || legacy {
                        collection.backfilled += 1;
                    }
                    collection.words.push(word);
                }
                Err(e) => {
                    log::warn!("Skipping unreadable word record: {}", e);
                    collection.unreadable.push(item);
                }
            }
        }

        collection
    }

    pub(super) fn to_value(&self) -> serde_json::Result<Value> {
        let mut items = Vec::with_capacity(self.words.len() + self.unreadable.len());
        for word in &self.words {
            items.push(serde_json::to_value(word)?);
        }
        items.extend(self.unreadable.iter().cloned());
        Ok(Value::Array(items))
    }

    pub(super) fn read<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self::from_value(store.get_one(WORDS_KEY)?))
    }

    pub(super) fn write<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.set_one(WORDS_KEY, self.to_value()?)?;
        Ok(())
    }
}

fn is_legacy_record(item: &Value) -> bool {
    ["stats", "masteryScore", "masteryTag"]
        .iter()
        .any(|key| item.get(key).is_none())
}

/// The word notebook over a key/value store
pub struct WordNotebook<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> WordNotebook<S> {
    /// Wrap a store without running the migration
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Wrap a store and run the one-time mastery migration.
    ///
    /// A failed migration is logged and skipped; words are still normalized
    /// whenever they are read.
    pub fn open(store: S) -> Self {
        let notebook = Self::new(store);
        match migrate_mastery(&notebook.store) {
            Ok(outcome) => log::debug!("Mastery migration: {:?}", outcome),
            Err(e) => log::error!(
                "Mastery migration failed, words will be normalized on read: {}",
                e
            ),
        }
        notebook
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Queries ====================

    /// List all words, most recently added first
    pub fn list_words(&self) -> Result<Vec<Word>> {
        let mut words = WordCollection::read(&self.store)?.words;
        words.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(words)
    }

    /// Get a word by ID
    pub fn get_word(&self, id: &str) -> Result<Option<Word>> {
        Ok(WordCollection::read(&self.store)?
            .words
            .into_iter()
            .find(|w| w.id == id))
    }

    /// Words whose ID starts with `prefix`. An exact ID match is returned alone.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Word>> {
        let words = WordCollection::read(&self.store)?.words;
        if let Some(exact) = words.iter().find(|w| w.id == prefix) {
            return Ok(vec![exact.clone()]);
        }
        Ok(words
            .into_iter()
            .filter(|w| w.id.starts_with(prefix))
            .collect())
    }

    /// Words due for review at `now`, oldest due first
    pub fn due_words(&self, now: DateTime<Utc>) -> Result<Vec<Word>> {
        let mut due: Vec<Word> = WordCollection::read(&self.store)?
            .words
            .into_iter()
            .filter(|w| w.is_due(now))
            .collect();
        due.sort_by(|a, b| a.schedule.next_review.cmp(&b.schedule.next_review));
        Ok(due)
    }

    /// Case-insensitive match on term, context and note
    pub fn search(&self, query: &str) -> Result<Vec<Word>> {
        let query = query.trim().to_lowercase();
        let words = self.list_words()?;
        if query.is_empty() {
            return Ok(words);
        }

        Ok(words
            .into_iter()
            .filter(|w| {
                w.term.to_lowercase().contains(&query)
                    || w.context.to_lowercase().contains(&query)
                    || w.note.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// Get statistics for the notebook
    pub fn summary(&self, now: DateTime<Utc>) -> Result<NotebookSummary> {
        let words = WordCollection::read(&self.store)?.words;

        let mut summary = NotebookSummary {
            total_words: words.len(),
            ..Default::default()
        };

        for word in &words {
            if word.is_due(now) {
                summary.due_words += 1;
            }
            summary.total_reviews += word.mastery.stats.total();
            summary.total_lapses += word.schedule.lapses as u64;
            summary.by_tag.add(word.mastery.mastery_tag);
        }

        Ok(summary)
    }

    // ==================== Mutations ====================

    /// Save a selected term.
    ///
    /// An existing term+lang pair gets its context, source and timestamp
    /// refreshed, and its content fields replaced when a translation is
    /// supplied. Otherwise a new word is added at the front, due immediately.
    pub fn save_word(
        &self,
        draft: WordDraft,
        translation: Option<&TranslationInfo>,
        now: DateTime<Utc>,
    ) -> Result<Word> {
        let term = normalize_term(&draft.term);
        if term.is_empty() {
            return Err(NotebookError::EmptyTerm);
        }
        let lang = draft.resolved_lang();

        let saved = self.modify(|words| {
            if let Some(existing) = words.iter_mut().find(|w| w.matches(&term, &lang)) {
                existing.context = draft.context;
                existing.source_url = draft.source_url;
                existing.added_at = now;
                if let Some(info) = translation {
                    existing.apply_translation(info);
                }
                log::info!("Updated existing word '{}' ({})", term, lang);
                return Some(existing.clone());
            }

            let mut word = Word::new(term.clone(), lang.clone(), now);
            word.context = draft.context;
            word.source_url = draft.source_url;
            word.tags = draft.tags;
            match translation {
                Some(info) => word.apply_translation(info),
                None => word.note = draft.note.unwrap_or_default(),
            }
            log::info!("Saved new word '{}' ({}) as {}", term, lang, word.id);
            words.insert(0, word.clone());
            Some(word)
        })?;

        // modify only yields None when the closure does
        saved.ok_or(NotebookError::EmptyTerm)
    }

    /// Submit a review for a word
    ///
    /// Returns `None` without writing anything if the word does not exist.
    pub fn review_word(&self, id: &str, quality: i32, now: DateTime<Utc>) -> Result<Option<Word>> {
        let reviewed = self.modify(|words| {
            let word = words.iter_mut().find(|w| w.id == id)?;
            *word = record_review_outcome(word, quality, now);
            Some(word.clone())
        })?;

        match &reviewed {
            Some(word) => log::info!(
                "Reviewed '{}' with quality {}: next in {} days, {}",
                word.term,
                quality,
                word.schedule.interval,
                word.mastery.mastery_tag.english_label()
            ),
            None => log::warn!("Review for unknown word {}, nothing to update", id),
        }

        Ok(reviewed)
    }

    /// Edit a word's content fields
    pub fn update_word(&self, id: &str, update: WordUpdate) -> Result<Option<Word>> {
        self.modify(|words| {
            let word = words.iter_mut().find(|w| w.id == id)?;
            update.apply(word);
            normalize_mastery(word);
            Some(word.clone())
        })
    }

    /// Delete a word. Returns whether it existed.
    pub fn delete_word(&self, id: &str) -> Result<bool> {
        let deleted = self.modify(|words| {
            let pos = words.iter().position(|w| w.id == id)?;
            Some(words.remove(pos))
        })?;

        if let Some(word) = &deleted {
            log::info!("Deleted word '{}' ({})", word.term, word.id);
        }
        Ok(deleted.is_some())
    }

    /// Read-modify-write of the collection under the write lock.
    /// Nothing is written when `f` returns `None`.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Word>) -> Option<T>) -> Result<Option<T>> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| NotebookError::LockPoisoned)?;

        let mut collection = WordCollection::read(&self.store)?;
        let result = f(&mut collection.words);
        if result.is_some() {
            collection.write(&self.store)?;
        }
        Ok(result)
    }
}
