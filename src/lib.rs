//! Vocabulary notebook with spaced-repetition review
//!
//! Words selected while reading are saved with their context, translated
//! when possible, and scheduled for review with a simplified SM-2. Each
//! review also updates a mastery tag derived from the word's whole history.

pub mod config;
pub mod store;
pub mod translate;
pub mod wordbook;
pub mod words;

pub use config::{ConfigError, WordbookConfig};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use wordbook::Wordbook;
pub use words::{compute_next_schedule, ensure_mastery, record_review_outcome};
