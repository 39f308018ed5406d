//! Saved words and their review state
//!
//! This module provides:
//! - Word records with lenient decoding of legacy data
//! - SM-2 spaced repetition scheduling
//! - Mastery tracking derived from review history
//! - The notebook over a key/value store, with a one-time mastery backfill

pub mod algorithm;
pub mod mastery;
pub mod migration;
pub mod models;
pub mod storage;

pub use algorithm::{compute_next_schedule, format_interval, preview_intervals};
pub use mastery::{ensure_mastery, mastery_score, mastery_tag, record_review_outcome};
pub use migration::{migrate_mastery, MigrationOutcome, MIGRATION_FLAG_KEY};
pub use models::*;
pub use storage::{NotebookError, WordNotebook, WORDS_KEY};
