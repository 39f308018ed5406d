//! One-time backfill of mastery fields on words saved before mastery tracking.
//!
//! Older notebooks stored words without review counters, score, or tag.
//! This module rewrites the collection once with those fields derived, then
//! sets a flag so later opens skip it.

use serde_json::Value;

use super::storage::{NotebookError, WordCollection};
use crate::store::KeyValueStore;

/// Flag set once the backfill has run
pub const MIGRATION_FLAG_KEY: &str = "masteryMigrated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The flag was already set; nothing was read or written
    AlreadyDone,
    Migrated { total: usize, backfilled: usize },
}

/// Backfill mastery fields on every stored word (one-time).
///
/// - If the flag is already set, this is a no-op.
/// - Records that do not decode are kept as they are.
/// - The flag is only written after the collection has been saved, so a
///   failed run is retried on the next open.
pub fn migrate_mastery<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<MigrationOutcome, NotebookError> {
    let flag = store.get_one(MIGRATION_FLAG_KEY)?;
    if flag.as_ref().and_then(Value::as_bool).unwrap_or(false) {
        return Ok(MigrationOutcome::AlreadyDone);
    }

    let collection = WordCollection::read(store)?;
    let total = collection.words.len();
    let backfilled = collection.backfilled;

    if backfilled > 0 {
        collection.write(store)?;
    }
    store.set_one(MIGRATION_FLAG_KEY, Value::Bool(true))?;

    log::info!(
        "Migration: mastery backfilled on {} of {} words",
        backfilled,
        total
    );

    Ok(MigrationOutcome::Migrated { total, backfilled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::words::WORDS_KEY;
    use serde_json::json;

    fn legacy_words() -> Value {
        json!([
            {
                "id": "hello_en_1700000000000",
                "term": "hello",
                "lang": "en",
                "addedAt": 1_700_000_000_000i64,
                "nextReview": 1_700_000_000_000i64,
                "interval": 7,
                "ease": 2.6,
                "reps": 3
            },
            {
                "id": "world_en_1700000000001",
                "term": "world",
                "lang": "en",
                "addedAt": 1_700_000_000_001i64,
                "nextReview": 1_700_000_000_001i64,
                "interval": 1,
                "ease": 2.5,
                "reps": 1,
                "stats": { "again": 0, "hard": 0, "good": 1, "easy": 0 },
                "masteryScore": 1,
                "masteryTag": "学习中"
            }
        ])
    }

    #[test]
    fn test_backfills_legacy_words() {
        let store = MemoryStore::new();
        store.set_one(WORDS_KEY, legacy_words()).unwrap();

        let outcome = migrate_mastery(&store).unwrap();
        assert_eq!(
            outcome,
            MigrationOutcome::Migrated {
                total: 2,
                backfilled: 1
            }
        );

        let stored = store.get_one(WORDS_KEY).unwrap().unwrap();
        let first = &stored[0];
        assert_eq!(first["stats"], json!({"again": 0, "hard": 0, "good": 0, "easy": 0}));
        assert_eq!(first["masteryScore"], json!(0));
        assert_eq!(first["masteryTag"], json!("陌生"));
        // Scheduling state is carried over
        assert_eq!(first["interval"], json!(7));
        assert_eq!(first["reps"], json!(3));
        assert_eq!(first["id"], json!("hello_en_1700000000000"));

        assert_eq!(store.get_one(MIGRATION_FLAG_KEY).unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_second_run_is_noop() {
        let store = MemoryStore::new();
        store.set_one(WORDS_KEY, legacy_words()).unwrap();
        migrate_mastery(&store).unwrap();

        // Anything written after the flag is left alone
        store.set_one(WORDS_KEY, json!([{ "id": "x", "term": "x" }])).unwrap();
        assert_eq!(migrate_mastery(&store).unwrap(), MigrationOutcome::AlreadyDone);
        assert_eq!(
            store.get_one(WORDS_KEY).unwrap(),
            Some(json!([{ "id": "x", "term": "x" }]))
        );
    }

    #[test]
    fn test_empty_store_sets_flag() {
        let store = MemoryStore::new();

        let outcome = migrate_mastery(&store).unwrap();
        assert_eq!(
            outcome,
            MigrationOutcome::Migrated {
                total: 0,
                backfilled: 0
            }
        );
        assert_eq!(store.get_one(WORDS_KEY).unwrap(), None);
        assert_eq!(store.get_one(MIGRATION_FLAG_KEY).unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_stale_tag_is_recomputed() {
        let store = MemoryStore::new();
        store
            .set_one(
                WORDS_KEY,
                json!([{
                    "id": "a",
                    "term": "a",
                    "reps": 1,
                    "interval": 1,
                    "stats": { "again": 0, "hard": 0, "good": 0, "easy": 3 },
                    "masteryScore": 0,
                    "masteryTag": "已掌握"
                }]),
            )
            .unwrap();

        migrate_mastery(&store).unwrap();

        let stored = store.get_one(WORDS_KEY).unwrap().unwrap();
        assert_eq!(stored[0]["masteryScore"], json!(6));
        assert_eq!(stored[0]["masteryTag"], json!("熟悉"));
    }

    #[test]
    fn test_unreadable_records_survive() {
        let store = MemoryStore::new();
        store
            .set_one(WORDS_KEY, json!([{ "id": "a", "term": "a" }, 42]))
            .unwrap();

        migrate_mastery(&store).unwrap();

        let stored = store.get_one(WORDS_KEY).unwrap().unwrap();
        assert_eq!(stored.as_array().unwrap().len(), 2);
        assert_eq!(stored[1], json!(42));
    }
}
