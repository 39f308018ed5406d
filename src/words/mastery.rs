//! Mastery tracking
//!
//! A word's mastery tag is derived from its whole review history, not from
//! the scheduler numbers alone. Each review bumps one of four counters; the
//! counters give a score, and the score plus scheduling progress give the tag.
//!
//! score = 2*easy + good - hard - 2*again

use chrono::{DateTime, Utc};

use super::algorithm::next_schedule;
use super::models::{Grade, MasteryTag, ReviewCounts, Word};

/// Score at which a word may count as mastered
const MASTERED_SCORE: i64 = 8;
/// Reps required before a word may count as mastered
const MASTERED_REPS: u32 = 3;
/// Interval (days) required before a word may count as mastered
const MASTERED_INTERVAL: u32 = 7;

pub fn mastery_score(stats: &ReviewCounts) -> i64 {
    2 * stats.easy as i64 + stats.good as i64 - stats.hard as i64 - 2 * stats.again as i64
}

/// Map a score and scheduling progress to a tag; first match wins
pub fn mastery_tag(score: i64, reps: u32, interval: u32) -> MasteryTag {
    if score <= 0 || reps < 1 {
        MasteryTag::Unfamiliar
    } else if score <= 3 {
        MasteryTag::Learning
    } else if score < MASTERED_SCORE {
        MasteryTag::Familiar
    } else if reps >= MASTERED_REPS && interval >= MASTERED_INTERVAL {
        MasteryTag::Mastered
    } else {
        // High score from a burst of shallow reviews is not mastery yet
        MasteryTag::Familiar
    }
}

/// Recompute the derived mastery fields in place. Returns whether anything changed.
pub fn normalize_mastery(word: &mut Word) -> bool {
    let score = mastery_score(&word.mastery.stats);
    let tag = mastery_tag(score, word.schedule.reps, word.schedule.interval);

    let changed = word.mastery.mastery_score != score || word.mastery.mastery_tag != tag;
    word.mastery.mastery_score = score;
    word.mastery.mastery_tag = tag;
    changed
}

/// Backfill the mastery fields of a (possibly legacy) word
///
/// Missing counters have already decoded as zero, so this only has to
/// derive the score and tag. Applying it twice is the same as applying it once.
pub fn ensure_mastery(word: &Word) -> Word {
    let mut normalized = word.clone();
    normalize_mastery(&mut normalized);
    normalized
}

/// Apply a full review: schedule, count the outcome, re-derive mastery
pub fn record_review_outcome(word: &Word, quality: i32, now: DateTime<Utc>) -> Word {
    let mut next = ensure_mastery(word);
    next.schedule = next_schedule(&next.schedule, quality, now);
    next.mastery.stats.record(Grade::from_quality(quality));
    normalize_mastery(&mut next);
    next
}
