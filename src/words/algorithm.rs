//! SM-2 Spaced Repetition Algorithm
//!
//! Simplified SuperMemo 2 scheduling for saved words.
//!
//! Quality ratings:
//! - 0: Forgot (any rating below 3 is treated as 0)
//! - 3: Recalled with serious difficulty
//! - 4: Recalled after hesitation
//! - 5: Perfect recall
//!
//! Interval progression on success: 1 day, 2 days, then the previous
//! interval multiplied by the freshly updated ease factor.

use chrono::{DateTime, Duration, Utc};

use super::models::{Grade, Schedule, Word, DEFAULT_EASE, MIN_EASE};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Collapse a raw rating into the scheduler's domain: failures become 0,
/// anything above 5 becomes 5.
pub fn normalize_quality(quality: i32) -> i32 {
    if quality < 3 {
        0
    } else {
        quality.min(5)
    }
}

/// Update an ease factor for a review of the given quality
///
/// EF' = max(1.3, EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)))
pub fn compute_ease(ease: f64, quality: i32) -> f64 {
    let ease = if ease.is_finite() { ease } else { DEFAULT_EASE };
    let miss = (5 - normalize_quality(quality)) as f64;
    (ease + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE)
}

/// Calculate the next schedule for a review
///
/// # Arguments
/// * `schedule` - Current scheduling state
/// * `quality` - Quality rating (0, 3, 4 or 5)
/// * `now` - Time of the review
pub fn next_schedule(schedule: &Schedule, quality: i32, now: DateTime<Utc>) -> Schedule {
    let quality = normalize_quality(quality);
    let ease = compute_ease(schedule.ease, quality);

    let (interval, reps, lapses) = if quality < 3 {
        // Lapse: streak resets, see it again tomorrow
        (1, 0, schedule.lapses.saturating_add(1))
    } else {
        let interval = match schedule.reps {
            0 => 1,
            1 => 2,
            _ => (schedule.interval as f64 * ease).round().min(u32::MAX as f64) as u32,
        };
        (interval, schedule.reps.saturating_add(1), schedule.lapses)
    };

    Schedule {
        interval,
        ease,
        reps,
        lapses,
        next_review: due_after(now, interval),
    }
}

/// Apply a review to a word's schedule, leaving every other field untouched
pub fn compute_next_schedule(word: &Word, quality: i32, now: DateTime<Utc>) -> Word {
    let mut next = word.clone();
    next.schedule = next_schedule(&word.schedule, quality, now);
    next
}

fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::milliseconds(interval as i64 * MILLIS_PER_DAY))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Calculate the interval each answer button would produce
/// Used to show users what interval each rating would give
pub fn preview_intervals(schedule: &Schedule, now: DateTime<Utc>) -> [(Grade, u32); 4] {
    Grade::ALL.map(|grade| (grade, next_schedule(schedule, grade.quality(), now).interval))
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
