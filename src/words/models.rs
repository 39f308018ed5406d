//! Data models for the word notebook

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Ease factor given to new and legacy words
pub const DEFAULT_EASE: f64 = 2.5;

/// Lowest ease factor a review can produce
pub const MIN_EASE: f64 = 1.3;

/// Spaced repetition state of a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Whole days until the next review
    #[serde(default, deserialize_with = "lenient::count")]
    pub interval: u32,
    /// SM-2 ease factor (default 2.5)
    #[serde(default = "default_ease", deserialize_with = "lenient::ease")]
    pub ease: f64,
    /// Consecutive successful reviews
    #[serde(default, deserialize_with = "lenient::count")]
    pub reps: u32,
    /// Failed reviews over the word's lifetime
    #[serde(default, deserialize_with = "lenient::count")]
    pub lapses: u32,
    /// When the word is due, stored as epoch milliseconds
    #[serde(
        default = "Utc::now",
        deserialize_with = "lenient::timestamp",
        serialize_with = "chrono::serde::ts_milliseconds::serialize"
    )]
    pub next_review: DateTime<Utc>,
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

impl Schedule {
    /// Fresh schedule, due immediately
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval: 0,
            ease: DEFAULT_EASE,
            reps: 0,
            lapses: 0,
            next_review: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

/// Cumulative review outcomes, one counter per grade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    #[serde(default, deserialize_with = "lenient::count")]
    pub again: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub hard: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub good: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub easy: u32,
}

impl ReviewCounts {
    /// Bump the counter for `grade`
    pub fn record(&mut self, grade: Grade) {
        let counter = match grade {
            Grade::Again => &mut self.again,
            Grade::Hard => &mut self.hard,
            Grade::Good => &mut self.good,
            Grade::Easy => &mut self.easy,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        self.again as u64 + self.hard as u64 + self.good as u64 + self.easy as u64
    }
}

/// Proficiency label derived from review history, weakest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MasteryTag {
    #[default]
    #[serde(rename = "陌生")]
    Unfamiliar,
    #[serde(rename = "学习中")]
    Learning,
    #[serde(rename = "熟悉")]
    Familiar,
    #[serde(rename = "已掌握")]
    Mastered,
}

impl MasteryTag {
    pub const ALL: [MasteryTag; 4] = [
        MasteryTag::Unfamiliar,
        MasteryTag::Learning,
        MasteryTag::Familiar,
        MasteryTag::Mastered,
    ];

    /// Stored label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unfamiliar => "陌生",
            Self::Learning => "学习中",
            Self::Familiar => "熟悉",
            Self::Mastered => "已掌握",
        }
    }

    pub fn english_label(&self) -> &'static str {
        match self {
            Self::Unfamiliar => "unfamiliar",
            Self::Learning => "learning",
            Self::Familiar => "familiar",
            Self::Mastered => "mastered",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.label() == label || tag.english_label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for MasteryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived mastery fields of a word
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mastery {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub stats: ReviewCounts,
    #[serde(default, deserialize_with = "lenient::score")]
    pub mastery_score: i64,
    #[serde(default, deserialize_with = "lenient::tag")]
    pub mastery_tag: MasteryTag,
}

/// A saved word with its review state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub term: String,
    #[serde(default = "default_lang", deserialize_with = "lenient::lang")]
    pub lang: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub context: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub source_url: String,
    #[serde(
        default = "Utc::now",
        deserialize_with = "lenient::timestamp",
        serialize_with = "chrono::serde::ts_milliseconds::serialize"
    )]
    pub added_at: DateTime<Utc>,
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(flatten)]
    pub mastery: Mastery,
    /// Translation of the term
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub note: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub definition: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub examples: Vec<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub phonetic: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tags: Vec<String>,
}

fn default_lang() -> String {
    "en".to_string()
}

impl Word {
    /// Create a new word from an already-normalized term
    pub fn new(term: String, lang: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            term,
            lang,
            context: String::new(),
            source_url: String::new(),
            added_at: now,
            schedule: Schedule::new(now),
            mastery: Mastery::default(),
            note: String::new(),
            definition: String::new(),
            examples: Vec::new(),
            phonetic: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_due(now)
    }

    /// Whether `term`/`lang` identify this word
    pub fn matches(&self, term: &str, lang: &str) -> bool {
        self.term == term && self.lang == lang
    }

    /// Apply a translation result to the content fields
    pub fn apply_translation(&mut self, info: &crate::translate::TranslationInfo) {
        self.note = info.translation.clone();
        self.definition = info.definition.clone();
        self.examples = info.examples.clone();
        self.phonetic = info.phonetic.clone();
    }
}

/// Canonical form of a term: trimmed and lowercased
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Guess the language of selected text: any CJK ideograph means Chinese
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)) {
        "zh"
    } else {
        "en"
    }
}

/// Answer given for a review, bucketing the raw quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Bucket a quality rating. Anything below 3 is a failure.
    pub fn from_quality(quality: i32) -> Self {
        match quality {
            q if q < 3 => Self::Again,
            3 => Self::Hard,
            4 => Self::Good,
            _ => Self::Easy,
        }
    }

    /// Quality rating sent to the scheduler
    pub fn quality(&self) -> i32 {
        match self {
            Self::Again => 0,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    /// Feedback shown after reviewing with this grade
    pub fn feedback(&self) -> &'static str {
        match self {
            Self::Again => "需要再次复习",
            Self::Hard => "有点困难",
            Self::Good => "记住了",
            Self::Easy => "很简单",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid grade '{0}' (expected again, hard, good, easy or a quality 0-5)")]
pub struct ParseGradeError(pub String);

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "a" => Ok(Self::Again),
            "hard" | "h" => Ok(Self::Hard),
            "good" | "g" => Ok(Self::Good),
            "easy" | "e" => Ok(Self::Easy),
            other => other
                .parse::<i32>()
                .ok()
                .filter(|q| (0..=5).contains(q))
                .map(Self::from_quality)
                .ok_or_else(|| ParseGradeError(s.to_string())),
        }
    }
}

/// Request to save a selected term
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDraft {
    pub term: String,
    /// Detected from the term when absent
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub source_url: String,
    /// Used as the translation when no lookup result is available
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WordDraft {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Language of the draft, detected from the term if not given
    pub fn resolved_lang(&self) -> String {
        self.lang
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| detect_language(&self.term).to_string())
    }
}

/// Edit of a word's content fields. Scheduling and mastery cannot be edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordUpdate {
    pub note: Option<String>,
    pub definition: Option<String>,
    pub examples: Option<Vec<String>>,
    pub phonetic: Option<String>,
    pub context: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl WordUpdate {
    pub fn apply(self, word: &mut Word) {
        if let Some(note) = self.note {
            word.note = note;
        }
        if let Some(definition) = self.definition {
            word.definition = definition;
        }
        if let Some(examples) = self.examples {
            word.examples = examples;
        }
        if let Some(phonetic) = self.phonetic {
            word.phonetic = phonetic;
        }
        if let Some(context) = self.context {
            word.context = context;
        }
        if let Some(tags) = self.tags {
            word.tags = tags;
        }
    }
}

/// Counts of words by mastery tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCounts {
    pub unfamiliar: usize,
    pub learning: usize,
    pub familiar: usize,
    pub mastered: usize,
}

impl TagCounts {
    pub fn add(&mut self, tag: MasteryTag) {
        match tag {
            MasteryTag::Unfamiliar => self.unfamiliar += 1,
            MasteryTag::Learning => self.learning += 1,
            MasteryTag::Familiar => self.familiar += 1,
            MasteryTag::Mastered => self.mastered += 1,
        }
    }

    pub fn get(&self, tag: MasteryTag) -> usize {
        match tag {
            MasteryTag::Unfamiliar => self.unfamiliar,
            MasteryTag::Learning => self.learning,
            MasteryTag::Familiar => self.familiar,
            MasteryTag::Mastered => self.mastered,
        }
    }
}

/// Statistics for the whole notebook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookSummary {
    pub total_words: usize,
    pub due_words: usize,
    pub total_reviews: u64,
    pub total_lapses: u64,
    pub by_tag: TagCounts,
}

/// Defensive decoders for stored records.
///
/// Legacy and hand-edited records may carry nulls, strings or garbage where
/// numbers are expected. These decoders never fail; unusable values fall
/// back to the field default.
mod lenient {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{MasteryTag, DEFAULT_EASE, MIN_EASE};

    fn number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(number)
            .filter(|n| *n >= 0.0)
            .map(|n| n.round().min(u32::MAX as f64) as u32)
            .unwrap_or(0))
    }

    pub fn ease<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(number)
            .map(|n| n.max(MIN_EASE))
            .unwrap_or(DEFAULT_EASE))
    }

    /// Null or mistyped values decode as the type's default
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    pub fn lang<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(super::default_lang))
    }

    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(number)
            .map(|n| n.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
            .unwrap_or(0))
    }

    pub fn tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MasteryTag, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .and_then(MasteryTag::from_label)
            .unwrap_or_default())
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse_timestamp).unwrap_or_else(Utc::now))
    }

    fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| number(value).and_then(from_millis)),
            Value::Number(_) => number(value).and_then(from_millis),
            _ => None,
        }
    }

    fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
        if ms.abs() > i64::MAX as f64 {
            return None;
        }
        Utc.timestamp_millis_opt(ms as i64).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_legacy_record_defaults() {
        let word: Word = serde_json::from_value(json!({
            "id": "hello_en_1700000000000",
            "term": "hello",
            "lang": "en",
            "addedAt": 1_700_000_000_000i64,
            "nextReview": 1_700_000_000_000i64,
        }))
        .unwrap();

        assert_eq!(word.id, "hello_en_1700000000000");
        assert_eq!(word.schedule.ease, DEFAULT_EASE);
        assert_eq!(word.schedule.interval, 0);
        assert_eq!(word.schedule.reps, 0);
        assert_eq!(word.mastery.stats, ReviewCounts::default());
        assert_eq!(word.mastery.mastery_tag, MasteryTag::Unfamiliar);
        assert_eq!(
            word.schedule.next_review,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let word: Word = serde_json::from_value(json!({
            "id": "x",
            "term": "x",
            "ease": null,
            "interval": "3",
            "reps": -2,
            "lapses": "lots",
            "stats": { "easy": 2.0, "again": null },
            "masteryScore": "oops",
            "masteryTag": "legendary",
            "nextReview": "2024-01-02T03:04:05Z",
        }))
        .unwrap();

        assert_eq!(word.schedule.ease, DEFAULT_EASE);
        assert_eq!(word.schedule.interval, 3);
        assert_eq!(word.schedule.reps, 0);
        assert_eq!(word.schedule.lapses, 0);
        assert_eq!(word.mastery.stats.easy, 2);
        assert_eq!(word.mastery.stats.again, 0);
        assert_eq!(word.mastery.mastery_score, 0);
        assert_eq!(word.mastery.mastery_tag, MasteryTag::Unfamiliar);
        assert_eq!(
            word.schedule.next_review,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        );
    }

    #[test]
    fn test_null_fields_decode_as_missing() {
        let word: Word = serde_json::from_value(json!({
            "id": "x",
            "term": "x",
            "lang": null,
            "stats": null,
            "note": null,
            "definition": null,
            "examples": null,
            "phonetic": null,
            "context": null,
            "sourceUrl": null,
            "tags": null,
        }))
        .unwrap();

        assert_eq!(word.lang, "en");
        assert_eq!(word.mastery.stats, ReviewCounts::default());
        assert!(word.note.is_empty());
        assert!(word.definition.is_empty());
        assert!(word.examples.is_empty());
        assert!(word.phonetic.is_empty());
        assert!(word.context.is_empty());
        assert!(word.source_url.is_empty());
        assert!(word.tags.is_empty());
    }

    #[test]
    fn test_mistyped_content_fields_fall_back() {
        let word: Word = serde_json::from_value(json!({
            "id": "x",
            "term": "x",
            "lang": 7,
            "stats": "lots",
            "examples": "one example",
            "tags": [1, 2],
        }))
        .unwrap();

        assert_eq!(word.lang, "en");
        assert_eq!(word.mastery.stats, ReviewCounts::default());
        assert!(word.examples.is_empty());
        assert!(word.tags.is_empty());
    }

    #[test]
    fn test_ease_below_floor_is_raised() {
        for stored in [json!(0.5), json!(-3), json!("1.0")] {
            let word: Word = serde_json::from_value(json!({
                "id": "x",
                "term": "x",
                "ease": stored,
            }))
            .unwrap();
            assert_eq!(word.schedule.ease, MIN_EASE);
        }

        let word: Word = serde_json::from_value(json!({
            "id": "x",
            "term": "x",
            "ease": 2.8,
        }))
        .unwrap();
        assert_eq!(word.schedule.ease, 2.8);
    }

    #[test]
    fn test_serializes_flat_camel_case_with_millis() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let mut word = Word::new("hello".to_string(), "en".to_string(), now);
        word.mastery.mastery_tag = MasteryTag::Learning;

        let value = serde_json::to_value(&word).unwrap();
        assert_eq!(value["nextReview"], json!(1_700_000_000_123i64));
        assert_eq!(value["addedAt"], json!(1_700_000_000_123i64));
        assert_eq!(value["ease"], json!(2.5));
        assert_eq!(value["masteryTag"], json!("学习中"));
        assert_eq!(value["stats"], json!({"again": 0, "hard": 0, "good": 0, "easy": 0}));
        assert!(value.get("schedule").is_none());

        let back: Word = serde_json::from_value(value).unwrap();
        assert_eq!(back, word);
    }

    #[test]
    fn test_grade_from_quality() {
        assert_eq!(Grade::from_quality(0), Grade::Again);
        assert_eq!(Grade::from_quality(1), Grade::Again);
        assert_eq!(Grade::from_quality(2), Grade::Again);
        assert_eq!(Grade::from_quality(3), Grade::Hard);
        assert_eq!(Grade::from_quality(4), Grade::Good);
        assert_eq!(Grade::from_quality(5), Grade::Easy);
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!("Good".parse::<Grade>(), Ok(Grade::Good));
        assert_eq!("e".parse::<Grade>(), Ok(Grade::Easy));
        assert_eq!("1".parse::<Grade>(), Ok(Grade::Again));
        assert_eq!("3".parse::<Grade>(), Ok(Grade::Hard));
        assert!("7".parse::<Grade>().is_err());
        assert!("meh".parse::<Grade>().is_err());
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("serendipity"), "en");
        assert_eq!(detect_language("学习"), "zh");
        assert_eq!(detect_language("hello 世界"), "zh");
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  Ephemeral \n"), "ephemeral");
    }

    #[test]
    fn test_draft_lang_resolution() {
        let mut draft = WordDraft::new("你好");
        assert_eq!(draft.resolved_lang(), "zh");
        draft.lang = Some(" EN ".to_string());
        assert_eq!(draft.resolved_lang(), "en");
    }
}
