//! Online translation client
//!
//! Two public endpoints are queried concurrently for a term:
//! - MyMemory for the translation itself
//! - dictionaryapi.dev for definition, example and phonetic
//!
//! Either may fail on its own. A missing translation falls back to the term
//! itself and a missing dictionary entry to empty fields; the lookup only
//! fails when both do.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::models::{TranslationConfig, TranslationInfo};

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of translations for a term
#[async_trait]
pub trait TranslationLookup: Send + Sync {
    async fn lookup(&self, term: &str, from: &str, to: &str) -> Result<TranslationInfo, LookupError>;
}

/// Lookup against the public translation and dictionary APIs
pub struct OnlineLookup {
    client: reqwest::Client,
    translate_url: String,
    dictionary_url: String,
}

impl OnlineLookup {
    pub fn new(config: &TranslationConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent("Mozilla/5.0 (compatible; Wordbook/1.0)")
            .build()?;

        Ok(Self {
            client,
            translate_url: config.translate_url.clone(),
            dictionary_url: config.dictionary_url.clone(),
        })
    }

    async fn fetch_basic_translation(&self, term: &str, from: &str, to: &str) -> Result<String, LookupError> {
        let langpair = format!("{}|{}", from, to);
        let response = self
            .client
            .get(&self.translate_url)
            .query(&[("q", term), ("langpair", langpair.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let data: MyMemoryResponse = response.json().await?;
        parse_translation(data)
    }

    async fn fetch_dictionary_info(&self, term: &str) -> Result<TranslationInfo, LookupError> {
        let url = format!(
            "{}/{}",
            self.dictionary_url.trim_end_matches('/'),
            urlencoding::encode(term)
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let entries: Vec<DictionaryEntry> = response.json().await?;
        parse_dictionary(entries)
    }
}

#[async_trait]
impl TranslationLookup for OnlineLookup {
    async fn lookup(&self, term: &str, from: &str, to: &str) -> Result<TranslationInfo, LookupError> {
        log::info!("Looking up '{}' online ({} -> {})", term, from, to);

        let (translation, dictionary) = tokio::join!(
            self.fetch_basic_translation(term, from, to),
            self.fetch_dictionary_info(term)
        );

        match (translation, dictionary) {
            (Err(translation_err), Err(dictionary_err)) => {
                log::warn!(
                    "Both lookups failed for '{}': translation: {}, dictionary: {}",
                    term,
                    translation_err,
                    dictionary_err
                );
                Err(translation_err)
            }
            (translation, dictionary) => {
                let mut info = dictionary.unwrap_or_else(|e| {
                    log::debug!("No dictionary entry for '{}': {}", term, e);
                    TranslationInfo::default()
                });
                info.translation = translation.unwrap_or_else(|e| {
                    log::debug!("No translation for '{}': {}", term, e);
                    term.to_string()
                });
                Ok(info)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    /// Sometimes a number, sometimes a string
    #[serde(default)]
    response_status: Value,
    #[serde(default)]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    #[serde(default)]
    translated_text: String,
}

fn parse_translation(data: MyMemoryResponse) -> Result<String, LookupError> {
    let status = match &data.response_status {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    match (status, data.response_data) {
        (Some(200), Some(d)) if !d.translated_text.trim().is_empty() => Ok(d.translated_text),
        (Some(200), _) => Err(LookupError::Malformed("empty translation".to_string())),
        (Some(code), _) => Err(LookupError::Status(code.min(u16::MAX as u64) as u16)),
        (None, _) => Err(LookupError::Malformed("missing responseStatus".to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// Take the first meaning's first definition from the first entry
fn parse_dictionary(entries: Vec<DictionaryEntry>) -> Result<TranslationInfo, LookupError> {
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Malformed("no dictionary entries".to_string()))?;

    let first_definition = entry
        .meanings
        .into_iter()
        .next()
        .and_then(|m| m.definitions.into_iter().next());

    let phonetic = entry
        .phonetic
        .filter(|p| !p.is_empty())
        .or_else(|| entry.phonetics.into_iter().next().and_then(|p| p.text))
        .unwrap_or_default();

    let (definition, examples) = match first_definition {
        Some(d) => (d.definition, d.example.into_iter().collect()),
        None => (String::new(), Vec::new()),
    };

    Ok(TranslationInfo {
        translation: String::new(),
        definition,
        examples,
        phonetic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_translation_success() {
        let data: MyMemoryResponse = serde_json::from_value(json!({
            "responseData": { "translatedText": "你好", "match": 1 },
            "responseStatus": 200,
        }))
        .unwrap();
        assert_eq!(parse_translation(data).unwrap(), "你好");
    }

    #[test]
    fn test_parse_translation_string_status() {
        let data: MyMemoryResponse = serde_json::from_value(json!({
            "responseData": { "translatedText": "QUOTA EXCEEDED" },
            "responseStatus": "403",
        }))
        .unwrap();
        assert!(matches!(parse_translation(data), Err(LookupError::Status(403))));
    }

    #[test]
    fn test_parse_translation_missing_status() {
        let data: MyMemoryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(parse_translation(data), Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_parse_dictionary_first_meaning() {
        let entries: Vec<DictionaryEntry> = serde_json::from_value(json!([
            {
                "word": "hello",
                "phonetics": [{ "text": "/həˈləʊ/" }, { "text": "/hɛˈloʊ/" }],
                "meanings": [
                    {
                        "partOfSpeech": "noun",
                        "definitions": [
                            { "definition": "\"Hello!\" or an equivalent greeting.", "example": "She gave a cheery hello." },
                            { "definition": "unused" }
                        ]
                    },
                    { "definitions": [{ "definition": "also unused" }] }
                ]
            }
        ]))
        .unwrap();

        let info = parse_dictionary(entries).unwrap();
        assert_eq!(info.definition, "\"Hello!\" or an equivalent greeting.");
        assert_eq!(info.examples, vec!["She gave a cheery hello.".to_string()]);
        assert_eq!(info.phonetic, "/həˈləʊ/");
        assert!(info.translation.is_empty());
    }

    #[test]
    fn test_parse_dictionary_prefers_top_level_phonetic() {
        let entries: Vec<DictionaryEntry> = serde_json::from_value(json!([
            { "phonetic": "/wɜːd/", "phonetics": [{ "text": "/other/" }], "meanings": [] }
        ]))
        .unwrap();

        let info = parse_dictionary(entries).unwrap();
        assert_eq!(info.phonetic, "/wɜːd/");
        assert!(info.definition.is_empty());
        assert!(info.examples.is_empty());
    }

    #[test]
    fn test_parse_dictionary_empty_is_error() {
        assert!(parse_dictionary(Vec::new()).is_err());
    }
}
