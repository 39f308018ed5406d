use std::path::Path;

use anyhow::{bail, Context, Result};

use wordbook_lib::store::JsonFileStore;
use wordbook_lib::translate::OnlineLookup;
use wordbook_lib::words::Word;
use wordbook_lib::{Wordbook, WordbookConfig};

/// Shared application state for CLI commands
pub struct App {
    pub config: WordbookConfig,
    pub wordbook: Wordbook<JsonFileStore, OnlineLookup>,
}

impl App {
    /// Load config and open the notebook in the configured data directory
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        let store = open_store(&config)?;
        let lookup = OnlineLookup::new(&config.translation)
            .context("Failed to create translation client")?;

        let wordbook = Wordbook::open(store, lookup, &config.translation);

        Ok(Self { config, wordbook })
    }

    /// Find a word by ID (exact match first, then unique prefix)
    pub fn find_word(&self, id: &str) -> Result<Word> {
        let mut matches = self
            .wordbook
            .find_by_prefix(id)
            .context("Failed to read words")?;

        match matches.len() {
            0 => bail!("No word with ID matching '{}'", id),
            1 => Ok(matches.remove(0)),
            _ => bail!(
                "Ambiguous word ID '{}'. Matches:\n{}",
                id,
                matches
                    .iter()
                    .map(|w| format!("  - {} ({})", w.id, w.term))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<WordbookConfig> {
    WordbookConfig::load(config_path).context("Failed to load config")
}

pub fn open_store(config: &WordbookConfig) -> Result<JsonFileStore> {
    let path = config
        .store_path()
        .context("Failed to get data directory")?;
    JsonFileStore::open(&path).with_context(|| format!("Failed to open store at {:?}", path))
}
