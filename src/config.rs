//! Configuration for the word notebook
//!
//! Read from `<config_dir>/wordbook/config.toml`. Every key is optional; a
//! missing default file means all defaults.
//!
//! ```text
//! data_dir = "/home/me/.local/share/wordbook"
//! store_file = "wordbook.json"
//!
//! [translation]
//! enabled = true
//! source_lang = "en"
//! target_lang = "zh"
//! timeout_secs = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::translate::TranslationConfig;

const APP_DIR: &str = "wordbook";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordbookConfig {
    /// Directory holding the store file; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Store file name inside the data directory
    pub store_file: String,
    pub translation: TranslationConfig,
}

impl Default for WordbookConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_file: "wordbook.json".to_string(),
            translation: TranslationConfig::default(),
        }
    }
}

impl WordbookConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and defaults are used if nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    log::debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Get the data directory, falling back to the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join(APP_DIR))
                .ok_or(ConfigError::DataDirNotFound),
        }
    }

    /// Full path of the store file
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.store_file))
    }
}
