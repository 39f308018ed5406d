//! Single-file JSON store
//!
//! The whole store is one JSON object on disk:
//! ```text
//! {data_dir}/wordbook.json
//! {
//!   "words": [ ... ],
//!   "masteryMigrated": true,
//!   "translationCache": { ... }
//! }
//! ```
//! Writes go to a sibling temp file which is then renamed over the original.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{KeyValueStore, Result, StoreError};

/// Store backed by a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes file access within the process
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`. Parent directories are created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            io_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(items) => Ok(items),
            _ => Err(StoreError::NotAnObject(self.path.display().to_string())),
        }
    }

    fn write_all(&self, items: &Map<String, Value>) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(items)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let _guard = self.io_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut items = self.read_all()?;
        Ok(keys
            .iter()
            .filter_map(|key| items.remove(*key).map(|v| (key.to_string(), v)))
            .collect())
    }

    fn set(&self, new_items: Map<String, Value>) -> Result<()> {
        let _guard = self.io_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut items = self.read_all()?;
        items.extend(new_items);
        self.write_all(&items)
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.io_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut items = self.read_all()?;
        for key in keys {
            items.remove(*key);
        }
        self.write_all(&items)
    }
}
