//! Key/value store abstraction
//!
//! The notebook keeps everything it persists (the word collection, the
//! migration flag, the translation cache) under a handful of string keys
//! holding JSON values. Backends only need to move those values around:
//! - `MemoryStore` for tests and ephemeral sessions
//! - `JsonFileStore` for a single pretty-printed JSON file on disk

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store file is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A mapping-backed store of JSON values
pub trait KeyValueStore: Send + Sync {
    /// Fetch the given keys. Keys that are not present are absent from the result.
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>>;

    /// Write every entry of `items`, replacing existing values.
    fn set(&self, items: Map<String, Value>) -> Result<()>;

    /// Remove the given keys. Missing keys are ignored.
    fn remove(&self, keys: &[&str]) -> Result<()>;

    /// Fetch a single key
    fn get_one(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(&[key])?.remove(key))
    }

    /// Write a single key
    fn set_one(&self, key: &str, value: Value) -> Result<()> {
        let mut items = Map::new();
        items.insert(key.to_string(), value);
        self.set(items)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        (**self).get(keys)
    }

    fn set(&self, items: Map<String, Value>) -> Result<()> {
        (**self).set(items)
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        (**self).remove(keys)
    }
}
