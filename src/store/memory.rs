//! In-memory store

use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{KeyValueStore, Result, StoreError};

/// In-memory store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let items = self.items.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(keys
            .iter()
            .filter_map(|key| items.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    fn set(&self, new_items: Map<String, Value>) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| StoreError::LockPoisoned)?;
        items.extend(new_items);
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| StoreError::LockPoisoned)?;
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_only_returns_present_keys() {
        let store = MemoryStore::new();
        store.set_one("words", json!([])).unwrap();

        let result = store.get(&["words", "missing"]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["words"], json!([]));
    }

    #[test]
    fn test_set_replaces_and_remove_deletes() {
        let store = MemoryStore::new();
        store.set_one("flag", json!(false)).unwrap();
        store.set_one("flag", json!(true)).unwrap();
        assert_eq!(store.get_one("flag").unwrap(), Some(json!(true)));

        store.remove(&["flag", "never-set"]).unwrap();
        assert_eq!(store.get_one("flag").unwrap(), None);
    }
}
