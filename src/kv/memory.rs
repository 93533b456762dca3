//! In-memory key-value store
//!
//! Keeps everything in a process-local map. Clones share the same map, so a
//! test can hand one clone to a `TableStore` and inspect the raw entries
//! through another.

use crate::error::Result;
use crate::kv::KeyValueStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of keys stored
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// All keys, in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.data.lock().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.data.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.data.lock().clear();
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.data.lock().contains_key(key))
    }
}
