//! Key-value store capability.
//!
//! # Architecture
//!
//! Tables never talk to a concrete backend. They are handed something that
//! implements [`KeyValueStore`], a flat map from string keys to string values:
//!
//! ```text
//! TableStore (tables, records, ids)
//!   └─→ KeyValueStore (get / set / remove / clear)
//!        ├─→ MemoryStore (in-process map, used by tests)
//!        └─→ FileStore   (JSON file, written through on every change)
//! ```
//!
//! Methods take `&self`; backends provide their own interior mutability. The
//! trait is implemented for `&S`, `Arc<S>` and `Box<S>` so a caller can keep a
//! handle on the store it passed to a `TableStore`.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use std::sync::Arc;

/// Flat, synchronous string key-value store.
pub trait KeyValueStore {
    /// Returns the value stored at `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> Result<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Deletes every key.
    fn clear(&self) -> Result<()>;

    /// True when a value is stored at `key`, whatever that value is.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: impl KeyValueStore) -> Result<()> {
        store.set("a", "1".to_string())?;
        assert_eq!(store.get("a")?.as_deref(), Some("1"));
        assert!(store.contains("a")?);
        store.remove("a")?;
        assert!(!store.contains("a")?);
        Ok(())
    }

    #[test]
    fn test_forwarding_impls() -> Result<()> {
        let store = MemoryStore::new();
        exercise(&store)?;
        exercise(Arc::new(store.clone()))?;

        let boxed: Box<dyn KeyValueStore> = Box::new(store);
        exercise(boxed)
    }

    #[test]
    fn test_contains_ignores_value_content() -> Result<()> {
        let store = MemoryStore::new();
        store.set("empty", String::new())?;
        store.set("zero", "0".to_string())?;

        assert!(store.contains("empty")?);
        assert!(store.contains("zero")?);
        assert!(!store.contains("other")?);
        Ok(())
    }
}
