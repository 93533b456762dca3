//! File-backed key-value store
//!
//! The whole store lives in one JSON object file mapping keys to string
//! values. It is read once when opened and rewritten on every change, so the
//! file always reflects the last completed operation.
//!
//! Writes go to a sibling `.tmp` file that is then renamed over the original.
//! A crash mid-write leaves the previous contents in place.

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Key-value store persisted to a single JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store; nothing is written until the first
    /// change.
    ///
    /// # Example
    /// ```rust,no_run
    /// use kvtables::kv::{FileStore, KeyValueStore};
    ///
    /// let store = FileStore::open("data/tables.json")?;
    /// store.set("greeting", "[]".to_string())?;
    /// # Ok::<(), kvtables::error::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let data: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                Error::Storage(format!("Malformed store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        info!(path = %path.display(), keys = data.len(), "Opened file store");

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the map and persists it. The in-memory
    /// map is only replaced once the file write succeeded.
    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut data = self.data.lock();
        let mut next = data.clone();
        change(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let text = serde_json::to_string(data)
            .map_err(|e| Error::Storage(format!("JSON serialization failed: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), keys = data.len(), "Persisted file store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: String) -> Result<()> {
        self.update(|data| {
            data.insert(key.to_string(), value);
        })
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<()> {
        if !self.data.lock().contains_key(key) {
            return Ok(());
        }
        self.update(|data| {
            data.remove(key);
        })
    }

    #[instrument(skip(self))]
    fn clear(&self) -> Result<()> {
        self.update(|data| data.clear())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.data.lock().contains_key(key))
    }
}
