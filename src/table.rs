//! Tables on top of a key-value store.
//!
//! # Overview
//!
//! Each table occupies exactly one key of the underlying store. The key is the
//! table name and the value is the JSON text of the table's records, in
//! insertion order:
//!
//! ```text
//! "users" → [{"id":"1","name":"Ann"},{"id":"2","name":"Bo"}]
//! "posts" → []
//! ```
//!
//! A table exists when its key is present, whatever the stored text is.
//! Reading or inserting into a table that was never created behaves as if it
//! were empty; only `create_table`, `drop_table` and `remove_by_id` report
//! missing or duplicate tables and records.
//!
//! # Concurrency
//!
//! Every mutation is a read-modify-write of the whole table with no locking at
//! this layer. Two interleaved mutations of the same table through different
//! handles can lose an update. Callers needing more must serialize access
//! themselves.
//!
//! # Examples
//!
//! ```rust
//! use kvtables::{record, MemoryStore, TableStore};
//!
//! # fn main() -> kvtables::error::Result<()> {
//! let tables = TableStore::new(MemoryStore::new());
//!
//! tables
//!     .create_table("users")?
//!     .insert("users", [
//!         record! { "id" => "1", "name" => "Ann" },
//!         record! { "id" => "2", "name" => "Bo" },
//!     ])?
//!     .remove_by_id("users", "1")?;
//!
//! assert_eq!(tables.get_all("users")?, vec![record! { "id" => "2", "name" => "Bo" }]);
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::codec;
use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::value::{Record, Value};

/// Table operations over an injected key-value store.
///
/// Holds nothing but the store handle; all table state lives in the store.
/// Lifecycle and mutation methods return `&Self` so calls can be chained.
#[derive(Debug, Clone, Default)]
pub struct TableStore<S> {
    store: S,
}

impl<S: KeyValueStore> TableStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Creates an empty table.
    ///
    /// Returns [`Error::AlreadyExists`] if anything is stored under `name`.
    #[instrument(skip(self), fields(table = %name))]
    pub fn create_table(&self, name: &str) -> Result<&Self> {
        if self.store.contains(name)? {
            return Err(Error::AlreadyExists(format!("Table '{}'", name)));
        }

        self.store.set(name, codec::EMPTY_TABLE.to_string())?;
        debug!("Created table {}", name);
        Ok(self)
    }

    /// Drops a table and all of its records.
    ///
    /// Returns [`Error::NotFound`] if nothing is stored under `name`.
    #[instrument(skip(self), fields(table = %name))]
    pub fn drop_table(&self, name: &str) -> Result<&Self> {
        if !self.store.contains(name)? {
            return Err(Error::NotFound(format!("Table '{}'", name)));
        }

        self.store.remove(name)?;
        debug!("Dropped table {}", name);
        Ok(self)
    }

    /// Clears the whole store, dropping every table at once. This also removes
    /// keys that were written to the store by anything other than this type.
    #[instrument(skip(self))]
    pub fn drop_all_tables(&self) -> Result<&Self> {
        self.store.clear()?;
        debug!("Dropped all tables");
        Ok(self)
    }

    /// True when `name` is present in the store.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        self.store.contains(name)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Appends records to a table, in iteration order.
    ///
    /// A table that does not exist yet is created. Records are not validated
    /// and duplicate ids are accepted.
    #[instrument(skip(self, records), fields(table = %name))]
    pub fn insert<I>(&self, name: &str, records: I) -> Result<&Self>
    where
        I: IntoIterator,
        I::Item: Into<Record>,
    {
        let mut rows = self.read(name)?;
        let before = rows.len();
        rows.extend(records.into_iter().map(Into::into));

        self.write(name, &rows)?;
        debug!("Inserted {} records into {}", rows.len() - before, name);
        Ok(self)
    }

    /// Serializes typed items through serde and appends them.
    ///
    /// Non-finite floats inside `T` are stored as `null`: serde's JSON
    /// conversion maps them before the records reach the encoder.
    pub fn insert_as<T, I>(&self, name: &str, items: I) -> Result<&Self>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let records = items
            .into_iter()
            .map(|item| {
                serde_json::to_value(item).map(Value::from).map_err(|e| {
                    Error::Serialization(format!("Failed to convert item: {}", e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.insert(name, records)
    }

    /// Removes, for each item, the first record equal to it.
    ///
    /// Equality is structural, so a freshly built copy of a stored record
    /// matches it. Items with no equal record are skipped.
    #[instrument(skip(self, items), fields(table = %name))]
    pub fn remove<I>(&self, name: &str, items: I) -> Result<&Self>
    where
        I: IntoIterator,
        I::Item: Into<Record>,
    {
        let mut rows = self.read(name)?;
        let mut removed = 0;

        for item in items {
            let item = item.into();
            if let Some(pos) = rows.iter().position(|row| *row == item) {
                rows.remove(pos);
                removed += 1;
            }
        }

        self.write(name, &rows)?;
        debug!("Removed {} records from {}", removed, name);
        Ok(self)
    }

    /// Removes the first record whose `id` field equals `id`.
    ///
    /// Returns [`Error::NotFound`] and leaves the table untouched when no
    /// record has that id.
    #[instrument(skip(self, id), fields(table = %name))]
    pub fn remove_by_id(&self, name: &str, id: impl Into<Value>) -> Result<&Self> {
        let id = id.into();
        let mut rows = self.read(name)?;

        let pos = rows
            .iter()
            .position(|row| row.has_id(&id))
            .ok_or_else(|| Error::NotFound(format!("Record with id {} in table '{}'", id, name)))?;

        rows.remove(pos);
        self.write(name, &rows)?;
        debug!("Removed record {} from {}", id, name);
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Returns a snapshot of every record in the table, in order.
    /// A table that does not exist reads as empty.
    #[instrument(skip(self), fields(table = %name))]
    pub fn get_all(&self, name: &str) -> Result<Vec<Record>> {
        let rows = self.read(name)?;
        debug!("Read {} records from {}", rows.len(), name);
        Ok(rows)
    }

    /// Typed variant of [`get_all`](Self::get_all).
    pub fn get_all_as<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        self.read(name)?.into_iter().map(from_record).collect()
    }

    /// Returns the first record whose `id` field equals `id`, or `None`.
    #[instrument(skip(self, id), fields(table = %name))]
    pub fn get_one_by_id(&self, name: &str, id: impl Into<Value>) -> Result<Option<Record>> {
        let id = id.into();
        Ok(self.read(name)?.into_iter().find(|row| row.has_id(&id)))
    }

    /// Typed variant of [`get_one_by_id`](Self::get_one_by_id).
    pub fn get_one_by_id_as<T: DeserializeOwned>(
        &self,
        name: &str,
        id: impl Into<Value>,
    ) -> Result<Option<T>> {
        self.get_one_by_id(name, id)?.map(from_record).transpose()
    }

    /// Number of records in the table; zero when it does not exist.
    pub fn count(&self, name: &str) -> Result<usize> {
        Ok(self.read(name)?.len())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn read(&self, name: &str) -> Result<Vec<Record>> {
        match self.store.get(name)? {
            Some(text) => codec::decode(name, &text),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, name: &str, rows: &[Record]) -> Result<()> {
        let text = codec::encode(rows)?;
        self.store.set(name, text)
    }
}

fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    serde_json::from_value(serde_json::Value::from(record))
        .map_err(|e| Error::Serialization(format!("Failed to convert record: {}", e)))
}
