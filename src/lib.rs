// kvtables - Relational-style tables on a flat key-value store
// One key per table, one JSON array of records per key

//! # kvtables
//!
//! Emulates named tables of records on top of any synchronous string
//! key-value store. A table is created, filled, queried by `id` and dropped
//! through [`TableStore`]; the store itself is injected through the
//! [`KeyValueStore`] trait.
//!
//! ## Quick start
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
//!     ])?;
//!
//! let bo = tables.get_one_by_id("users", "2")?;
//! assert_eq!(bo, Some(record! { "id" => "2", "name" => "Bo" }));
//!
//! tables.drop_table("users")?;
//! assert!(tables.get_all("users")?.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]

pub mod codec;
pub mod config;
pub mod kv;
pub mod logging;
pub mod table;
pub mod value;

// Re-exports for convenience
pub use config::{Backend, LogConfig, StoreConfig};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use table::TableStore;
pub use value::{Record, Value};

/// Error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Not found: {0}")]
        NotFound(String),

        #[error("Already exists: {0}")]
        AlreadyExists(String),

        #[error("Serialization error: {0}")]
        Serialization(String),

        #[error("Storage error: {0}")]
        Storage(String),

        #[error("Configuration error: {0}")]
        Config(String),
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = error::Error::NotFound("Table 'users'".into());
        assert_eq!(err.to_string(), "Not found: Table 'users'");

        let err = error::Error::AlreadyExists("Table 'users'".into());
        assert_eq!(err.to_string(), "Already exists: Table 'users'");
    }

    #[test]
    fn test_version_format() {
        assert!(!VERSION.is_empty());
    }
}
