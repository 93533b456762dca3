//! Store configuration
//!
//! Selects the key-value backend and logging settings. Usually read from a
//! TOML file:
//!
//! ```toml
//! backend = "file"
//! path = "data/tables.json"
//!
//! [log]
//! level = "debug"
//! json = false
//! ansi = true
//! ```
//!
//! Every field is optional; the defaults give an in-memory store logging at
//! `info`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::kv::{FileStore, KeyValueStore, MemoryStore};
use crate::table::TableStore;

/// Which key-value store backs the tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local, lost on exit
    #[default]
    Memory,
    /// Single JSON file at `path`
    File,
}

/// Logging settings, consumed by [`crate::logging::init_logging`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Colored output (ignored for JSON)
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            ansi: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Backing file, required for [`Backend::File`]
    pub path: Option<PathBuf>,
    pub log: LogConfig,
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .build()
            .map_err(|e| Error::Config(format!("Failed to load {}: {}", path.display(), e)))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Invalid configuration in {}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(format!("Failed to render configuration: {}", e)))
    }

    /// Open the configured backend.
    pub fn open(&self) -> Result<Box<dyn KeyValueStore>> {
        match self.backend {
            Backend::Memory => {
                info!("Using in-memory store");
                Ok(Box::new(MemoryStore::new()))
            }
            Backend::File => {
                let path = self.path.as_ref().ok_or_else(|| {
                    Error::Config("The file backend requires a `path`".to_string())
                })?;
                Ok(Box::new(FileStore::open(path)?))
            }
        }
    }

    /// Open the configured backend and wrap it in a [`TableStore`].
    pub fn open_tables(&self) -> Result<TableStore<Box<dyn KeyValueStore>>> {
        Ok(TableStore::new(self.open()?))
    }
}
