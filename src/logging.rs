//! Logging setup

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;
use crate::error::{Error, Result};

/// Install a global `tracing` subscriber.
///
/// `config.level` is the default level; directives in `RUST_LOG` take
/// precedence. Fails if the level is not a valid `tracing::Level` or a global
/// subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let level = config
        .level
        .parse::<tracing::Level>()
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_ansi(false)).try_init()
    } else {
        registry.with(fmt::layer().with_ansi(config.ansi)).try_init()
    };

    installed.map_err(|e| Error::Config(format!("Logging already initialized: {}", e)))
}
