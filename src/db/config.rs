//! Database configuration for runtime backend selection.
//!
//! This module provides configuration parsing and backend instantiation for the
//! back-end abstraction layer.

use std::error::Error;
use std::path::PathBuf;

use super::backend::SchemaBackend;
use super::cozo::CozoBackend;
use super::memory::MemoryBackend;

/// Environment variable holding a database URL.
pub const DB_ENV_VAR: &str = "XUML_SCHEMA_DB";

/// Default database location when nothing else is configured.
pub const DEFAULT_DB: &str = "./schema.sqlite";

/// Configuration for database backend selection.
///
/// Enables runtime selection of different back ends via CLI arguments,
/// environment variables, or configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// Local CozoDB with SQLite storage (current default).
    CozoSqlite { path: PathBuf },

    /// Local CozoDB with in-memory storage.
    CozoMem,

    /// Plain in-process catalog; nothing outlives the process.
    Memory,
}

impl DatabaseConfig {
    /// Create a backend instance from this configuration.
    pub fn connect(&self) -> Result<Box<dyn SchemaBackend>, Box<dyn Error>> {
        let backend = match self {
            Self::CozoSqlite { path } => {
                Box::new(CozoBackend::open(path)?) as Box<dyn SchemaBackend>
            }
            Self::CozoMem => Box::new(CozoBackend::open_mem()?) as Box<dyn SchemaBackend>,
            Self::Memory => Box::new(MemoryBackend::new()) as Box<dyn SchemaBackend>,
        };

        Ok(backend)
    }

    /// Parse from a connection URL or file path.
    ///
    /// Supported formats:
    /// - `./path/to/db.sqlite` or `/absolute/path` → CozoSqlite
    /// - `sqlite:///path/to/db` → CozoSqlite
    /// - `:memory:` → CozoMem
    /// - `mem:` → Memory
    pub fn from_url(url: &str) -> Result<Self, Box<dyn Error>> {
        if url.is_empty() {
            return Err("Empty database URL".into());
        }

        if url == ":memory:" {
            return Ok(Self::CozoMem);
        }

        if url == "mem:" {
            return Ok(Self::Memory);
        }

        if let Some(path) = url.strip_prefix("sqlite://") {
            return Ok(Self::CozoSqlite {
                path: PathBuf::from(path),
            });
        }

        if url.contains("://") {
            return Err(format!("Unsupported database URL: {}", url).into());
        }

        Ok(Self::CozoSqlite {
            path: PathBuf::from(url),
        })
    }

    /// Load from the `XUML_SCHEMA_DB` environment variable.
    pub fn from_env() -> Result<Option<Self>, Box<dyn Error>> {
        match std::env::var(DB_ENV_VAR) {
            Ok(url) => Ok(Some(Self::from_url(&url)?)),
            Err(_) => Ok(None),
        }
    }

    /// Resolve configuration from the CLI flag, config file and environment.
    ///
    /// Priority: CLI flag > Config file > Environment > Default (./schema.sqlite)
    pub fn resolve(
        cli_url: Option<&str>,
        config_file: Option<&crate::config::ConfigFile>,
    ) -> Result<Self, Box<dyn Error>> {
        if let Some(url) = cli_url {
            return Self::from_url(url);
        }

        if let Some(database) = config_file.and_then(|c| c.database.as_ref()) {
            return Ok(database.to_database_config());
        }

        if let Some(config) = Self::from_env()? {
            return Ok(config);
        }

        Self::from_url(DEFAULT_DB)
    }
}
