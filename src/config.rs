//! Configuration file handling.
//!
//! This module provides loading and parsing of `.xuml_schema.json` configuration
//! files. The file is optional; every setting also has a CLI flag or a default.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::DatabaseConfig;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".xuml_schema.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Database configuration
    #[serde(default)]
    pub database: Option<DatabaseConfigFile>,

    /// Domain package layout
    #[serde(default)]
    pub package: PackageConfig,
}

/// Database configuration variants for different backends.
///
/// JSON format uses a "type" field with lowercase variant names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfigFile {
    /// CozoDB with SQLite storage at a file path
    Sqlite { path: PathBuf },
    /// CozoDB with in-memory storage
    #[serde(rename = "cozo-memory")]
    CozoMemory,
    /// Plain in-process catalog
    Memory,
}

/// Where the pieces of a domain package live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// File extension of parsed subsystem files
    pub subsystem_extension: String,
    /// Type dictionary file name, relative to the package directory
    pub types_file: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            subsystem_extension: "json".to_string(),
            types_file: "types.yaml".to_string(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from an explicit path, or from `.xuml_schema.json`
    /// in the current directory when it exists.
    ///
    /// A missing default file yields `Ok(None)`; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Option<Self>, Box<dyn Error>> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(None);
                }
                default
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            format!("Failed to read {}: {}", config_path.display(), e)
        })?;

        let config: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            format!("Invalid JSON in {}: {}", config_path.display(), e)
        })?;

        Ok(Some(config))
    }
}

impl DatabaseConfigFile {
    /// Convert this configuration to a DatabaseConfig.
    pub fn to_database_config(&self) -> DatabaseConfig {
        match self {
            Self::Sqlite { path } => DatabaseConfig::CozoSqlite { path: path.clone() },
            Self::CozoMemory => DatabaseConfig::CozoMem,
            Self::Memory => DatabaseConfig::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sqlite_deserialization() {
        let json = r#"
        {
            "database": {
                "type": "sqlite",
                "path": "./schema.sqlite"
            }
        }
        "#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.database,
            Some(DatabaseConfigFile::Sqlite { .. })
        ));
        assert_eq!(config.package, PackageConfig::default());
    }

    #[test]
    fn test_memory_variants_deserialization() {
        let config: ConfigFile =
            serde_json::from_str(r#"{"database": {"type": "memory"}}"#).unwrap();
        assert_eq!(config.database, Some(DatabaseConfigFile::Memory));

        let config: ConfigFile =
            serde_json::from_str(r#"{"database": {"type": "cozo-memory"}}"#).unwrap();
        assert_eq!(
            config.database.unwrap().to_database_config(),
            DatabaseConfig::CozoMem
        );
    }

    #[test]
    fn test_package_overrides() {
        let json = r#"{"package": {"subsystem_extension": "xcm.json"}}"#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.package.subsystem_extension, "xcm.json");
        assert_eq!(config.package.types_file, "types.yaml");
    }

    #[test]
    fn test_invalid_type_rejected() {
        let json = r#"{"database": {"type": "oracle"}}"#;
        assert!(serde_json::from_str::<ConfigFile>(json).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"database": {{"type": "memory"}}}}"#).unwrap();
        let config = ConfigFile::load(Some(file.path())).unwrap().unwrap();
        assert_eq!(config.database, Some(DatabaseConfigFile::Memory));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = ConfigFile::load(Some(Path::new("/nonexistent/.xuml_schema.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = ConfigFile::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
