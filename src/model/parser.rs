//! Reading parsed subsystem files from a domain package.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{MalformedRelationship, Subsystem, SubsystemRecord};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Subsystem '{subsystem}': {source}")]
    Malformed {
        subsystem: String,
        source: MalformedRelationship,
    },
}

/// Produces a [`Subsystem`] from one model file.
pub trait ModelParser {
    /// File extension (without the leading dot) of the files this parser reads.
    fn extension(&self) -> &str;

    fn parse_subsystem(&self, path: &Path) -> Result<Subsystem, ModelError>;
}

/// Reads the JSON documents emitted by the class model parser.
#[derive(Debug, Clone)]
pub struct JsonModelParser {
    extension: String,
}

impl JsonModelParser {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Parse a subsystem document held in memory.
    pub fn parse_str(&self, content: &str, name: &str) -> Result<Subsystem, ModelError> {
        parse_document(content, name, name)
    }
}

impl Default for JsonModelParser {
    fn default() -> Self {
        Self::new("json")
    }
}

impl ModelParser for JsonModelParser {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn parse_subsystem(&self, path: &Path) -> Result<Subsystem, ModelError> {
        let content = fs::read_to_string(path).map_err(|e| ModelError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        parse_document(
            &content,
            &path.display().to_string(),
            &subsystem_stem(path, &self.extension),
        )
    }
}

/// Deserialize and classify one subsystem document. `source` names it in
/// errors; `fallback_name` is used when the document carries no name.
fn parse_document(
    content: &str,
    source: &str,
    fallback_name: &str,
) -> Result<Subsystem, ModelError> {
    let record: SubsystemRecord = serde_json::from_str(content).map_err(|e| ModelError::Parse {
        path: source.to_string(),
        message: e.to_string(),
    })?;
    record.into_subsystem(fallback_name)
}

/// Subsystem files in `dir` ending in `.<extension>`, sorted by file name.
///
/// Hidden files are ignored.
pub fn list_subsystems(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ModelError> {
    let entries = fs::read_dir(dir).map_err(|e| ModelError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    let suffix = format!(".{}", extension);

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ModelError::Read {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && !file_name.starts_with('.') && file_name.ends_with(&suffix) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// File name with the subsystem extension stripped.
fn subsystem_stem(path: &Path, extension: &str) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_name
        .strip_suffix(&format!(".{}", extension))
        .map(str::to_string)
        .unwrap_or(file_name)
}
