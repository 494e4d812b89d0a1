//! Type dictionary: model type names to concrete database types.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::ModelError;
use crate::db::schema::DataType;

/// Placeholder type name carried by attributes that declare no type.
///
/// It never resolves, so such attributes fail materialization.
pub const UNRESOLVED_TYPE: &str = "<unresolved>";

#[derive(Debug, Clone, Default)]
pub struct TypeDictionary {
    types: BTreeMap<String, DataType>,
}

impl TypeDictionary {
    /// Load a YAML mapping such as `Name: string`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|e| ModelError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ModelError::Parse { message, .. } => ModelError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ModelError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let types: Option<BTreeMap<String, DataType>> =
            serde_yaml::from_str(content).map_err(|e| ModelError::Parse {
                path: "<types>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            types: types.unwrap_or_default(),
        })
    }

    pub fn resolve(&self, type_name: &str) -> Option<DataType> {
        self.types.get(type_name).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, DataType)> for TypeDictionary {
    fn from_iter<I: IntoIterator<Item = (S, DataType)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
