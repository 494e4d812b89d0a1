use std::error::Error;

use serde::Serialize;

use super::NamesCmd;
use crate::commands::Execute;
use crate::config::PackageConfig;
use crate::db::SchemaBackend;

/// Result of the names command
#[derive(Debug, Default, Serialize)]
pub struct NamesResult {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub names: Vec<String>,
}

impl Execute for NamesCmd {
    type Output = NamesResult;

    fn execute(
        self,
        db: &mut dyn SchemaBackend,
        _package: &PackageConfig,
    ) -> Result<Self::Output, Box<dyn Error>> {
        let (kind, names) = if self.constraints {
            ("constraints", db.constraint_names(self.pattern.as_deref())?)
        } else {
            ("relations", db.relation_names(self.pattern.as_deref())?)
        };

        Ok(NamesResult {
            kind: kind.to_string(),
            pattern: self.pattern,
            names,
        })
    }
}
