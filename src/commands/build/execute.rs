use std::error::Error;
use std::fs;

use serde::Serialize;
use tracing::info;

use super::BuildCmd;
use crate::commands::Execute;
use crate::compiler::{CompileReport, SchemaCompiler};
use crate::config::PackageConfig;
use crate::db::SchemaBackend;
use crate::model::{JsonModelParser, TypeDictionary};

/// Result of the build command
#[derive(Debug, Default, Serialize)]
pub struct BuildResult {
    pub package: String,
    #[serde(flatten)]
    pub report: CompileReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_file: Option<String>,
}

impl Execute for BuildCmd {
    type Output = BuildResult;

    fn execute(
        self,
        db: &mut dyn SchemaBackend,
        package: &PackageConfig,
    ) -> Result<Self::Output, Box<dyn Error>> {
        let types_path = self
            .types
            .unwrap_or_else(|| self.package.join(&package.types_file));
        let types = TypeDictionary::load(&types_path)?;
        info!(path = %types_path.display(), types = types.len(), "Loaded type dictionary");

        let extension = self
            .extension
            .unwrap_or_else(|| package.subsystem_extension.clone());
        let parser = JsonModelParser::new(extension);
        let compilation = SchemaCompiler::new(db, &types).compile_package(&self.package, &parser)?;

        let population_file = match &self.population {
            Some(path) => {
                let json = serde_json::to_string_pretty(&compilation.population)?;
                fs::write(path, json).map_err(|e| {
                    format!("Failed to write population to {}: {}", path.display(), e)
                })?;
                Some(path.display().to_string())
            }
            None => None,
        };

        Ok(BuildResult {
            package: self.package.display().to_string(),
            report: compilation.report,
            population_file,
        })
    }
}
