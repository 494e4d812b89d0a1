//! Execute tests for build command.

#[cfg(test)]
mod tests {
    use super::super::BuildCmd;
    use crate::commands::Execute;
    use crate::compiler::CompileError;
    use crate::config::PackageConfig;
    use crate::db::{MemoryBackend, SchemaRequest};
    use crate::test_utils::{ANIMALS_JSON, PackageBuilder, TYPES_YAML};
    use rstest::rstest;
    use std::fs;
    use std::path::PathBuf;

    fn build_cmd(package: PathBuf) -> BuildCmd {
        BuildCmd {
            package,
            types: None,
            extension: None,
            population: None,
        }
    }

    #[rstest]
    fn test_build_sample_package() {
        let package = PackageBuilder::sample();
        let mut db = MemoryBackend::new();

        let result = build_cmd(package.path().to_path_buf())
            .execute(&mut db, &PackageConfig::default())
            .unwrap();

        assert_eq!(result.report.subsystems, vec!["Animals", "Ownership"]);
        assert_eq!(result.report.relations.len(), 5);
        assert_eq!(result.report.constraints.len(), 3);
        assert_eq!(result.report.ordinal, vec!["O1"]);
        assert_eq!(result.report.skipped_imports, vec!["Party"]);
        assert_eq!(result.report.deferred.len(), 1);
        assert_eq!(result.report.deferred[0].missing, "Party");
        assert!(result.population_file.is_none());

        let relations = db
            .history()
            .iter()
            .filter(|r| matches!(r, SchemaRequest::CreateRelation(_)))
            .count();
        assert_eq!(relations, 5);
    }

    #[rstest]
    fn test_build_writes_population() {
        let package = PackageBuilder::sample();
        let out = package.path().join("population.out");
        let mut db = MemoryBackend::new();
        let mut cmd = build_cmd(package.path().to_path_buf());
        cmd.population = Some(out.clone());

        let result = cmd.execute(&mut db, &PackageConfig::default()).unwrap();
        assert_eq!(result.population_file, Some(out.display().to_string()));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(
            written["attributes"].as_array().unwrap().len(),
            result.report.population.attributes
        );
    }

    #[rstest]
    fn test_build_custom_extension_and_types_file() {
        let package = PackageBuilder::new()
            .file("pets.xcm.json", ANIMALS_JSON)
            .file("dict.yaml", TYPES_YAML)
            .build();
        let mut db = MemoryBackend::new();
        let config = PackageConfig {
            subsystem_extension: "xcm.json".to_string(),
            types_file: "dict.yaml".to_string(),
        };

        let result = build_cmd(package.path().to_path_buf())
            .execute(&mut db, &config)
            .unwrap();
        assert_eq!(result.report.subsystems, vec!["Animals"]);
    }

    #[rstest]
    fn test_build_missing_types_file() {
        let package = PackageBuilder::new()
            .file("animals.json", ANIMALS_JSON)
            .build();
        let mut db = MemoryBackend::new();

        let err = build_cmd(package.path().to_path_buf())
            .execute(&mut db, &PackageConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("types.yaml"));
    }

    #[rstest]
    fn test_build_unknown_type_is_fatal() {
        let package = PackageBuilder::new()
            .file("animals.json", ANIMALS_JSON)
            .file("types.yaml", "Name: string\n")
            .build();
        let mut db = MemoryBackend::new();

        let err = build_cmd(package.path().to_path_buf())
            .execute(&mut db, &PackageConfig::default())
            .unwrap_err();
        let compile_err = err.downcast_ref::<CompileError>().unwrap();
        assert!(matches!(compile_err, CompileError::UnknownType { .. }));
    }
}
