mod execute;
mod execute_tests;
mod output;

pub use execute::BuildResult;

use std::path::PathBuf;

use clap::Args;

fn validate_dir_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("Package directory not found: {}", path.display()))
    }
}

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

/// Compile a domain package into a relational schema
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  xuml_schema build models/pets                         # Uses models/pets/types.yaml
  xuml_schema build models/pets --types types.yaml      # Explicit type dictionary
  xuml_schema --db mem: build models/pets -o json       # Dry run, JSON report
  xuml_schema build models/pets --population pop.json   # Also dump the metamodel population")]
pub struct BuildCmd {
    /// Domain package directory holding one parsed file per subsystem
    #[arg(value_parser = validate_dir_exists)]
    pub package: PathBuf,

    /// Type dictionary (YAML); defaults to the package's types file
    #[arg(short, long, value_parser = validate_file_exists)]
    pub types: Option<PathBuf>,

    /// Subsystem file extension; overrides the config file
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Write the metamodel population to this JSON file
    #[arg(short, long)]
    pub population: Option<PathBuf>,
}
