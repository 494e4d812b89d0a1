//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl producing a serializable result
//! - An `Outputable` impl for that result

mod build;
mod names;

pub use build::{BuildCmd, BuildResult};
pub use names::{NamesCmd, NamesResult};

use clap::Subcommand;
use std::error::Error;

use crate::config::PackageConfig;
use crate::db::SchemaBackend;
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(
        self,
        db: &mut dyn SchemaBackend,
        package: &PackageConfig,
    ) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a domain package into a relational schema
    Build(BuildCmd),

    /// List relation or constraint names in the database
    Names(NamesCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(
        self,
        db: &mut dyn SchemaBackend,
        package: &PackageConfig,
        format: OutputFormat,
    ) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Build(cmd) => {
                let result = cmd.execute(db, package)?;
                Ok(result.format(format))
            }
            Command::Names(cmd) => {
                let result = cmd.execute(db, package)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().unwrap_or(&String::new())).into())
            }
        }
    }
}
