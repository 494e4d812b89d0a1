mod execute;
mod output;

pub use execute::NamesResult;

use clap::Args;

/// List relation or constraint names in the database
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  xuml_schema names                    # All relations
  xuml_schema names 'Domain_*'         # Relations starting with Domain_
  xuml_schema names 'R?' --constraints # Constraints R1 through R9")]
pub struct NamesCmd {
    /// Glob pattern (`*` and `?`); lists everything when omitted
    pub pattern: Option<String>,

    /// List constraint names instead of relation names
    #[arg(short, long, default_value_t = false)]
    pub constraints: bool,
}
