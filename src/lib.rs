//! xuml_schema library - xtUML class model to relational schema compiler
//!
//! Reads the parsed subsystems of a domain package, materializes every class
//! as a relation, and turns every relationship into an association,
//! correlation or partition constraint on a relational back end.

pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod db;
pub mod model;
pub mod output;
pub mod population;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
