//! Relational back ends for the compiled schema.
//!
//! This module provides the back-end collaborator of the schema compiler:
//! - `SchemaBackend` - the creation and enumeration interface the compiler talks to
//! - `MemoryBackend` - an in-process catalog that records every accepted request
//! - `CozoBackend` - CozoDB stored relations (SQLite-backed or in-memory)
//! - `DatabaseConfig` - runtime selection of one of the above
//!
//! # Architecture
//!
//! The compiler never validates what it hands over; the provided methods of
//! `SchemaBackend` do, so every back end rejects the same malformed requests
//! with the same `SchemaError`.

mod backend;
mod config;
mod cozo;
mod memory;
pub mod schema;

pub use backend::{SchemaBackend, glob_to_regex};
pub use config::DatabaseConfig;
pub use cozo::CozoBackend;
pub use memory::{MemoryBackend, SchemaRequest};

use thiserror::Error;

/// Errors raised by a back end while creating or listing schema elements.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to open database '{path}': {message}")]
    OpenFailed { path: String, message: String },

    #[error("Relation '{name}' already exists")]
    DuplicateRelation { name: String },

    #[error("Relation '{name}' has no attributes")]
    EmptyRelation { name: String },

    #[error("Relation '{relation}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute { relation: String, attribute: String },

    #[error("Relation '{relation}' identifier {number} lists '{attribute}' more than once")]
    DuplicateIdentifierAttribute {
        relation: String,
        number: u32,
        attribute: String,
    },

    #[error("Constraint '{name}' already exists")]
    DuplicateConstraint { name: String },

    #[error("Unknown relation '{name}'")]
    UnknownRelation { name: String },

    #[error("Relation '{relation}' has no attribute '{attribute}'")]
    UnknownAttribute { relation: String, attribute: String },

    #[error(
        "Constraint '{name}': {referring} referring attribute(s) against {referenced} referenced attribute(s)"
    )]
    AttributeCountMismatch {
        name: String,
        referring: usize,
        referenced: usize,
    },

    #[error("Partition '{name}' has no subclasses")]
    EmptyPartition { name: String },

    #[error("Invalid name pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Backend failure: {message}")]
    Backend { message: String },
}
