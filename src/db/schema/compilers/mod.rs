//! Database schema compilers.
//!
//! Generates backend-specific DDL from backend-agnostic schema definitions.

pub mod cozo;

pub use cozo::CozoCompiler;
