//! Backend-agnostic database schema definitions.
//!
//! The schema compiler produces these values and hands them to a
//! [`SchemaBackend`](crate::db::SchemaBackend):
//!
//! - `RelationDef` - a relation with ordered typed attributes and identifier groups
//! - `AssociationConstraint`, `CorrelationConstraint`, `PartitionConstraint` -
//!   the three referential constraint variants
//! - `Mult` - relational multiplicity of one constraint side
//!
//! # Type Mapping
//!
//! | Rust Type | Cozo Type |
//! |-----------|-----------|
//! | String | String |
//! | Int | Int |
//! | Float | Float |
//! | Bool | Bool |

pub mod compilers;
mod definition;

pub use definition::{
    AssociationConstraint, AssociationEnd, Constraint, ConstraintKind, CorrelationConstraint,
    CorrelationEnd, DataType, Mult, PartitionConstraint, RelationAttribute, RelationDef,
};
