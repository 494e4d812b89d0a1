//! In-process back end.
//!
//! Keeps relations and constraints in ordered maps and records the history of
//! accepted creation requests, which makes it the back end of choice for tests
//! and for throwaway builds that only need the compile report.

use std::collections::BTreeMap;

use super::SchemaError;
use super::backend::SchemaBackend;
use super::schema::{Constraint, RelationDef};

/// A creation request accepted by a back end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRequest {
    CreateRelation(RelationDef),
    CreateConstraint(Constraint),
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    relations: BTreeMap<String, RelationDef>,
    constraints: BTreeMap<String, Constraint>,
    history: Vec<SchemaRequest>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted requests in the order they were issued.
    pub fn history(&self) -> &[SchemaRequest] {
        &self.history
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    /// Accepted constraints in the order they were issued.
    pub fn constraints_in_order(&self) -> impl Iterator<Item = &Constraint> {
        self.history.iter().filter_map(|r| match r {
            SchemaRequest::CreateConstraint(c) => Some(c),
            SchemaRequest::CreateRelation(_) => None,
        })
    }
}

impl SchemaBackend for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "Memory"
    }

    fn has_relation(&self, name: &str) -> Result<bool, SchemaError> {
        Ok(self.relations.contains_key(name))
    }

    fn relation_columns(&self, name: &str) -> Result<Option<Vec<String>>, SchemaError> {
        Ok(self
            .relations
            .get(name)
            .map(|r| r.attribute_names().map(str::to_string).collect()))
    }

    fn has_constraint(&self, name: &str) -> Result<bool, SchemaError> {
        Ok(self.constraints.contains_key(name))
    }

    fn store_relation(&mut self, relation: &RelationDef) -> Result<(), SchemaError> {
        self.relations
            .insert(relation.name.clone(), relation.clone());
        self.history
            .push(SchemaRequest::CreateRelation(relation.clone()));
        Ok(())
    }

    fn store_constraint(&mut self, constraint: &Constraint) -> Result<(), SchemaError> {
        self.constraints
            .insert(constraint.name().to_string(), constraint.clone());
        self.history
            .push(SchemaRequest::CreateConstraint(constraint.clone()));
        Ok(())
    }

    fn all_relation_names(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.relations.keys().cloned().collect())
    }

    fn all_constraint_names(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self.constraints.keys().cloned().collect())
    }
}
