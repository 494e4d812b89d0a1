//! Metamodel population built alongside the schema.
//!
//! Each materialized class contributes one attribute row per attribute, one
//! identifier row per identifier group, and one identifier-attribute row per
//! (attribute, identifier group) pair, which is how composite keys are recorded.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{AttributeRecord, UNRESOLVED_TYPE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub name: String,
    pub class: String,
    pub domain: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierRow {
    pub number: u32,
    pub class: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierAttributeRow {
    pub identifier: u32,
    pub attribute: String,
    pub class: String,
    pub domain: String,
}

/// A class being populated, with the identifier groups already emitted for it.
#[derive(Debug, Clone)]
pub struct MetaClass {
    pub name: String,
    pub domain: String,
    identifiers: BTreeSet<u32>,
}

impl MetaClass {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            identifiers: BTreeSet::new(),
        }
    }

    pub fn identifiers(&self) -> &BTreeSet<u32> {
        &self.identifiers
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Population {
    pub attributes: Vec<AttributeRow>,
    pub identifiers: Vec<IdentifierRow>,
    pub identifier_attributes: Vec<IdentifierAttributeRow>,
}

/// Row counts of a population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulationCounts {
    pub attributes: usize,
    pub identifiers: usize,
    pub identifier_attributes: usize,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one attribute of `class`, creating identifier rows on first reference.
    pub fn add_attribute(&mut self, class: &mut MetaClass, record: &AttributeRecord) {
        self.attributes.push(AttributeRow {
            name: record.name.clone(),
            class: class.name.clone(),
            domain: class.domain.clone(),
            type_name: record
                .type_name
                .clone()
                .unwrap_or_else(|| UNRESOLVED_TYPE.to_string()),
        });

        let mut seen = BTreeSet::new();
        for id in &record.identifiers {
            // A group listed twice for the same attribute composes it once.
            if !seen.insert(id.number) {
                continue;
            }
            if class.identifiers.insert(id.number) {
                self.identifiers.push(IdentifierRow {
                    number: id.number,
                    class: class.name.clone(),
                    domain: class.domain.clone(),
                });
            }
            self.identifier_attributes.push(IdentifierAttributeRow {
                identifier: id.number,
                attribute: record.name.clone(),
                class: class.name.clone(),
                domain: class.domain.clone(),
            });
        }
    }

    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts {
            attributes: self.attributes.len(),
            identifiers: self.identifiers.len(),
            identifier_attributes: self.identifier_attributes.len(),
        }
    }
}
