//! Core schema definition types.
//!
//! Provides a backend-agnostic description of the relations and referential
//! constraints produced by the schema compiler. Every back end receives these
//! types and nothing else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Represents a concrete database data type.
///
/// Model-level type names are mapped onto these through the type dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// String/text data
    String,
    /// Integer data
    #[serde(alias = "integer")]
    Int,
    /// Floating point data
    #[serde(alias = "double")]
    Float,
    /// Boolean data
    #[serde(alias = "boolean")]
    Bool,
}

impl DataType {
    /// Returns the Cozo type name for this data type.
    pub fn cozo_type(&self) -> &'static str {
        match self {
            DataType::String => "String",
            DataType::Int => "Int",
            DataType::Float => "Float",
            DataType::Bool => "Bool",
        }
    }
}

/// Relational multiplicity of one side of a referential constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mult {
    AtLeastOne,
    ExactlyOne,
    ZeroOneOrMany,
    ZeroOrOne,
}

impl Mult {
    /// Returns the conventional single-character specifier (`+`, `1`, `*`, `?`).
    pub fn symbol(&self) -> &'static str {
        match self {
            Mult::AtLeastOne => "+",
            Mult::ExactlyOne => "1",
            Mult::ZeroOneOrMany => "*",
            Mult::ZeroOrOne => "?",
        }
    }
}

/// A typed attribute of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationAttribute {
    pub name: String,
    pub data_type: DataType,
}

impl RelationAttribute {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A complete relation definition: ordered typed attributes plus identifier groups.
///
/// Identifier groups map a group number (1 for the primary identifier, 2 for `I2`, ...)
/// to the ordered names of the attributes composing that candidate key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    pub name: String,
    pub attributes: Vec<RelationAttribute>,
    pub identifiers: BTreeMap<u32, Vec<String>>,
}

impl RelationDef {
    /// Returns the attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Attributes forming the storage key: identifier group 1 if declared,
    /// otherwise the lowest numbered group, otherwise every attribute.
    pub fn key_attributes(&self) -> Vec<&RelationAttribute> {
        match self.identifiers.values().next() {
            Some(key) => key
                .iter()
                .filter_map(|name| self.attributes.iter().find(|a| &a.name == name))
                .collect(),
            None => self.attributes.iter().collect(),
        }
    }

    /// Attributes that are not part of the storage key, in declaration order.
    pub fn value_attributes(&self) -> Vec<&RelationAttribute> {
        let key: Vec<&str> = self.key_attributes().iter().map(|a| a.name.as_str()).collect();
        self.attributes
            .iter()
            .filter(|a| !key.contains(&a.name.as_str()))
            .collect()
    }
}

/// One side of an association: relation, attributes and multiplicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationEnd {
    pub relation: String,
    pub attrs: Vec<String>,
    pub mult: Mult,
}

/// Referential association from a referring relation to a referenced relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationConstraint {
    pub name: String,
    pub from: AssociationEnd,
    pub to: AssociationEnd,
}

/// One participant of a correlation.
///
/// `attrs` live on the correlation relation and refer to `ref_attrs` of `relation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationEnd {
    pub attrs: Vec<String>,
    pub mult: Mult,
    pub relation: String,
    pub ref_attrs: Vec<String>,
}

/// Correlation constraint backed by an association class relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationConstraint {
    pub name: String,
    pub correlation_relation: String,
    pub a: CorrelationEnd,
    pub b: CorrelationEnd,
}

/// Partition of a superclass relation into disjoint subclass relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConstraint {
    pub name: String,
    pub superclass: String,
    pub super_attrs: Vec<String>,
    /// Subclass relation name -> its referencing attributes.
    pub subclasses: BTreeMap<String, Vec<String>>,
}

/// Discriminant of the constraint variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Association,
    Correlation,
    Partition,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Association => "association",
            ConstraintKind::Correlation => "correlation",
            ConstraintKind::Partition => "partition",
        }
    }
}

/// Any referential constraint the compiler can issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Constraint {
    Association(AssociationConstraint),
    Correlation(CorrelationConstraint),
    Partition(PartitionConstraint),
}

impl Constraint {
    pub fn name(&self) -> &str {
        match self {
            Constraint::Association(c) => &c.name,
            Constraint::Correlation(c) => &c.name,
            Constraint::Partition(c) => &c.name,
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Association(_) => ConstraintKind::Association,
            Constraint::Correlation(_) => ConstraintKind::Correlation,
            Constraint::Partition(_) => ConstraintKind::Partition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(identifiers: &[(u32, &[&str])]) -> RelationDef {
        RelationDef {
            name: "Attribute".to_string(),
            attributes: vec![
                RelationAttribute::new("Name", DataType::String),
                RelationAttribute::new("Class", DataType::String),
                RelationAttribute::new("Domain", DataType::String),
                RelationAttribute::new("Type", DataType::String),
            ],
            identifiers: identifiers
                .iter()
                .map(|(n, attrs)| (*n, attrs.iter().map(|a| a.to_string()).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_datatype_cozo_types() {
        assert_eq!(DataType::String.cozo_type(), "String");
        assert_eq!(DataType::Int.cozo_type(), "Int");
        assert_eq!(DataType::Float.cozo_type(), "Float");
        assert_eq!(DataType::Bool.cozo_type(), "Bool");
    }

    #[test]
    fn test_datatype_aliases() {
        let parsed: Vec<DataType> =
            serde_json::from_str(r#"["string", "integer", "double", "boolean", "int"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                DataType::String,
                DataType::Int,
                DataType::Float,
                DataType::Bool,
                DataType::Int
            ]
        );
    }

    #[test]
    fn test_mult_symbols() {
        assert_eq!(Mult::AtLeastOne.symbol(), "+");
        assert_eq!(Mult::ExactlyOne.symbol(), "1");
        assert_eq!(Mult::ZeroOneOrMany.symbol(), "*");
        assert_eq!(Mult::ZeroOrOne.symbol(), "?");
    }

    #[test]
    fn test_key_attributes_use_primary_identifier() {
        let rel = relation(&[(1, &["Name", "Class", "Domain"]), (2, &["Type"])]);
        let key: Vec<_> = rel.key_attributes().iter().map(|a| a.name.clone()).collect();
        assert_eq!(key, vec!["Name", "Class", "Domain"]);

        let values: Vec<_> = rel.value_attributes().iter().map(|a| a.name.clone()).collect();
        assert_eq!(values, vec!["Type"]);
    }

    #[test]
    fn test_key_attributes_without_identifiers() {
        let rel = relation(&[]);
        assert_eq!(rel.key_attributes().len(), 4);
        assert!(rel.value_attributes().is_empty());
    }

    #[test]
    fn test_constraint_name_and_kind() {
        let c = Constraint::Partition(PartitionConstraint {
            name: "R12".to_string(),
            superclass: "Animal".to_string(),
            super_attrs: vec!["ID".to_string()],
            subclasses: BTreeMap::new(),
        });
        assert_eq!(c.name(), "R12");
        assert_eq!(c.kind(), ConstraintKind::Partition);
        assert_eq!(c.kind().as_str(), "partition");
    }

    #[test]
    fn test_constraint_serializes_with_kind_tag() {
        let c = Constraint::Association(AssociationConstraint {
            name: "R1".to_string(),
            from: AssociationEnd {
                relation: "Owner".to_string(),
                attrs: vec!["OwnerName".to_string()],
                mult: Mult::ZeroOrOne,
            },
            to: AssociationEnd {
                relation: "Party".to_string(),
                attrs: vec!["Name".to_string()],
                mult: Mult::AtLeastOne,
            },
        });
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "association");
        assert_eq!(json["from"]["mult"], "ZERO_OR_ONE");

        let back: Constraint = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
