//! Back-end trait for the relational store that receives the compiled schema.
//!
//! Implementations provide raw storage primitives. The creation operations the
//! compiler calls are provided methods: they validate the request against what
//! the back end already holds, then delegate to the primitives. Validation is
//! therefore identical for every back end.

use regex::Regex;

use super::SchemaError;
use super::schema::{
    AssociationConstraint, Constraint, CorrelationConstraint, PartitionConstraint, RelationDef,
};

/// Trait for back ends that store relations and referential constraints.
pub trait SchemaBackend {
    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Check if a relation exists.
    fn has_relation(&self, name: &str) -> Result<bool, SchemaError>;

    /// Attribute names of a relation, or `None` if the relation does not exist.
    fn relation_columns(&self, name: &str) -> Result<Option<Vec<String>>, SchemaError>;

    /// Check if a constraint exists.
    fn has_constraint(&self, name: &str) -> Result<bool, SchemaError>;

    /// Persist an already validated relation.
    fn store_relation(&mut self, relation: &RelationDef) -> Result<(), SchemaError>;

    /// Persist an already validated constraint.
    fn store_constraint(&mut self, constraint: &Constraint) -> Result<(), SchemaError>;

    /// Names of all user relations, in any order.
    fn all_relation_names(&self) -> Result<Vec<String>, SchemaError>;

    /// Names of all constraints, in any order.
    fn all_constraint_names(&self) -> Result<Vec<String>, SchemaError>;

    /// Create a relation with typed attributes and identifier groups.
    fn create_relation(&mut self, relation: &RelationDef) -> Result<(), SchemaError> {
        if self.has_relation(&relation.name)? {
            return Err(SchemaError::DuplicateRelation {
                name: relation.name.clone(),
            });
        }
        if relation.attributes.is_empty() {
            return Err(SchemaError::EmptyRelation {
                name: relation.name.clone(),
            });
        }
        let columns: Vec<String> = relation.attribute_names().map(str::to_string).collect();
        if let Some(attr) = first_repeat(&columns) {
            return Err(SchemaError::DuplicateAttribute {
                relation: relation.name.clone(),
                attribute: attr.clone(),
            });
        }
        for (number, attrs) in &relation.identifiers {
            check_attrs(&relation.name, &columns, attrs)?;
            if let Some(attribute) = first_repeat(attrs) {
                return Err(SchemaError::DuplicateIdentifierAttribute {
                    relation: relation.name.clone(),
                    number: *number,
                    attribute: attribute.clone(),
                });
            }
        }
        self.store_relation(relation)
    }

    /// Create an association constraint between a referring and a referenced relation.
    fn create_association_constraint(
        &mut self,
        constraint: &AssociationConstraint,
    ) -> Result<(), SchemaError> {
        check_new_constraint(&*self, &constraint.name)?;
        check_reference(&*self, &constraint.from.relation, &constraint.from.attrs)?;
        check_reference(&*self, &constraint.to.relation, &constraint.to.attrs)?;
        check_counts(&constraint.name, &constraint.from.attrs, &constraint.to.attrs)?;
        self.store_constraint(&Constraint::Association(constraint.clone()))
    }

    /// Create a correlation constraint through an association class relation.
    fn create_correlation_constraint(
        &mut self,
        constraint: &CorrelationConstraint,
    ) -> Result<(), SchemaError> {
        check_new_constraint(&*self, &constraint.name)?;
        for end in [&constraint.a, &constraint.b] {
            check_reference(&*self, &constraint.correlation_relation, &end.attrs)?;
            check_reference(&*self, &end.relation, &end.ref_attrs)?;
            check_counts(&constraint.name, &end.attrs, &end.ref_attrs)?;
        }
        self.store_constraint(&Constraint::Correlation(constraint.clone()))
    }

    /// Create a partition constraint of a superclass into its subclasses.
    fn create_partition_constraint(
        &mut self,
        constraint: &PartitionConstraint,
    ) -> Result<(), SchemaError> {
        check_new_constraint(&*self, &constraint.name)?;
        if constraint.subclasses.is_empty() {
            return Err(SchemaError::EmptyPartition {
                name: constraint.name.clone(),
            });
        }
        check_reference(&*self, &constraint.superclass, &constraint.super_attrs)?;
        for (subclass, attrs) in &constraint.subclasses {
            check_reference(&*self, subclass, attrs)?;
            check_counts(&constraint.name, attrs, &constraint.super_attrs)?;
        }
        self.store_constraint(&Constraint::Partition(constraint.clone()))
    }

    /// Relation names matching an optional glob pattern, sorted.
    fn relation_names(&self, pattern: Option<&str>) -> Result<Vec<String>, SchemaError> {
        filter_names(self.all_relation_names()?, pattern)
    }

    /// Constraint names matching an optional glob pattern, sorted.
    fn constraint_names(&self, pattern: Option<&str>) -> Result<Vec<String>, SchemaError> {
        filter_names(self.all_constraint_names()?, pattern)
    }
}

fn check_new_constraint<B: SchemaBackend + ?Sized>(
    backend: &B,
    name: &str,
) -> Result<(), SchemaError> {
    if backend.has_constraint(name)? {
        return Err(SchemaError::DuplicateConstraint {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_reference<B: SchemaBackend + ?Sized>(
    backend: &B,
    relation: &str,
    attrs: &[String],
) -> Result<(), SchemaError> {
    let columns = backend
        .relation_columns(relation)?
        .ok_or_else(|| SchemaError::UnknownRelation {
            name: relation.to_string(),
        })?;
    check_attrs(relation, &columns, attrs)
}

fn check_attrs(relation: &str, columns: &[String], attrs: &[String]) -> Result<(), SchemaError> {
    match attrs.iter().find(|a| !columns.contains(a)) {
        Some(missing) => Err(SchemaError::UnknownAttribute {
            relation: relation.to_string(),
            attribute: missing.clone(),
        }),
        None => Ok(()),
    }
}

fn first_repeat(names: &[String]) -> Option<&String> {
    names
        .iter()
        .enumerate()
        .find(|&(i, name)| names[..i].contains(name))
        .map(|(_, name)| name)
}

fn check_counts(name: &str, referring: &[String], referenced: &[String]) -> Result<(), SchemaError> {
    if referring.is_empty() || referring.len() != referenced.len() {
        return Err(SchemaError::AttributeCountMismatch {
            name: name.to_string(),
            referring: referring.len(),
            referenced: referenced.len(),
        });
    }
    Ok(())
}

/// Translate a glob pattern (`*`, `?`) into an anchored regex.
pub fn glob_to_regex(pattern: &str) -> Result<Regex, SchemaError> {
    let mut expr = String::with_capacity(pattern.len() + 2);
    expr.push('^');
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            c => expr.push_str(&regex::escape(&c.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn filter_names(mut names: Vec<String>, pattern: Option<&str>) -> Result<Vec<String>, SchemaError> {
    if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
        let re = glob_to_regex(pattern)?;
        names.retain(|n| re.is_match(n));
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*", "Anything", true)]
    #[case("R*", "R12", true)]
    #[case("R?", "R12", false)]
    #[case("R??", "R12", true)]
    #[case("Class_*", "Class_Attribute", true)]
    #[case("a.b", "axb", false)]
    fn test_glob_matching(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        let re = glob_to_regex(pattern).unwrap();
        assert_eq!(re.is_match(name), expected);
    }

    #[test]
    fn test_filter_names_sorts_and_filters() {
        let names = vec!["R2".to_string(), "R10".to_string(), "C1".to_string()];
        assert_eq!(
            filter_names(names.clone(), Some("R*")).unwrap(),
            vec!["R10", "R2"]
        );
        assert_eq!(filter_names(names.clone(), Some("")).unwrap().len(), 3);
        assert_eq!(filter_names(names, None).unwrap(), vec!["C1", "R10", "R2"]);
    }

    #[test]
    fn test_check_counts_rejects_mismatch() {
        let err = check_counts("R1", &["a".to_string()], &[]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::AttributeCountMismatch {
                referring: 1,
                referenced: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_check_counts_rejects_empty() {
        assert!(check_counts("R1", &[], &[]).is_err());
    }

    #[test]
    fn test_trait_is_object_safe() {
        fn accepts_backend(_db: &dyn SchemaBackend) {}
        let _ = accepts_backend;
    }
}
