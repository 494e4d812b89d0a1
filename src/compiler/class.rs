//! Class materializer.

use std::collections::BTreeMap;

use tracing::debug;

use super::{CompileContext, CompileError, unspace};
use crate::db::SchemaBackend;
use crate::db::schema::{RelationAttribute, RelationDef};
use crate::model::{ClassRecord, TypeDictionary, UNRESOLVED_TYPE};
use crate::population::MetaClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassOutcome {
    /// Relation created under this (unspaced) name.
    Materialized(String),
    /// Declared by another domain package; nothing created.
    Imported,
}

/// Create the relation for one class and record it as known.
///
/// Every attribute type is resolved before the relation is requested, so an
/// unknown type leaves the back end untouched.
pub fn add_class(
    backend: &mut dyn SchemaBackend,
    types: &TypeDictionary,
    ctx: &mut CompileContext,
    class: &ClassRecord,
    domain: &str,
) -> Result<ClassOutcome, CompileError> {
    if class.is_imported() {
        debug!(class = %class.name, import = ?class.import, "Skipping imported class");
        return Ok(ClassOutcome::Imported);
    }

    let mut attributes = Vec::with_capacity(class.attributes.len());
    let mut identifiers: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for attr in &class.attributes {
        let type_name = attr.type_name.as_deref().unwrap_or(UNRESOLVED_TYPE);
        let data_type = types
            .resolve(type_name)
            .ok_or_else(|| CompileError::UnknownType {
                class: class.name.clone(),
                attribute: attr.name.clone(),
                type_name: type_name.to_string(),
            })?;
        let name = unspace(&attr.name);
        for id in &attr.identifiers {
            let group = identifiers.entry(id.number).or_default();
            if !group.contains(&name) {
                group.push(name.clone());
            }
        }
        attributes.push(RelationAttribute::new(name, data_type));
    }

    let relation = RelationDef {
        name: unspace(&class.name),
        attributes,
        identifiers,
    };
    debug!(
        relation = %relation.name,
        attributes = relation.attributes.len(),
        identifiers = relation.identifiers.len(),
        "Creating relation"
    );
    backend.create_relation(&relation)?;

    let mut meta = MetaClass::new(&class.name, domain);
    for attr in &class.attributes {
        ctx.population.add_attribute(&mut meta, attr);
    }
    ctx.mark_known(&class.name);

    Ok(ClassOutcome::Materialized(relation.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::DataType;
    use crate::db::{MemoryBackend, SchemaError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn types() -> TypeDictionary {
        [("Name", DataType::String), ("Count", DataType::Int)]
            .into_iter()
            .collect()
    }

    fn class(json: &str) -> ClassRecord {
        serde_json::from_str(json).expect("valid class record")
    }

    #[rstest]
    fn test_relation_with_composite_and_alternate_keys(types: TypeDictionary) {
        let mut backend = MemoryBackend::new();
        let mut ctx = CompileContext::new();
        let record = class(
            r#"{"name": "Modeled Domain", "attributes": [
                {"name": "Name", "type": "Name", "I": [1, 2]},
                {"name": "Domain Alias", "type": "Name", "I": [[1, false]]},
                {"name": "Serial", "type": "Count", "I": [2]},
                {"name": "Notes", "type": "Name"}
            ]}"#,
        );

        let outcome = add_class(&mut backend, &types, &mut ctx, &record, "SM Metamodel").unwrap();
        assert_eq!(outcome, ClassOutcome::Materialized("Modeled_Domain".to_string()));

        let relation = backend.relation("Modeled_Domain").unwrap();
        assert_eq!(
            relation.attribute_names().collect::<Vec<_>>(),
            vec!["Name", "Domain_Alias", "Serial", "Notes"]
        );
        assert_eq!(relation.identifiers[&1], vec!["Name", "Domain_Alias"]);
        assert_eq!(relation.identifiers[&2], vec!["Name", "Serial"]);
        assert_eq!(relation.attributes[2].data_type, DataType::Int);

        assert!(ctx.is_known("Modeled Domain"));
        assert!(!ctx.is_known("Modeled_Domain"));
        assert_eq!(ctx.population.identifiers.len(), 2);
        assert_eq!(ctx.population.identifier_attributes.len(), 4);
        assert_eq!(ctx.population.attributes[0].domain, "SM Metamodel");
    }

    #[rstest]
    fn test_repeated_identifier_membership_counted_once(types: TypeDictionary) {
        let mut backend = MemoryBackend::new();
        let mut ctx = CompileContext::new();
        let record = class(
            r#"{"name": "Dog", "attributes": [
                {"name": "Name", "type": "Name", "I": [1, [1, true]]},
                {"name": "Age", "type": "Count"}
            ]}"#,
        );

        add_class(&mut backend, &types, &mut ctx, &record, "Pets").unwrap();

        let relation = backend.relation("Dog").unwrap();
        assert_eq!(relation.identifiers[&1], vec!["Name"]);
        let key: Vec<_> = relation.key_attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(key, vec!["Name"]);
        assert_eq!(ctx.population.identifiers.len(), 1);
        assert_eq!(ctx.population.identifier_attributes.len(), 1);
    }

    #[rstest]
    fn test_imported_class_skipped(types: TypeDictionary) {
        let mut backend = MemoryBackend::new();
        let mut ctx = CompileContext::new();
        let record = class(r#"{"name": "Domain", "import": "SM Metamodel"}"#);

        let outcome = add_class(&mut backend, &types, &mut ctx, &record, "Pets").unwrap();
        assert_eq!(outcome, ClassOutcome::Imported);
        assert!(backend.history().is_empty());
        assert!(!ctx.is_known("Domain"));
        assert!(ctx.population.attributes.is_empty());
    }

    #[rstest]
    fn test_untyped_attribute_fails(types: TypeDictionary) {
        let mut backend = MemoryBackend::new();
        let mut ctx = CompileContext::new();
        let record = class(r#"{"name": "Dog", "attributes": [{"name": "Name"}]}"#);

        let err = add_class(&mut backend, &types, &mut ctx, &record, "Pets").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnknownType { ref type_name, .. } if type_name == UNRESOLVED_TYPE
        ));
        assert!(!ctx.is_known("Dog"));
    }

    #[rstest]
    fn test_backend_rejection_leaves_class_unknown(types: TypeDictionary) {
        let mut backend = MemoryBackend::new();
        let mut ctx = CompileContext::new();
        let record = class(r#"{"name": "Empty"}"#);

        let err = add_class(&mut backend, &types, &mut ctx, &record, "Pets").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Backend(SchemaError::EmptyRelation { .. })
        ));
        assert!(!ctx.is_known("Empty"));
    }
}
