//! Cozo Datalog DDL compiler.
//!
//! Generates Cozo Datalog DDL (`:create relation { ... }`) from relation
//! definitions, plus the catalog relations and `:put` scripts the Cozo back end
//! uses to remember identifiers and constraints. The output format is deterministic.

use crate::db::schema::definition::RelationDef;

/// Catalog relation holding every identifier group of every compiled relation.
pub const IDENTIFIER_CATALOG: &str = "xuml_identifiers";

/// Catalog relation holding every referential constraint (kind + JSON definition).
pub const CONSTRAINT_CATALOG: &str = "xuml_constraints";

pub const SCHEMA_IDENTIFIERS: &str = r#"
:create xuml_identifiers {
    relation: String,
    number: Int,
    position: Int
    =>
    attribute: String
}
"#;

pub const SCHEMA_CONSTRAINTS: &str = r#"
:create xuml_constraints {
    name: String
    =>
    kind: String,
    definition: String
}
"#;

/// Compiler for generating Cozo Datalog DDL from schema definitions.
pub struct CozoCompiler;

impl CozoCompiler {
    /// Generate Cozo DDL for a single relation.
    ///
    /// Produces output in the format:
    /// ```cozo
    /// :create Relation_Name {
    ///     key_attr1: Type1,
    ///     key_attr2: Type2
    ///     =>
    ///     value_attr1: Type1
    /// }
    /// ```
    /// The `=>` separator is omitted when every attribute is part of the key.
    pub fn compile_relation(relation: &RelationDef) -> String {
        let key_fields = relation
            .key_attributes()
            .iter()
            .map(|a| format!("    {}: {}", a.name, a.data_type.cozo_type()))
            .collect::<Vec<_>>()
            .join(",\n");

        let value_fields = relation
            .value_attributes()
            .iter()
            .map(|a| format!("    {}: {}", a.name, a.data_type.cozo_type()))
            .collect::<Vec<_>>()
            .join(",\n");

        if value_fields.is_empty() {
            format!(":create {} {{\n{}\n}}", relation.name, key_fields)
        } else {
            format!(
                ":create {} {{\n{}\n    =>\n{}\n}}",
                relation.name, key_fields, value_fields
            )
        }
    }

    /// DDL for the catalog relations, in creation order.
    pub fn compile_catalogs() -> [(&'static str, &'static str); 2] {
        [
            (IDENTIFIER_CATALOG, SCHEMA_IDENTIFIERS),
            (CONSTRAINT_CATALOG, SCHEMA_CONSTRAINTS),
        ]
    }

    /// Script inserting identifier rows bound to the `$rows` parameter.
    ///
    /// Each row is `[relation, number, position, attribute]`.
    pub fn compile_identifier_insert() -> String {
        format!(
            "?[relation, number, position, attribute] <- $rows\n:put {} {{ relation, number, position => attribute }}",
            IDENTIFIER_CATALOG
        )
    }

    /// Script inserting a single constraint bound to `$name`, `$kind`, `$definition`.
    pub fn compile_constraint_insert() -> String {
        format!(
            "?[name, kind, definition] <- [[$name, $kind, $definition]]\n:put {} {{ name => kind, definition }}",
            CONSTRAINT_CATALOG
        )
    }

    /// Script listing all constraint names.
    pub fn compile_constraint_names() -> String {
        format!("?[name] := *{}{{name}}", CONSTRAINT_CATALOG)
    }

    /// Script checking whether a constraint named `$name` exists.
    pub fn compile_constraint_lookup() -> String {
        format!("?[name] := *{}{{name}}, name = $name", CONSTRAINT_CATALOG)
    }
}
