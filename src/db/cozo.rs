//! CozoDB back end.
//!
//! Every relation becomes a Cozo stored relation created from the DDL emitted by
//! [`CozoCompiler`]. Cozo has no native referential constraints, so identifier
//! groups and constraints are kept in two catalog relations next to the user
//! relations and consulted for validation and name listing.

use std::collections::BTreeMap;
use std::path::Path;

use cozo::{DataValue, DbInstance, NamedRows, Num, ScriptMutability};

use super::SchemaError;
use super::backend::SchemaBackend;
use super::schema::compilers::CozoCompiler;
use super::schema::compilers::cozo::{CONSTRAINT_CATALOG, IDENTIFIER_CATALOG};
use super::schema::{Constraint, RelationDef};

/// Type alias for query parameters.
pub type Params = BTreeMap<String, DataValue>;

pub struct CozoBackend {
    inner: DbInstance,
    name: &'static str,
}

impl CozoBackend {
    /// Open a CozoDB database backed by SQLite storage.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        let inner = DbInstance::new("sqlite", path, "").map_err(|e| SchemaError::OpenFailed {
            path: path.display().to_string(),
            message: format!("{:?}", e),
        })?;
        Self::with_catalogs(inner, "CozoSqlite")
    }

    /// Create an in-memory database instance.
    pub fn open_mem() -> Result<Self, SchemaError> {
        let inner = DbInstance::new("mem", "", "").map_err(|e| SchemaError::OpenFailed {
            path: ":memory:".to_string(),
            message: format!("{:?}", e),
        })?;
        Self::with_catalogs(inner, "CozoMem")
    }

    fn with_catalogs(inner: DbInstance, name: &'static str) -> Result<Self, SchemaError> {
        let backend = Self { inner, name };
        let existing = backend.stored_relations()?;
        for (catalog, ddl) in CozoCompiler::compile_catalogs() {
            if !existing.iter().any(|r| r == catalog) {
                backend.run(ddl, Params::new())?;
            }
        }
        Ok(backend)
    }

    fn run(&self, script: &str, params: Params) -> Result<NamedRows, SchemaError> {
        self.inner
            .run_script(script, params, ScriptMutability::Mutable)
            .map_err(|e| SchemaError::Backend {
                message: format!("{:?}", e),
            })
    }

    /// Every stored relation, catalogs included.
    fn stored_relations(&self) -> Result<Vec<String>, SchemaError> {
        let rows = self.run("::relations", Params::new())?;
        Ok(first_column(&rows))
    }

    /// Identifier groups recorded for a relation, keyed by group number.
    pub fn identifiers(&self, relation: &str) -> Result<BTreeMap<u32, Vec<String>>, SchemaError> {
        let script = format!(
            "?[number, position, attribute] := *{}{{relation, number, position, attribute}}, relation = $relation\n:order number, position",
            IDENTIFIER_CATALOG
        );
        let mut params = Params::new();
        params.insert("relation".to_string(), DataValue::Str(relation.into()));
        let rows = self.run(&script, params)?;

        let mut groups: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for row in &rows.rows {
            if let (Some(DataValue::Num(Num::Int(number))), Some(DataValue::Str(attr))) =
                (row.first(), row.get(2))
            {
                groups
                    .entry(*number as u32)
                    .or_default()
                    .push(attr.to_string());
            }
        }
        Ok(groups)
    }

    /// The stored definition of a constraint, if any.
    pub fn constraint(&self, name: &str) -> Result<Option<Constraint>, SchemaError> {
        let script = format!(
            "?[definition] := *{}{{name, definition}}, name = $name",
            CONSTRAINT_CATALOG
        );
        let mut params = Params::new();
        params.insert("name".to_string(), DataValue::Str(name.into()));
        let rows = self.run(&script, params)?;
        match first_column(&rows).first() {
            Some(definition) => serde_json::from_str(definition)
                .map(Some)
                .map_err(|e| SchemaError::Backend {
                    message: format!("Corrupt definition for constraint {}: {}", name, e),
                }),
            None => Ok(None),
        }
    }
}

impl SchemaBackend for CozoBackend {
    fn backend_name(&self) -> &'static str {
        self.name
    }

    fn has_relation(&self, name: &str) -> Result<bool, SchemaError> {
        Ok(self.all_relation_names()?.iter().any(|r| r == name))
    }

    fn relation_columns(&self, name: &str) -> Result<Option<Vec<String>>, SchemaError> {
        if !self.has_relation(name)? {
            return Ok(None);
        }
        let rows = self.run(&format!("::columns {}", name), Params::new())?;
        Ok(Some(first_column(&rows)))
    }

    fn has_constraint(&self, name: &str) -> Result<bool, SchemaError> {
        let mut params = Params::new();
        params.insert("name".to_string(), DataValue::Str(name.into()));
        let rows = self.run(&CozoCompiler::compile_constraint_lookup(), params)?;
        Ok(!rows.rows.is_empty())
    }

    fn store_relation(&mut self, relation: &RelationDef) -> Result<(), SchemaError> {
        self.run(&CozoCompiler::compile_relation(relation), Params::new())?;

        let rows: Vec<DataValue> = relation
            .identifiers
            .iter()
            .flat_map(|(number, attrs)| {
                attrs.iter().enumerate().map(move |(position, attr)| {
                    DataValue::List(vec![
                        DataValue::Str(relation.name.as_str().into()),
                        DataValue::Num(Num::Int(i64::from(*number))),
                        DataValue::Num(Num::Int(position as i64)),
                        DataValue::Str(attr.as_str().into()),
                    ])
                })
            })
            .collect();
        if rows.is_empty() {
            return Ok(());
        }

        let mut params = Params::new();
        params.insert("rows".to_string(), DataValue::List(rows));
        self.run(&CozoCompiler::compile_identifier_insert(), params)?;
        Ok(())
    }

    fn store_constraint(&mut self, constraint: &Constraint) -> Result<(), SchemaError> {
        let definition = serde_json::to_string(constraint).map_err(|e| SchemaError::Backend {
            message: format!("Failed to encode constraint {}: {}", constraint.name(), e),
        })?;
        let mut params = Params::new();
        params.insert("name".to_string(), DataValue::Str(constraint.name().into()));
        params.insert(
            "kind".to_string(),
            DataValue::Str(constraint.kind().as_str().into()),
        );
        params.insert("definition".to_string(), DataValue::Str(definition.into()));
        self.run(&CozoCompiler::compile_constraint_insert(), params)?;
        Ok(())
    }

    fn all_relation_names(&self) -> Result<Vec<String>, SchemaError> {
        Ok(self
            .stored_relations()?
            .into_iter()
            .filter(|r| r != IDENTIFIER_CATALOG && r != CONSTRAINT_CATALOG)
            .collect())
    }

    fn all_constraint_names(&self) -> Result<Vec<String>, SchemaError> {
        let rows = self.run(&CozoCompiler::compile_constraint_names(), Params::new())?;
        Ok(first_column(&rows))
    }
}

/// Extract the first column of every row as a string, skipping non-string cells.
fn first_column(rows: &NamedRows) -> Vec<String> {
    rows.rows
        .iter()
        .filter_map(|row| match row.first() {
            Some(DataValue::Str(s)) => Some(s.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{
        AssociationConstraint, AssociationEnd, DataType, Mult, RelationAttribute,
    };
    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;

    fn party() -> RelationDef {
        let mut identifiers = BTreeMap::new();
        identifiers.insert(1, vec!["Name".to_string()]);
        identifiers.insert(2, vec!["Number".to_string(), "Region".to_string()]);
        RelationDef {
            name: "Party".to_string(),
            attributes: vec![
                RelationAttribute::new("Name", DataType::String),
                RelationAttribute::new("Number", DataType::Int),
                RelationAttribute::new("Region", DataType::String),
            ],
            identifiers,
        }
    }

    fn owner() -> RelationDef {
        RelationDef {
            name: "Owner".to_string(),
            attributes: vec![RelationAttribute::new("OwnerName", DataType::String)],
            identifiers: BTreeMap::new(),
        }
    }

    #[fixture]
    fn backend() -> CozoBackend {
        let mut db = CozoBackend::open_mem().expect("Failed to create in-memory DB");
        db.create_relation(&party()).unwrap();
        db.create_relation(&owner()).unwrap();
        db
    }

    #[rstest]
    fn test_catalogs_hidden_from_names(backend: CozoBackend) {
        assert_eq!(
            backend.relation_names(None).unwrap(),
            vec!["Owner", "Party"]
        );
        assert_eq!(backend.backend_name(), "CozoMem");
    }

    #[rstest]
    fn test_relation_columns(backend: CozoBackend) {
        let columns = backend.relation_columns("Party").unwrap().unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns.contains(&"Region".to_string()));
        assert!(backend.relation_columns("Nope").unwrap().is_none());
    }

    #[rstest]
    fn test_identifiers_recorded(backend: CozoBackend) {
        let ids = backend.identifiers("Party").unwrap();
        assert_eq!(ids.get(&1), Some(&vec!["Name".to_string()]));
        assert_eq!(
            ids.get(&2),
            Some(&vec!["Number".to_string(), "Region".to_string()])
        );
        assert!(backend.identifiers("Owner").unwrap().is_empty());
    }

    #[rstest]
    fn test_duplicate_relation_rejected(mut backend: CozoBackend) {
        let err = backend.create_relation(&owner()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateRelation { .. }));
    }

    #[rstest]
    fn test_constraint_round_trip(mut backend: CozoBackend) {
        let c = AssociationConstraint {
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
        };
        backend.create_association_constraint(&c).unwrap();

        assert!(backend.has_constraint("R1").unwrap());
        assert_eq!(backend.constraint_names(Some("R*")).unwrap(), vec!["R1"]);
        assert_eq!(
            backend.constraint("R1").unwrap(),
            Some(Constraint::Association(c.clone()))
        );
        assert!(matches!(
            backend.create_association_constraint(&c).unwrap_err(),
            SchemaError::DuplicateConstraint { .. }
        ));
    }

    #[test]
    fn test_sqlite_reopen_keeps_schema() {
        let file = NamedTempFile::new().unwrap();
        {
            let mut db = CozoBackend::open(file.path()).unwrap();
            db.create_relation(&owner()).unwrap();
        }
        let db = CozoBackend::open(file.path()).unwrap();
        assert_eq!(db.backend_name(), "CozoSqlite");
        assert_eq!(db.relation_names(None).unwrap(), vec!["Owner"]);
    }
}
