//! Two-phase schema compiler.
//!
//! Phase 1 materializes every non-imported class of every subsystem as a
//! relation, building the set of classes known to the schema. Phase 2 turns
//! every relationship into a constraint, consulting that set to decide whether
//! all endpoints exist. A relationship with an unknown endpoint is deferred:
//! logged, reported, and left out of the schema.

mod class;
mod relationship;

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::schema::ConstraintKind;
use crate::db::{SchemaBackend, SchemaError};
use crate::model::{ModelError, ModelParser, Subsystem, TypeDictionary, list_subsystems};
use crate::population::{Population, PopulationCounts};

pub use class::{ClassOutcome, add_class};
pub use relationship::{
    RelOutcome, add_association, add_associative, add_generalization, add_rel,
};

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Class '{class}' attribute '{attribute}' has unknown type '{type_name}'")]
    UnknownType {
        class: String,
        attribute: String,
        type_name: String,
    },

    #[error(transparent)]
    Backend(#[from] SchemaError),
}

/// Back-end name for a model name: spaces become underscores.
pub fn unspace(name: &str) -> String {
    name.replace(' ', "_")
}

pub(crate) fn unspace_all(names: &[String]) -> Vec<String> {
    names.iter().map(String::as_str).map(unspace).collect()
}

/// State accumulated during a compilation.
///
/// Phase 1 mutates it; phase 2 only reads it.
#[derive(Debug, Default)]
pub struct CompileContext {
    known_classes: BTreeSet<String>,
    pub population: Population,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `class` (model name) has been materialized.
    pub fn is_known(&self, class: &str) -> bool {
        self.known_classes.contains(class)
    }

    pub fn mark_known(&mut self, class: impl Into<String>) {
        self.known_classes.insert(class.into());
    }

    /// First class in `classes` that has not been materialized.
    pub fn first_missing<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> Option<String> {
        classes
            .into_iter()
            .find(|c| !self.is_known(c))
            .map(str::to_string)
    }

    pub fn known_classes(&self) -> &BTreeSet<String> {
        &self.known_classes
    }
}

/// A constraint created during phase 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintEntry {
    pub name: String,
    pub kind: ConstraintKind,
}

/// A relationship left out because an endpoint class is not in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredEntry {
    pub rnum: String,
    pub subsystem: String,
    pub missing: String,
}

/// Summary of one compilation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileReport {
    pub backend: String,
    pub subsystems: Vec<String>,
    pub relations: Vec<String>,
    pub constraints: Vec<ConstraintEntry>,
    pub deferred: Vec<DeferredEntry>,
    pub ordinal: Vec<String>,
    pub skipped_imports: Vec<String>,
    pub population: PopulationCounts,
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    pub report: CompileReport,
    pub population: Population,
}

/// Drives both phases against one back end.
pub struct SchemaCompiler<'a> {
    backend: &'a mut dyn SchemaBackend,
    types: &'a TypeDictionary,
    ctx: CompileContext,
    report: CompileReport,
}

impl<'a> SchemaCompiler<'a> {
    pub fn new(backend: &'a mut dyn SchemaBackend, types: &'a TypeDictionary) -> Self {
        let report = CompileReport {
            backend: backend.backend_name().to_string(),
            ..Default::default()
        };
        Self {
            backend,
            types,
            ctx: CompileContext::new(),
            report,
        }
    }

    /// Compile already-parsed subsystems, in the order given.
    pub fn compile(mut self, subsystems: Vec<Subsystem>) -> Result<Compilation, CompileError> {
        for subsystem in &subsystems {
            self.materialize(subsystem)?;
        }
        self.constrain(&subsystems)?;
        self.finish()
    }

    /// Parse and compile every subsystem file of a domain package directory.
    ///
    /// Files are taken in file-name order. Each is parsed during phase 1 and
    /// kept for phase 2.
    pub fn compile_package(
        mut self,
        dir: &Path,
        parser: &dyn ModelParser,
    ) -> Result<Compilation, CompileError> {
        let paths = list_subsystems(dir, parser.extension())?;
        info!(package = %dir.display(), files = paths.len(), "Compiling domain package");

        let mut subsystems = Vec::with_capacity(paths.len());
        for path in &paths {
            debug!(path = %path.display(), "Parsing subsystem");
            let subsystem = parser.parse_subsystem(path)?;
            self.materialize(&subsystem)?;
            subsystems.push(subsystem);
        }
        self.constrain(&subsystems)?;
        self.finish()
    }

    fn materialize(&mut self, subsystem: &Subsystem) -> Result<(), CompileError> {
        info!(
            subsystem = %subsystem.name,
            domain = %subsystem.domain,
            classes = subsystem.classes.len(),
            "Materializing classes"
        );
        for class in &subsystem.classes {
            match add_class(
                &mut *self.backend,
                self.types,
                &mut self.ctx,
                class,
                &subsystem.domain,
            )? {
                ClassOutcome::Materialized(relation) => self.report.relations.push(relation),
                ClassOutcome::Imported => self.report.skipped_imports.push(class.name.clone()),
            }
        }
        self.report.subsystems.push(subsystem.name.clone());
        Ok(())
    }

    fn constrain(&mut self, subsystems: &[Subsystem]) -> Result<(), CompileError> {
        for subsystem in subsystems {
            info!(
                subsystem = %subsystem.name,
                relationships = subsystem.rels.len(),
                "Building constraints"
            );
            for rel in &subsystem.rels {
                match add_rel(&mut *self.backend, &self.ctx, rel)? {
                    RelOutcome::Created(kind) => self.report.constraints.push(ConstraintEntry {
                        name: rel.rnum().to_string(),
                        kind,
                    }),
                    RelOutcome::Deferred { missing } => {
                        warn!(
                            rnum = rel.rnum(),
                            subsystem = %subsystem.name,
                            missing = %missing,
                            "Relationship refers to a class outside the schema, skipped"
                        );
                        self.report.deferred.push(DeferredEntry {
                            rnum: rel.rnum().to_string(),
                            subsystem: subsystem.name.clone(),
                            missing,
                        });
                    }
                    RelOutcome::Ordinal => self.report.ordinal.push(rel.rnum().to_string()),
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Compilation, CompileError> {
        let relations = self.backend.relation_names(None)?;
        let constraints = self.backend.constraint_names(None)?;
        info!(names = ?relations, "Relations");
        info!(names = ?constraints, "Constraints");
        self.report.population = self.ctx.population.counts();
        Ok(Compilation {
            report: self.report,
            population: self.ctx.population,
        })
    }
}
