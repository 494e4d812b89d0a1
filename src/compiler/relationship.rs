//! Constraint builders, one per relationship shape.

use std::collections::BTreeMap;

use tracing::debug;

use super::{CompileContext, CompileError, unspace, unspace_all};
use crate::db::SchemaBackend;
use crate::db::schema::{
    AssociationConstraint, AssociationEnd, ConstraintKind, CorrelationConstraint,
    CorrelationEnd, PartitionConstraint,
};
use crate::model::{Association, Associative, Generalization, Relationship};

/// What a relationship turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelOutcome {
    Created(ConstraintKind),
    /// An endpoint class is not in the schema; no constraint was requested.
    Deferred { missing: String },
    /// Ordering relationship; carries no relational constraint.
    Ordinal,
}

pub fn add_rel(
    backend: &mut dyn SchemaBackend,
    ctx: &CompileContext,
    rel: &Relationship,
) -> Result<RelOutcome, CompileError> {
    match rel {
        Relationship::Association(a) => add_association(backend, ctx, a),
        Relationship::Associative(a) => add_associative(backend, ctx, a),
        Relationship::Generalization(g) => add_generalization(backend, ctx, g),
        Relationship::Ordinal(o) => {
            debug!(rnum = %o.rnum, ordered = ?o.ordered_class, "Ordinal relationship, no constraint");
            Ok(RelOutcome::Ordinal)
        }
    }
}

/// Referring class and attributes come from `ref1.source`, referenced ones
/// from `ref1.target`. Multiplicities are projected onto the referring class.
pub fn add_association(
    backend: &mut dyn SchemaBackend,
    ctx: &CompileContext,
    rel: &Association,
) -> Result<RelOutcome, CompileError> {
    let source = &rel.ref1.source;
    let target = &rel.ref1.target;
    if let Some(missing) = ctx.first_missing([source.class.as_str(), target.class.as_str()]) {
        return Ok(RelOutcome::Deferred { missing });
    }

    let (from_mult, to_mult) = rel.sides.project(&source.class);
    let constraint = AssociationConstraint {
        name: rel.rnum.clone(),
        from: AssociationEnd {
            relation: unspace(&source.class),
            attrs: unspace_all(&source.attrs),
            mult: from_mult,
        },
        to: AssociationEnd {
            relation: unspace(&target.class),
            attrs: unspace_all(&target.attrs),
            mult: to_mult,
        },
    };
    debug!(
        rnum = %constraint.name,
        from = %constraint.from.relation,
        to = %constraint.to.relation,
        "Creating association"
    );
    backend.create_association_constraint(&constraint)?;
    Ok(RelOutcome::Created(ConstraintKind::Association))
}

/// The association class holds both reference paths. Multiplicities are
/// projected onto the class `ref1` targets: that side's goes to end `a`.
pub fn add_associative(
    backend: &mut dyn SchemaBackend,
    ctx: &CompileContext,
    rel: &Associative,
) -> Result<RelOutcome, CompileError> {
    let required = [
        rel.assoc_class.as_str(),
        rel.ref1.target.class.as_str(),
        rel.ref2.target.class.as_str(),
    ];
    if let Some(missing) = ctx.first_missing(required) {
        return Ok(RelOutcome::Deferred { missing });
    }

    let (a_mult, b_mult) = rel.sides.project(&rel.ref1.target.class);
    let constraint = CorrelationConstraint {
        name: rel.rnum.clone(),
        correlation_relation: unspace(&rel.assoc_class),
        a: CorrelationEnd {
            attrs: unspace_all(&rel.ref1.source.attrs),
            mult: a_mult,
            relation: unspace(&rel.ref1.target.class),
            ref_attrs: unspace_all(&rel.ref1.target.attrs),
        },
        b: CorrelationEnd {
            attrs: unspace_all(&rel.ref2.source.attrs),
            mult: b_mult,
            relation: unspace(&rel.ref2.target.class),
            ref_attrs: unspace_all(&rel.ref2.target.attrs),
        },
    };
    debug!(
        rnum = %constraint.name,
        correlation = %constraint.correlation_relation,
        "Creating correlation"
    );
    backend.create_correlation_constraint(&constraint)?;
    Ok(RelOutcome::Created(ConstraintKind::Correlation))
}

/// Superclass attributes come from the first genref's target. A single
/// genref applies to every subclass; otherwise each genref maps its own
/// source class to its own source attributes.
pub fn add_generalization(
    backend: &mut dyn SchemaBackend,
    ctx: &CompileContext,
    rel: &Generalization,
) -> Result<RelOutcome, CompileError> {
    let required = std::iter::once(rel.superclass.as_str())
        .chain(rel.subclasses.iter().map(String::as_str));
    if let Some(missing) = ctx.first_missing(required) {
        return Ok(RelOutcome::Deferred { missing });
    }

    let (super_attrs, subclasses) = match rel.genrefs.as_slice() {
        [] => (Vec::new(), BTreeMap::new()),
        [shared] => {
            let attrs = unspace_all(&shared.source.attrs);
            let subclasses = rel
                .subclasses
                .iter()
                .map(|s| (unspace(s), attrs.clone()))
                .collect();
            (unspace_all(&shared.target.attrs), subclasses)
        }
        [first, ..] => {
            let subclasses = rel
                .genrefs
                .iter()
                .map(|g| (unspace(&g.source.class), unspace_all(&g.source.attrs)))
                .collect();
            (unspace_all(&first.target.attrs), subclasses)
        }
    };

    let constraint = PartitionConstraint {
        name: rel.rnum.clone(),
        superclass: unspace(&rel.superclass),
        super_attrs,
        subclasses,
    };
    debug!(
        rnum = %constraint.name,
        superclass = %constraint.superclass,
        subclasses = constraint.subclasses.len(),
        "Creating partition"
    );
    backend.create_partition_constraint(&constraint)?;
    Ok(RelOutcome::Created(ConstraintKind::Partition))
}
