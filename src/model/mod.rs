//! Parsed class model records.
//!
//! These types are the boundary with the external model parser: one
//! [`Subsystem`] per parsed model file, holding class records and relationship
//! records. Relationship records arrive with optional fields whose presence
//! tells the shape apart; they are classified into the [`Relationship`] sum
//! type as soon as they are read, so nothing downstream re-inspects field
//! presence.

pub mod parser;
pub mod types;

use serde::Deserialize;
use thiserror::Error;

use crate::db::schema::Mult;

pub use parser::{JsonModelParser, ModelError, ModelParser, list_subsystems};
pub use types::{TypeDictionary, UNRESOLVED_TYPE};

/// A named grouping of classes and relationships parsed from one model file.
#[derive(Debug, Clone)]
pub struct Subsystem {
    pub name: String,
    pub domain: String,
    pub classes: Vec<ClassRecord>,
    pub rels: Vec<Relationship>,
}

/// Raw subsystem document as produced by the parser.
#[derive(Debug, Deserialize)]
pub struct SubsystemRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    #[serde(default)]
    pub rels: Vec<RelationshipRecord>,
}

impl SubsystemRecord {
    /// Classify every relationship record. `fallback_name` names the subsystem
    /// when the document does not.
    pub fn into_subsystem(self, fallback_name: &str) -> Result<Subsystem, ModelError> {
        let name = self.name.unwrap_or_else(|| fallback_name.to_string());
        let rels = self
            .rels
            .into_iter()
            .map(Relationship::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ModelError::Malformed {
                subsystem: name.clone(),
                source,
            })?;
        Ok(Subsystem {
            name,
            domain: self.domain,
            classes: self.classes,
            rels,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    /// Name of the domain this class is imported from, if any.
    #[serde(default)]
    pub import: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

impl ClassRecord {
    pub fn is_imported(&self) -> bool {
        self.import.as_deref().is_some_and(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    /// Identifier groups this attribute participates in.
    #[serde(rename = "I", default)]
    pub identifiers: Vec<IdentifierRef>,
}

/// Membership of an attribute in one identifier group (`I`, `I2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "IdentifierRepr")]
pub struct IdentifierRef {
    pub number: u32,
    pub superkey: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierRepr {
    Number(u32),
    Tuple(u32, bool),
}

impl From<IdentifierRepr> for IdentifierRef {
    fn from(repr: IdentifierRepr) -> Self {
        match repr {
            IdentifierRepr::Number(number) => Self {
                number,
                superkey: false,
            },
            IdentifierRepr::Tuple(number, superkey) => Self { number, superkey },
        }
    }
}

/// Model multiplicity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MultTag {
    #[serde(rename = "M")]
    Many,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "Mc")]
    ManyConditional,
    #[serde(rename = "1c")]
    OneConditional,
}

impl From<MultTag> for Mult {
    fn from(tag: MultTag) -> Self {
        match tag {
            MultTag::Many => Mult::AtLeastOne,
            MultTag::One => Mult::ExactlyOne,
            MultTag::ManyConditional => Mult::ZeroOneOrMany,
            MultTag::OneConditional => Mult::ZeroOrOne,
        }
    }
}

/// One participant side of a binary relationship.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Side {
    pub cname: String,
    pub mult: MultTag,
    #[serde(default)]
    pub phrase: Option<String>,
}

/// The t-side and p-side of a binary relationship.
///
/// Multiplicity is recorded per named participant, not per referring or
/// referenced role; [`Sides::project`] re-projects it onto a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sides {
    pub t_side: Side,
    pub p_side: Side,
}

impl Sides {
    /// Returns `(role_mult, other_mult)` where `role_mult` belongs to the side
    /// whose class is `role_class` and `other_mult` to the remaining side.
    ///
    /// When neither side names `role_class` the p-side is taken as the role.
    pub fn project(&self, role_class: &str) -> (Mult, Mult) {
        if self.t_side.cname == role_class {
            (self.t_side.mult.into(), self.p_side.mult.into())
        } else {
            (self.p_side.mult.into(), self.t_side.mult.into())
        }
    }
}

/// One end of a reference path: a class and an ordered attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefEnd {
    pub class: String,
    pub attrs: Vec<String>,
}

/// A reference from referring attributes to referenced attributes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefPath {
    pub source: RefEnd,
    pub target: RefEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub rnum: String,
    pub sides: Sides,
    pub ref1: RefPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Associative {
    pub rnum: String,
    pub assoc_class: String,
    pub sides: Sides,
    pub ref1: RefPath,
    pub ref2: RefPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generalization {
    pub rnum: String,
    pub superclass: String,
    pub subclasses: Vec<String>,
    pub genrefs: Vec<RefPath>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordinal {
    pub rnum: String,
    /// Class whose instances are ordered, when the record names it.
    pub ordered_class: Option<String>,
}

/// A classified relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relationship {
    Association(Association),
    Associative(Associative),
    Generalization(Generalization),
    Ordinal(Ordinal),
}

impl Relationship {
    pub fn rnum(&self) -> &str {
        match self {
            Relationship::Association(r) => &r.rnum,
            Relationship::Associative(r) => &r.rnum,
            Relationship::Generalization(r) => &r.rnum,
            Relationship::Ordinal(r) => &r.rnum,
        }
    }
}

/// Raw relationship record as produced by the parser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipRecord {
    pub rnum: String,
    #[serde(default)]
    pub t_side: Option<Side>,
    #[serde(default)]
    pub p_side: Option<Side>,
    #[serde(default)]
    pub ref1: Option<RefPath>,
    #[serde(default)]
    pub ref2: Option<RefPath>,
    #[serde(default)]
    pub assoc_cname: Option<String>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub subclasses: Vec<String>,
    #[serde(default)]
    pub genrefs: Vec<RefPath>,
    #[serde(default)]
    pub ascend: Option<serde_json::Value>,
}

/// A relationship record matching none of the recognized shapes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed relationship {rnum}: {reason}")]
pub struct MalformedRelationship {
    pub rnum: String,
    pub reason: String,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = MalformedRelationship;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        let malformed = |reason: &str| MalformedRelationship {
            rnum: record.rnum.clone(),
            reason: reason.to_string(),
        };

        let markers = [
            record.superclass.is_some(),
            record.ref2.is_some(),
            record.ascend.is_some(),
        ];
        if markers.iter().filter(|m| **m).count() > 1 {
            return Err(malformed(
                "more than one of superclass, ref2 and ascend is present",
            ));
        }

        if let Some(superclass) = &record.superclass {
            if record.ref1.is_some() {
                return Err(malformed("generalization carries a ref1 path"));
            }
            if record.subclasses.is_empty() {
                return Err(malformed("generalization names no subclasses"));
            }
            if record.genrefs.is_empty() {
                return Err(malformed("generalization has no genrefs"));
            }
            if record.genrefs.len() > 1 {
                if let Some(reason) = genref_mismatch(&record.subclasses, &record.genrefs) {
                    return Err(malformed(&reason));
                }
            }
            return Ok(Relationship::Generalization(Generalization {
                rnum: record.rnum.clone(),
                superclass: superclass.clone(),
                subclasses: record.subclasses.clone(),
                genrefs: record.genrefs.clone(),
            }));
        }

        if let Some(ascend) = &record.ascend {
            return Ok(Relationship::Ordinal(Ordinal {
                rnum: record.rnum.clone(),
                ordered_class: ascend
                    .get("cname")
                    .and_then(|c| c.as_str())
                    .map(str::to_string),
            }));
        }

        let sides = match (&record.t_side, &record.p_side) {
            (Some(t), Some(p)) => Sides {
                t_side: t.clone(),
                p_side: p.clone(),
            },
            _ => return Err(malformed("missing t_side or p_side")),
        };
        let ref1 = record
            .ref1
            .clone()
            .ok_or_else(|| malformed("no reference path"))?;

        match &record.ref2 {
            Some(ref2) => {
                let assoc_class = record
                    .assoc_cname
                    .clone()
                    .ok_or_else(|| malformed("associative relationship without assoc_cname"))?;
                Ok(Relationship::Associative(Associative {
                    rnum: record.rnum.clone(),
                    assoc_class,
                    sides,
                    ref1,
                    ref2: ref2.clone(),
                }))
            }
            None => Ok(Relationship::Association(Association {
                rnum: record.rnum.clone(),
                sides,
                ref1,
            })),
        }
    }
}

/// With one genref per subclass, every subclass must be the source of
/// exactly one genref and every genref must start at a named subclass.
fn genref_mismatch(subclasses: &[String], genrefs: &[RefPath]) -> Option<String> {
    for (i, genref) in genrefs.iter().enumerate() {
        let source = &genref.source.class;
        if !subclasses.contains(source) {
            return Some(format!("genref source '{}' is not a subclass", source));
        }
        if genrefs[..i].iter().any(|g| &g.source.class == source) {
            return Some(format!("subclass '{}' has more than one genref", source));
        }
    }
    subclasses
        .iter()
        .find(|sub| !genrefs.iter().any(|g| &g.source.class == *sub))
        .map(|sub| format!("subclass '{}' has no genref", sub))
}
