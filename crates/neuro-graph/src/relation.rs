//! Relation types for the page graph.
//!
//! Every neighbour slot on a page carries one [`Relation`]: the role the
//! neighbour plays for the page, and where that knowledge came from.

use serde::{Deserialize, Serialize};

/// The role a neighbour plays, seen from the page that owns the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// The neighbour is above this page.
    Parent,

    /// The neighbour is below this page.
    Child,

    /// Sideways link, symmetric.
    Friend,
}

impl RelationKind {
    /// The role this page plays for the neighbour.
    pub fn inverse(self) -> Self {
        match self {
            Self::Parent => Self::Child,
            Self::Child => Self::Parent,
            Self::Friend => Self::Friend,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Parent => "parent",
            Self::Child => "child",
            Self::Friend => "friend",
        };
        write!(f, "{}", s)
    }
}

/// Where a relation came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationType {
    /// Derived from plain links and backlinks.
    Inferred,

    /// Declared by a structured field.
    Defined { field: String },
}

impl RelationType {
    /// A relation declared under `field`.
    pub fn defined(field: impl Into<String>) -> Self {
        Self::Defined {
            field: field.into(),
        }
    }

    /// The declaring field, for defined relations.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Inferred => None,
            Self::Defined { field } => Some(field),
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inferred => write!(f, "inferred"),
            Self::Defined { field } => write!(f, "defined({})", field),
        }
    }
}

/// The annotation on one neighbour slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub relation_type: RelationType,
}

impl Relation {
    /// Pairs a role with its provenance.
    pub fn new(kind: RelationKind, relation_type: RelationType) -> Self {
        Self {
            kind,
            relation_type,
        }
    }

    /// A relation derived from link structure.
    pub fn inferred(kind: RelationKind) -> Self {
        Self::new(kind, RelationType::Inferred)
    }

    /// A relation declared by `field`.
    pub fn defined(kind: RelationKind, field: impl Into<String>) -> Self {
        Self::new(kind, RelationType::defined(field))
    }

    /// The declaring field, if any.
    pub fn field(&self) -> Option<&str> {
        self.relation_type.field()
    }

    /// Whether a structured field declared this relation.
    pub fn is_defined(&self) -> bool {
        matches!(self.relation_type, RelationType::Defined { .. })
    }

    /// The matching relation on the other endpoint.
    pub fn reciprocal(&self) -> Self {
        Self::new(self.kind.inverse(), self.relation_type.clone())
    }
}
