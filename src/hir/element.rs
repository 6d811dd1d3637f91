//! Element data stored in the graph.

use std::sync::Arc;

use smol_str::SmolStr;

use super::ids::ElementId;
use super::kind::{ElementKind, RelationshipKind};
use crate::base::{FileId, TextRange};
use crate::syntax::{Direction, Expr, ImportWildcard, Multiplicity, QualifiedRef, Visibility};

/// Feature-specific attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureData {
    pub direction: Option<Direction>,
    pub multiplicity: Option<Multiplicity>,
    pub is_ordered: bool,
    pub is_nonunique: bool,
}

/// One end of a relationship.
///
/// Relationships declared as clauses of a declaration have their source end
/// fixed to the declaring element. Stand-alone relationship declarations name
/// both ends, so their source is a reference resolved like the target.
#[derive(Debug, Clone, PartialEq)]
pub enum RelEnd {
    Element(ElementId),
    Reference(QualifiedRef),
}

impl RelEnd {
    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            RelEnd::Element(id) => Some(*id),
            RelEnd::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&QualifiedRef> {
        match self {
            RelEnd::Element(_) => None,
            RelEnd::Reference(r) => Some(r),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipData {
    pub kind: RelationshipKind,
    pub source: RelEnd,
    pub target: RelEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportData {
    pub is_all: bool,
    pub target: QualifiedRef,
    pub wildcard: ImportWildcard,
    pub filters: Vec<Arc<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasData {
    pub target: QualifiedRef,
}

/// Kind-specific payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ElementData {
    #[default]
    Plain,
    Relationship(RelationshipData),
    Import(ImportData),
    Alias(AliasData),
}

/// A node of the model graph.
///
/// Elements are created by lowering a document and never mutated afterwards;
/// everything derived from cross references (generals, scopes, values) lives
/// in the [`SemanticModel`](super::SemanticModel) caches.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) kind: ElementKind,
    pub(crate) name: Option<SmolStr>,
    pub(crate) short_name: Option<SmolStr>,
    pub(crate) owner: Option<ElementId>,
    pub(crate) visibility: Visibility,
    pub(crate) document: FileId,
    pub(crate) range: TextRange,
    pub(crate) name_range: Option<TextRange>,
    pub(crate) doc: Option<Arc<str>>,
    pub(crate) members: Vec<ElementId>,
    pub(crate) is_abstract: bool,
    pub(crate) value: Option<Arc<Expr>>,
    pub(crate) result: Option<Arc<Expr>>,
    pub(crate) feature: Option<FeatureData>,
    pub(crate) data: ElementData,
}

impl Element {
    pub(crate) fn new(id: ElementId, kind: ElementKind, document: FileId, range: TextRange) -> Self {
        Self {
            id,
            kind,
            name: None,
            short_name: None,
            owner: None,
            visibility: Visibility::Public,
            document,
            range,
            name_range: None,
            doc: None,
            members: Vec::new(),
            is_abstract: false,
            value: None,
            result: None,
            feature: None,
            data: ElementData::Plain,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Declared name. Unnamed redefining features get their name from
    /// [`SemanticModel::effective_name`](super::SemanticModel::effective_name).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn document(&self) -> FileId {
        self.document
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn name_range(&self) -> Option<TextRange> {
        self.name_range
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Owned members in declaration order.
    pub fn members(&self) -> &[ElementId] {
        &self.members
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Bound value (`= expr`).
    pub fn value(&self) -> Option<&Arc<Expr>> {
        self.value.as_ref()
    }

    /// Result expression of a function, calculation or constraint body.
    pub fn result(&self) -> Option<&Arc<Expr>> {
        self.result.as_ref()
    }

    pub fn feature(&self) -> Option<&FeatureData> {
        self.feature.as_ref()
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    pub fn relationship(&self) -> Option<&RelationshipData> {
        match &self.data {
            ElementData::Relationship(r) => Some(r),
            _ => None,
        }
    }

    pub fn import(&self) -> Option<&ImportData> {
        match &self.data {
            ElementData::Import(i) => Some(i),
            _ => None,
        }
    }

    pub fn alias(&self) -> Option<&AliasData> {
        match &self.data {
            ElementData::Alias(a) => Some(a),
            _ => None,
        }
    }

    /// Relationship kind when this element is a relationship.
    pub fn relationship_kind(&self) -> Option<RelationshipKind> {
        self.relationship().map(|r| r.kind)
    }
}
