//! Lowering: link a parsed document into the element graph.
//!
//! Every document becomes one subgraph under an unnamed root namespace.
//! Relationship clauses of a declaration become relationship elements owned
//! by the declaring element, with the declaring element as their source and
//! an unresolved reference as their target. References are resolved lazily
//! by the [`SemanticModel`](super::SemanticModel).

use std::sync::Arc;

use tracing::trace;

use super::element::{
    AliasData, Element, ElementData, FeatureData, ImportData, RelEnd, RelationshipData,
};
use super::graph::ElementGraph;
use super::ids::ElementId;
use super::kind::{ElementKind, RelationshipKind};
use crate::base::{FileId, TextRange, TextSize};
use crate::syntax::{
    AliasDecl, Decl, DocDecl, ImportDecl, Member, MetadataDecl, QualifiedRef, RelClauseKind,
    RelationshipDecl, SyntaxFile, Visibility,
};

/// Replace the subgraph of `file` with the lowering of `syntax`, returning
/// the new root namespace.
pub(crate) fn lower_document(graph: &mut ElementGraph, file: FileId, syntax: &SyntaxFile) -> ElementId {
    graph
        .replace_document(file, |graph| {
            let mut lowerer = Lowerer {
                graph,
                file,
                allocated: Vec::new(),
            };
            let root = lowerer.lower_root(syntax.members());
            (root, lowerer.allocated)
        })
        .root()
}

struct Lowerer<'g> {
    graph: &'g mut ElementGraph,
    file: FileId,
    allocated: Vec<ElementId>,
}

impl Lowerer<'_> {
    fn alloc(
        &mut self,
        kind: ElementKind,
        owner: Option<ElementId>,
        range: TextRange,
        init: impl FnOnce(&mut Element),
    ) -> ElementId {
        let file = self.file;
        let id = self.graph.alloc(|id| {
            let mut element = Element::new(id, kind, file, range);
            element.owner = owner;
            init(&mut element);
            element
        });
        self.allocated.push(id);
        id
    }

    fn set_members(&mut self, id: ElementId, members: Vec<ElementId>) {
        if let Some(element) = self.graph.get_mut(id) {
            element.members = members;
        }
    }

    fn lower_root(&mut self, members: &[Member]) -> ElementId {
        let end = members
            .last()
            .map(|m| m.range().end())
            .unwrap_or_else(|| TextSize::from(0));
        let root = self.alloc(
            ElementKind::Namespace,
            None,
            TextRange::up_to(end),
            |_| {},
        );
        let children = self.lower_members(root, members);
        self.set_members(root, children);
        root
    }

    fn lower_members(&mut self, owner: ElementId, members: &[Member]) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            let id = match member {
                Member::Decl(decl) => self.lower_decl(owner, decl),
                Member::Import(import) => self.lower_import(owner, import),
                Member::Alias(alias) => self.lower_alias(owner, alias),
                Member::Relationship(rel) => self.lower_relationship(owner, rel),
                Member::Doc(doc) => self.lower_doc(owner, doc),
                Member::Metadata(metadata) => self.lower_metadata(owner, metadata),
            };
            out.push(id);
        }
        out
    }

    fn lower_decl(&mut self, owner: ElementId, decl: &Decl) -> ElementId {
        let kind = ElementKind::from(decl.kind);
        let id = self.alloc(kind, Some(owner), decl.range, |e| {
            e.name = decl.name.as_ref().map(|n| n.text.clone());
            e.name_range = decl.name.as_ref().map(|n| n.range);
            e.short_name = decl.short_name.as_ref().map(|n| n.text.clone());
            e.visibility = decl.visibility.unwrap_or(Visibility::Public);
            e.is_abstract = decl.is_abstract;
            e.value = decl.value.clone().map(Arc::new);
            e.result = decl.result.clone().map(Arc::new);
            if kind.is_feature() {
                e.feature = Some(FeatureData {
                    direction: decl.direction,
                    multiplicity: decl.multiplicity,
                    is_ordered: decl.is_ordered,
                    is_nonunique: decl.is_nonunique,
                });
            }
        });
        trace!(?kind, name = ?decl.name.as_ref().map(|n| n.as_str()), "lowered declaration");

        let mut members = Vec::new();
        for clause in &decl.relationships {
            let rel_kind = clause_relationship(clause.kind, kind.is_feature());
            for target in &clause.targets {
                members.push(self.lower_clause_target(id, rel_kind, target));
            }
        }
        for metadata in &decl.metadata {
            members.push(self.lower_metadata_prefix(id, metadata));
        }
        members.extend(self.lower_members(id, &decl.body));

        let doc = decl.body.iter().find_map(|m| match m {
            Member::Doc(doc) if !doc.is_comment => Some(doc.text.clone()),
            _ => None,
        });
        if let Some(element) = self.graph.get_mut(id) {
            element.members = members;
            element.doc = doc;
        }
        id
    }

    fn lower_clause_target(
        &mut self,
        owner: ElementId,
        kind: RelationshipKind,
        target: &QualifiedRef,
    ) -> ElementId {
        self.alloc(ElementKind::Relationship(kind), Some(owner), target.range, |e| {
            e.data = ElementData::Relationship(RelationshipData {
                kind,
                source: RelEnd::Element(owner),
                target: RelEnd::Reference(target.clone()),
            });
        })
    }

    /// `#M` before a declaration: an anonymous metadata feature typed by `M`.
    fn lower_metadata_prefix(&mut self, owner: ElementId, ty: &QualifiedRef) -> ElementId {
        let id = self.alloc(ElementKind::MetadataFeature, Some(owner), ty.range, |e| {
            e.feature = Some(FeatureData::default());
        });
        let typing = self.lower_clause_target(id, RelationshipKind::FeatureTyping, ty);
        self.set_members(id, vec![typing]);
        id
    }

    /// `@M { ... }` inside a body.
    fn lower_metadata(&mut self, owner: ElementId, metadata: &MetadataDecl) -> ElementId {
        let id = self.alloc(ElementKind::MetadataFeature, Some(owner), metadata.range, |e| {
            e.feature = Some(FeatureData::default());
        });
        let mut members = vec![self.lower_clause_target(id, RelationshipKind::FeatureTyping, &metadata.ty)];
        members.extend(self.lower_members(id, &metadata.body));
        self.set_members(id, members);
        id
    }

    fn lower_import(&mut self, owner: ElementId, import: &ImportDecl) -> ElementId {
        self.alloc(ElementKind::Import, Some(owner), import.range, |e| {
            e.visibility = import.visibility.unwrap_or(Visibility::Private);
            e.data = ElementData::Import(ImportData {
                is_all: import.is_all,
                target: import.target.clone(),
                wildcard: import.wildcard,
                filters: import.filters.iter().cloned().map(Arc::new).collect(),
            });
        })
    }

    fn lower_alias(&mut self, owner: ElementId, alias: &AliasDecl) -> ElementId {
        self.alloc(ElementKind::Alias, Some(owner), alias.range, |e| {
            e.name = Some(alias.name.text.clone());
            e.name_range = Some(alias.name.range);
            e.short_name = alias.short_name.as_ref().map(|n| n.text.clone());
            e.visibility = alias.visibility.unwrap_or(Visibility::Public);
            e.data = ElementData::Alias(AliasData {
                target: alias.target.clone(),
            });
        })
    }

    fn lower_relationship(&mut self, owner: ElementId, rel: &RelationshipDecl) -> ElementId {
        let kind = RelationshipKind::from(rel.kind);
        self.alloc(ElementKind::Relationship(kind), Some(owner), rel.range, |e| {
            e.name = rel.name.as_ref().map(|n| n.text.clone());
            e.name_range = rel.name.as_ref().map(|n| n.range);
            e.visibility = rel.visibility.unwrap_or(Visibility::Public);
            e.data = ElementData::Relationship(RelationshipData {
                kind,
                source: RelEnd::Reference(rel.source.clone()),
                target: RelEnd::Reference(rel.target.clone()),
            });
        })
    }

    fn lower_doc(&mut self, owner: ElementId, doc: &DocDecl) -> ElementId {
        let kind = if doc.is_comment {
            ElementKind::Comment
        } else {
            ElementKind::Documentation
        };
        self.alloc(kind, Some(owner), doc.range, |e| {
            e.doc = Some(doc.text.clone());
        })
    }
}

/// The relationship a declaration clause produces. `:>` subsets when the
/// declaring element is a feature and specializes otherwise; `:` types a
/// feature and specializes anything else.
fn clause_relationship(clause: RelClauseKind, is_feature: bool) -> RelationshipKind {
    match clause {
        RelClauseKind::Specializes if is_feature => RelationshipKind::Subsetting,
        RelClauseKind::Specializes => RelationshipKind::Specialization,
        RelClauseKind::Subsets => RelationshipKind::Subsetting,
        RelClauseKind::Redefines => RelationshipKind::Redefinition,
        RelClauseKind::TypedBy if is_feature => RelationshipKind::FeatureTyping,
        RelClauseKind::TypedBy => RelationshipKind::Specialization,
        RelClauseKind::Conjugates => RelationshipKind::Conjugation,
        RelClauseKind::DisjointFrom => RelationshipKind::Disjoining,
        RelClauseKind::Unions => RelationshipKind::Unioning,
        RelClauseKind::Intersects => RelationshipKind::Intersecting,
        RelClauseKind::Differences => RelationshipKind::Differencing,
        RelClauseKind::InverseOf => RelationshipKind::Inverting,
        RelClauseKind::Chains => RelationshipKind::FeatureChaining,
    }
}
