//! Scope engine: the names visible from an element.
//!
//! A scope is built in three steps, each appending to an insertion-ordered
//! map where the first entry under a name wins:
//!
//! 1. owned members, under their effective name and short name
//! 2. members inherited from every general type, nearest first, minus the
//!    features hidden by a redefinition
//! 3. members brought in by the element's imports
//!
//! Recursion through imports and specializations is guarded by the
//! [`ResolveCx`] in-progress markers. A scope re-entered while it is being
//! built answers with the members gathered so far, which lets an import
//! filter see the names brought in by earlier imports.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::element::ImportData;
use super::ids::ElementId;
use super::kind::{Capability, ElementKind, RelationshipKind};
use super::model::{InProgress, ResolveCx, SemanticModel};
use crate::syntax::{Ident, ImportWildcard, QualifiedRef, Visibility};

/// From where a scope is viewed, which decides the visibility levels that
/// pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityContext {
    /// From inside the namespace itself: everything it owns or imports.
    Own,
    /// From a specialization: public and protected members.
    Inherited,
    /// From anywhere else: public members only.
    External,
}

impl VisibilityContext {
    /// Whether an owned membership with `visibility` passes.
    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            VisibilityContext::Own => true,
            VisibilityContext::Inherited => visibility != Visibility::Private,
            VisibilityContext::External => visibility == Visibility::Public,
        }
    }

    /// Whether the members of an import with `visibility` pass. Imported
    /// memberships are never protected; a non-public import is seen only
    /// from inside its own namespace.
    pub fn admits_import(self, visibility: Visibility) -> bool {
        match self {
            VisibilityContext::Own => true,
            _ => visibility == Visibility::Public,
        }
    }
}

/// How an entry got into a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Owned,
    Inherited,
    Imported,
    Aliased,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeEntry {
    pub element: ElementId,
    pub origin: Origin,
}

/// Ordered map from visible names to elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    entries: IndexMap<SmolStr, ScopeEntry>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<ElementId> {
        self.entries.get(name).map(|e| e.element)
    }

    pub fn entry(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &ScopeEntry)> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(SmolStr::as_str)
    }

    /// Distinct elements in order of first appearance.
    pub fn elements(&self) -> Vec<ElementId> {
        let mut seen = FxHashSet::default();
        self.entries
            .values()
            .map(|e| e.element)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert unless the name is already taken. Returns whether it was
    /// inserted.
    pub(crate) fn insert(&mut self, name: SmolStr, element: ElementId, origin: Origin) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, ScopeEntry { element, origin });
        true
    }
}

impl SemanticModel {
    pub(crate) fn scope_in(
        &self,
        id: ElementId,
        ctx: VisibilityContext,
        cx: &mut ResolveCx,
    ) -> Arc<Scope> {
        let partial = cx.partial_scope(id, ctx);
        self.memo(
            &self.caches.scopes,
            (id, ctx),
            InProgress::Scope(id, ctx),
            cx,
            || partial.unwrap_or_else(|| Arc::new(self.direct_scope(id, ctx))),
            |cx| Arc::new(self.compute_scope(id, ctx, cx)),
        )
    }

    /// Owned members under their declared names, without resolving
    /// anything.
    pub(crate) fn direct_scope(&self, id: ElementId, ctx: VisibilityContext) -> Scope {
        let mut scope = Scope::default();
        for &member_id in self.graph.children(id) {
            let Some(member) = self.graph.get(member_id) else {
                continue;
            };
            if !member.kind.is_named_member() || !ctx.admits(member.visibility) {
                continue;
            }
            for name in [&member.name, &member.short_name].into_iter().flatten() {
                scope.insert(name.clone(), member_id, Origin::Owned);
            }
        }
        scope
    }

    fn compute_scope(&self, id: ElementId, ctx: VisibilityContext, cx: &mut ResolveCx) -> Scope {
        let mut scope = Scope::default();
        let Some(element) = self.graph.get(id) else {
            return scope;
        };

        for &member_id in &element.members {
            self.add_member(member_id, ctx, Origin::Owned, &mut scope, cx);
        }

        if element.kind.is_type() {
            let generals = self.all_generals_in(id, cx);
            let hidden = self.hidden_by_redefinition(id, &generals, cx);
            let inherited = match ctx {
                VisibilityContext::External => VisibilityContext::External,
                _ => VisibilityContext::Inherited,
            };
            for &general in generals.iter() {
                for &member_id in self.graph.children(general) {
                    if hidden.contains(&member_id) {
                        continue;
                    }
                    self.add_member(member_id, inherited, Origin::Inherited, &mut scope, cx);
                }
            }
        }

        for &member_id in &element.members {
            let Some(member) = self.graph.get(member_id) else {
                continue;
            };
            if member.kind == ElementKind::Import && ctx.admits_import(member.visibility) {
                cx.set_partial_scope(id, ctx, &scope);
                self.import_into(member_id, Origin::Imported, &mut scope, cx);
            }
        }
        cx.clear_partial_scope(id, ctx);

        for (_, entry) in scope.iter() {
            self.note_dependency(id, entry.element);
        }
        trace!(element = %id, ?ctx, names = scope.len(), "computed scope");
        scope
    }

    /// Add one membership of a namespace to `scope` as seen through `ctx`.
    fn add_member(
        &self,
        member_id: ElementId,
        ctx: VisibilityContext,
        origin: Origin,
        scope: &mut Scope,
        cx: &mut ResolveCx,
    ) {
        let Some(member) = self.graph.get(member_id) else {
            return;
        };
        match member.kind {
            ElementKind::Import => {
                if origin == Origin::Inherited && ctx.admits_import(member.visibility) {
                    self.import_into(member_id, origin, scope, cx);
                }
            }
            ElementKind::Alias => {
                if !ctx.admits(member.visibility) {
                    return;
                }
                if let Some(target) = self.alias_target_in(member_id, cx) {
                    let origin = match origin {
                        Origin::Owned => Origin::Aliased,
                        other => other,
                    };
                    for name in [&member.name, &member.short_name].into_iter().flatten() {
                        scope.insert(name.clone(), target, origin);
                    }
                }
            }
            kind if kind.is_named_member() => {
                if !ctx.admits(member.visibility) {
                    return;
                }
                if let Some(name) = self.effective_name_in(member_id, cx) {
                    scope.insert(name, member_id, origin);
                }
                if let Some(short) = &member.short_name {
                    scope.insert(short.clone(), member_id, origin);
                }
            }
            _ => {}
        }
    }

    /// Features of `id` and its generals that some owned feature of `id` or
    /// of a general redefines.
    fn hidden_by_redefinition(
        &self,
        id: ElementId,
        generals: &[ElementId],
        cx: &mut ResolveCx,
    ) -> FxHashSet<ElementId> {
        let mut hidden = FxHashSet::default();
        for &owner in std::iter::once(&id).chain(generals) {
            for &member in self.graph.children(owner) {
                hidden.extend(self.redefined_features_in(member, cx));
            }
        }
        hidden
    }

    // ------------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------------

    fn import_into(
        &self,
        import_id: ElementId,
        origin: Origin,
        scope: &mut Scope,
        cx: &mut ResolveCx,
    ) {
        let Some(data) = self.graph.get(import_id).and_then(|e| e.import()) else {
            return;
        };
        let Some(frame) = cx.enter(InProgress::Import(import_id)) else {
            return;
        };
        if let Some(target) = self.import_target_in(import_id, cx) {
            let owner = self.graph.owner(import_id).unwrap_or(target);
            match data.wildcard {
                ImportWildcard::None => {
                    if self.passes_filters(data, target, owner, cx)
                        && let Some(name) = self.effective_name_in(target, cx)
                    {
                        scope.insert(name, target, origin);
                    }
                }
                ImportWildcard::Members => {
                    let members = self.scope_in(target, import_context(data), cx);
                    for (name, entry) in members.iter() {
                        if self.passes_filters(data, entry.element, owner, cx) {
                            scope.insert(name.clone(), entry.element, origin);
                        }
                    }
                }
                ImportWildcard::Recursive | ImportWildcard::MembersRecursive => {
                    if data.wildcard == ImportWildcard::Recursive
                        && self.passes_filters(data, target, owner, cx)
                        && let Some(name) = self.effective_name_in(target, cx)
                    {
                        scope.insert(name, target, origin);
                    }
                    let mut visited = FxHashSet::default();
                    self.import_recursive(data, target, owner, origin, scope, &mut visited, cx);
                }
            }
        }
        cx.exit(frame);
    }

    /// Every visible member of `namespace` and, recursively, of the
    /// namespaces it owns.
    #[allow(clippy::too_many_arguments)]
    fn import_recursive(
        &self,
        data: &ImportData,
        namespace: ElementId,
        importer: ElementId,
        origin: Origin,
        scope: &mut Scope,
        visited: &mut FxHashSet<ElementId>,
        cx: &mut ResolveCx,
    ) {
        if !visited.insert(namespace) {
            return;
        }
        let members = self.scope_in(namespace, import_context(data), cx);
        for (name, entry) in members.iter() {
            if self.passes_filters(data, entry.element, importer, cx) {
                scope.insert(name.clone(), entry.element, origin);
            }
        }
        for element in members.elements() {
            let owned = self.graph.owner(element) == Some(namespace);
            let is_namespace = self
                .graph
                .get(element)
                .is_some_and(|e| e.kind.has(Capability::Namespace));
            if owned && is_namespace {
                self.import_recursive(data, element, importer, origin, scope, visited, cx);
            }
        }
    }

    fn passes_filters(
        &self,
        data: &ImportData,
        candidate: ElementId,
        importer: ElementId,
        cx: &mut ResolveCx,
    ) -> bool {
        data.filters.iter().all(|filter| {
            let evaluation = crate::eval::evaluate_in(self, filter, importer, Some(candidate), cx);
            evaluation.errors.is_empty() && evaluation.values.as_bool() == Some(true)
        })
    }

    // ------------------------------------------------------------------------
    // Name lookup
    // ------------------------------------------------------------------------

    /// Look `name` up in `from` and its owners, then among the top-level
    /// members of all documents.
    pub(crate) fn lookup_lexical(
        &self,
        name: &str,
        from: Option<ElementId>,
        cx: &mut ResolveCx,
    ) -> Option<ElementId> {
        let mut current = from;
        while let Some(ns) = current {
            if let Some(found) = self.scope_in(ns, VisibilityContext::Own, cx).get(name) {
                return Some(found);
            }
            current = self.graph.owner(ns);
        }
        self.lookup_global(name)
    }

    pub(crate) fn lookup_global(&self, name: &str) -> Option<ElementId> {
        self.globals().get(name).copied()
    }

    /// Look `name` up among the members of `namespace` as seen from `from`.
    pub(crate) fn lookup_member(
        &self,
        namespace: ElementId,
        name: &str,
        from: Option<ElementId>,
        cx: &mut ResolveCx,
    ) -> Option<ElementId> {
        let ctx = match from {
            Some(from) if self.graph.is_ancestor(namespace, from) => VisibilityContext::Own,
            _ => VisibilityContext::External,
        };
        self.scope_in(namespace, ctx, cx).get(name)
    }

    /// Resolve a reference whose first segment is looked up lexically from
    /// `from`.
    pub(crate) fn resolve_qualified(
        &self,
        reference: &QualifiedRef,
        from: Option<ElementId>,
        cx: &mut ResolveCx,
    ) -> Option<ElementId> {
        let (first, rest) = reference.path.split_first()?;
        let start = self.lookup_lexical(first.as_str(), from, cx)?;
        self.resolve_rest(start, rest, &reference.chain, from, cx)
    }

    /// Resolve a reference whose first segment is looked up among the owned
    /// members of `namespace` and then lexically from its owner. Imports and
    /// aliases use this form so that their targets never depend on the
    /// scope they contribute to.
    pub(crate) fn resolve_shallow(
        &self,
        reference: &QualifiedRef,
        namespace: ElementId,
        cx: &mut ResolveCx,
    ) -> Option<ElementId> {
        let (first, rest) = reference.path.split_first()?;
        let start = match self
            .direct_scope(namespace, VisibilityContext::Own)
            .get(first.as_str())
        {
            Some(found) => found,
            None => self.lookup_lexical(first.as_str(), self.graph.owner(namespace), cx)?,
        };
        self.resolve_rest(start, rest, &reference.chain, Some(namespace), cx)
    }

    fn resolve_rest(
        &self,
        start: ElementId,
        path: &[Ident],
        chain: &[Ident],
        from: Option<ElementId>,
        cx: &mut ResolveCx,
    ) -> Option<ElementId> {
        let mut current = start;
        for segment in path.iter().chain(chain) {
            current = self.lookup_member(current, segment.as_str(), from, cx)?;
        }
        Some(current)
    }

    /// Targets of the redefinitions `id` declares.
    pub(crate) fn redefined_features_in(&self, id: ElementId, cx: &mut ResolveCx) -> Vec<ElementId> {
        self.graph
            .children(id)
            .iter()
            .filter(|&&rel| {
                self.graph.get(rel).is_some_and(|e| {
                    e.relationship().is_some_and(|r| {
                        r.kind == RelationshipKind::Redefinition && r.source.as_element() == Some(id)
                    })
                })
            })
            .filter_map(|&rel| self.relationship_target_in(rel, cx))
            .collect()
    }
}

fn import_context(data: &ImportData) -> VisibilityContext {
    if data.is_all {
        VisibilityContext::Own
    } else {
        VisibilityContext::External
    }
}
