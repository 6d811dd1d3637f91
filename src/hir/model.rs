//! The semantic model: element graph plus memoized resolution.
//!
//! ```text
//! SyntaxFile ──lower──▶ ElementGraph (one subgraph per document)
//!                            │
//!            ┌───────────────┼────────────────┐
//!            ▼               ▼                ▼
//!     direct/all generals   scopes      references, names
//!            └──────── memo caches (RwLock) ─┘
//! ```
//!
//! Every query takes `&self`; results are cached behind `parking_lot`
//! locks so independent documents can be resolved in parallel. Recursive
//! computations thread a [`ResolveCx`] that records what is in progress. A
//! computation re-entered while in progress answers with a fallback and
//! every result that observed such a fallback stays out of the cache,
//! except the outermost one whose own re-entry caused it.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::diagnostics::Diagnostic;
use super::element::Element;
use super::graph::ElementGraph;
use super::ids::ElementId;
use super::lower::lower_document;
use super::scope::{Scope, VisibilityContext};
use crate::base::{FileId, constants};
use crate::eval::Evaluation;
use crate::project::StdLib;
use crate::syntax::{Direction, Expr, SyntaxFile, Visibility};

/// A long-running request was cancelled through its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request cancelled")]
pub struct Cancelled;

/// Which end of a relationship a cached reference belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum RefSlot {
    Source,
    Target,
}

/// A computation that may be in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum InProgress {
    Generals(ElementId),
    AllGenerals(ElementId),
    Scope(ElementId, VisibilityContext),
    Import(ElementId),
    Name(ElementId),
    Value(ElementId),
    Reference(ElementId, RefSlot),
}

/// Marker for an entered computation.
#[derive(Debug)]
pub(crate) struct Frame {
    key: InProgress,
    depth: usize,
}

/// Per-request state of a recursive resolution.
#[derive(Debug, Default)]
pub(crate) struct ResolveCx {
    active: FxHashMap<InProgress, usize>,
    depth: usize,
    /// Shallowest depth whose computation was re-entered and has not
    /// finished yet.
    cut: Option<usize>,
    /// Members gathered so far by scopes still being built.
    partial_scopes: FxHashMap<(ElementId, VisibilityContext), Arc<Scope>>,
}

impl ResolveCx {
    /// Mark `key` in progress, or record a cut and return `None` if it
    /// already is.
    pub(crate) fn enter(&mut self, key: InProgress) -> Option<Frame> {
        if let Some(&depth) = self.active.get(&key) {
            self.cut = Some(self.cut.map_or(depth, |cut| cut.min(depth)));
            return None;
        }
        let depth = self.depth;
        self.depth += 1;
        self.active.insert(key, depth);
        Some(Frame { key, depth })
    }

    /// Finish a computation. Returns whether its result is final and may be
    /// cached.
    pub(crate) fn exit(&mut self, frame: Frame) -> bool {
        self.active.remove(&frame.key);
        self.depth = frame.depth;
        match self.cut {
            Some(cut) if cut < frame.depth => false,
            _ => {
                self.cut = None;
                true
            }
        }
    }

    pub(crate) fn partial_scope(&self, id: ElementId, ctx: VisibilityContext) -> Option<Arc<Scope>> {
        self.partial_scopes.get(&(id, ctx)).cloned()
    }

    pub(crate) fn set_partial_scope(&mut self, id: ElementId, ctx: VisibilityContext, scope: &Scope) {
        self.partial_scopes.insert((id, ctx), Arc::new(scope.clone()));
    }

    pub(crate) fn clear_partial_scope(&mut self, id: ElementId, ctx: VisibilityContext) {
        self.partial_scopes.remove(&(id, ctx));
    }
}

#[derive(Debug, Default)]
pub(crate) struct Caches {
    pub(crate) direct_generals: RwLock<FxHashMap<ElementId, Arc<[ElementId]>>>,
    pub(crate) all_generals: RwLock<FxHashMap<ElementId, Arc<[ElementId]>>>,
    pub(crate) scopes: RwLock<FxHashMap<(ElementId, VisibilityContext), Arc<Scope>>>,
    pub(crate) references: RwLock<FxHashMap<(ElementId, RefSlot), Option<ElementId>>>,
    pub(crate) effective_names: RwLock<FxHashMap<ElementId, Option<SmolStr>>>,
    pub(crate) diagnostics: RwLock<FxHashMap<ElementId, Arc<[Diagnostic]>>>,
    globals: RwLock<Option<Arc<FxHashMap<SmolStr, ElementId>>>>,
    standalone: RwLock<Option<Arc<FxHashMap<SmolStr, Vec<ElementId>>>>>,
    /// Document → documents it resolved something into.
    dependencies: RwLock<FxHashMap<FileId, FxHashSet<FileId>>>,
    /// Documents with at least one unresolved reference.
    unresolved: RwLock<FxHashSet<FileId>>,
}

impl Caches {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn retain(&mut self, keep: impl Fn(ElementId) -> bool) {
        self.direct_generals.get_mut().retain(|id, _| keep(*id));
        self.all_generals.get_mut().retain(|id, _| keep(*id));
        self.scopes.get_mut().retain(|(id, _), _| keep(*id));
        self.references.get_mut().retain(|(id, _), _| keep(*id));
        self.effective_names.get_mut().retain(|id, _| keep(*id));
        self.diagnostics.get_mut().retain(|id, _| keep(*id));
        *self.globals.get_mut() = None;
        *self.standalone.get_mut() = None;
    }
}

/// The resolved model of every open document plus the standard library.
#[derive(Debug, Default)]
pub struct SemanticModel {
    pub(crate) graph: ElementGraph,
    pub(crate) stdlib_enabled: bool,
    pub(crate) caches: Caches,
    /// Public top-level names per document, to detect changes that can
    /// affect lookups in any document.
    root_names: FxHashMap<FileId, Vec<SmolStr>>,
    /// Documents declaring stand-alone relationships, which can change the
    /// generals of elements in any document.
    standalone_documents: FxHashSet<FileId>,
}

impl SemanticModel {
    /// A model without a standard library: no implicit generals and no
    /// library names.
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with the documents of `library` loaded.
    pub fn with_library(library: &StdLib) -> Self {
        let mut model = Self::new();
        let started = Instant::now();
        for document in library.documents() {
            let root = lower_document(&mut model.graph, document.file(), document.syntax());
            let names = model.public_root_names(root);
            model.root_names.insert(document.file(), names);
        }
        model.stdlib_enabled = true;
        info!(
            documents = library.documents().len(),
            elapsed = ?started.elapsed(),
            "standard library linked"
        );
        model
    }

    pub fn graph(&self) -> &ElementGraph {
        &self.graph
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.graph.get(id)
    }

    pub fn stdlib_enabled(&self) -> bool {
        self.stdlib_enabled
    }

    pub fn document_root(&self, file: FileId) -> Option<ElementId> {
        self.graph.document_root(file)
    }

    // ------------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------------

    /// Link `syntax` as the content of `file`, replacing whatever the
    /// document contained before. Returns the new root namespace.
    pub fn set_document(&mut self, file: FileId, syntax: &SyntaxFile) -> ElementId {
        let started = Instant::now();
        let root = lower_document(&mut self.graph, file, syntax);
        let names = self.public_root_names(root);
        let names_changed = self.root_names.get(&file) != Some(&names);
        self.root_names.insert(file, names);
        let had_standalone = self.standalone_documents.remove(&file);
        let has_standalone = self.graph.iter().any(|e| {
            e.document == file && e.relationship().is_some_and(|r| r.source.as_reference().is_some())
        });
        if has_standalone {
            self.standalone_documents.insert(file);
        }
        self.invalidate(file, names_changed || had_standalone || has_standalone);
        debug!(%file, elapsed = ?started.elapsed(), "document linked");
        root
    }

    /// Drop a document. Returns whether it was present.
    pub fn remove_document(&mut self, file: FileId) -> bool {
        if !self.graph.remove_document(file) {
            return false;
        }
        self.root_names.remove(&file);
        self.standalone_documents.remove(&file);
        self.invalidate(file, true);
        debug!(%file, "document removed");
        true
    }

    fn public_root_names(&self, root: ElementId) -> Vec<SmolStr> {
        self.graph
            .children(root)
            .iter()
            .filter_map(|&id| self.graph.get(id))
            .filter(|e| e.visibility == Visibility::Public)
            .flat_map(|e| [e.name.clone(), e.short_name.clone()])
            .flatten()
            .collect()
    }

    /// Drop cached results that may depend on `file`: those of `file`
    /// itself, of every document that resolved something into it
    /// (transitively), and of every document with unresolved references.
    /// A change to the public top-level names clears everything.
    fn invalidate(&mut self, file: FileId, everything: bool) {
        if everything {
            self.caches.clear();
            debug!(%file, "top-level names changed, all caches cleared");
            return;
        }
        let mut affected: FxHashSet<FileId> = self.caches.unresolved.get_mut().drain().collect();
        affected.insert(file);
        let dependencies = self.caches.dependencies.get_mut();
        loop {
            let before = affected.len();
            for (from, to) in dependencies.iter() {
                if !affected.contains(from) && to.iter().any(|t| affected.contains(t)) {
                    affected.insert(*from);
                }
            }
            if affected.len() == before {
                break;
            }
        }
        dependencies.retain(|from, _| !affected.contains(from));

        let graph = &self.graph;
        self.caches.retain(|id| {
            graph
                .get(id)
                .is_some_and(|e| !affected.contains(&e.document))
        });
        debug!(%file, affected = affected.len(), "caches invalidated");
    }

    pub(crate) fn note_dependency(&self, from: ElementId, to: ElementId) {
        let (Some(from), Some(to)) = (self.graph.get(from), self.graph.get(to)) else {
            return;
        };
        if from.document != to.document && !to.document.is_library() {
            self.caches
                .dependencies
                .write()
                .entry(from.document)
                .or_default()
                .insert(to.document);
        }
    }

    pub(crate) fn note_unresolved(&self, from: ElementId) {
        if let Some(element) = self.graph.get(from) {
            self.caches.unresolved.write().insert(element.document);
        }
    }

    // ------------------------------------------------------------------------
    // Memoization
    // ------------------------------------------------------------------------

    /// Read `key` from `cache`, or compute it under the in-progress marker
    /// `marker`, answering `on_cycle()` if the marker is already set.
    pub(crate) fn memo<K, V>(
        &self,
        cache: &RwLock<FxHashMap<K, V>>,
        key: K,
        marker: InProgress,
        cx: &mut ResolveCx,
        on_cycle: impl FnOnce() -> V,
        compute: impl FnOnce(&mut ResolveCx) -> V,
    ) -> V
    where
        K: Eq + Hash,
        V: Clone,
    {
        if let Some(hit) = cache.read().get(&key) {
            return hit.clone();
        }
        let Some(frame) = cx.enter(marker) else {
            return on_cycle();
        };
        let value = compute(cx);
        if cx.exit(frame) {
            cache.write().insert(key, value.clone());
        }
        value
    }

    // ------------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------------

    /// Public named top-level members of all documents; user documents
    /// come first and the first declaration of a name wins.
    pub(crate) fn globals(&self) -> Arc<FxHashMap<SmolStr, ElementId>> {
        if let Some(globals) = self.caches.globals.read().as_ref() {
            return globals.clone();
        }
        let mut globals = FxHashMap::default();
        for (_, document) in self.graph.documents() {
            for &id in self.graph.children(document.root()) {
                let Some(element) = self.graph.get(id) else {
                    continue;
                };
                if element.visibility != Visibility::Public || !element.kind.is_named_member() {
                    continue;
                }
                for name in [&element.name, &element.short_name].into_iter().flatten() {
                    globals.entry(name.clone()).or_insert(id);
                }
            }
        }
        let globals = Arc::new(globals);
        *self.caches.globals.write() = Some(globals.clone());
        globals
    }

    /// Stand-alone relationships whose source reference ends in the name or
    /// short name of `element`.
    pub(crate) fn standalone_relationships_naming(&self, element: &Element) -> Vec<ElementId> {
        let index = self.standalone_index();
        [&element.name, &element.short_name]
            .into_iter()
            .flatten()
            .filter_map(|name| index.get(name))
            .flatten()
            .copied()
            .collect()
    }

    fn standalone_index(&self) -> Arc<FxHashMap<SmolStr, Vec<ElementId>>> {
        if let Some(index) = self.caches.standalone.read().as_ref() {
            return index.clone();
        }
        let mut index: FxHashMap<SmolStr, Vec<ElementId>> = FxHashMap::default();
        for element in self.graph.iter() {
            if let Some(reference) = element.relationship().and_then(|r| r.source.as_reference()) {
                index
                    .entry(reference.last().text.clone())
                    .or_default()
                    .push(element.id);
            }
        }
        let index = Arc::new(index);
        *self.caches.standalone.write() = Some(index.clone());
        index
    }

    pub(crate) fn lookup_qualified_in(&self, name: &str, cx: &mut ResolveCx) -> Option<ElementId> {
        let mut segments = name.split(constants::QUALIFIED_SEPARATOR);
        let mut current = self.lookup_global(segments.next()?)?;
        for segment in segments {
            current = self.lookup_member(current, segment, None, cx)?;
        }
        Some(current)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Resolve a fully qualified name such as `ScalarValues::Integer` from
    /// the top level.
    pub fn lookup_qualified(&self, name: &str) -> Option<ElementId> {
        self.lookup_qualified_in(name, &mut ResolveCx::default())
    }

    /// Resolve a possibly qualified name as if written inside `from`.
    pub fn resolve_name(&self, name: &str, from: ElementId) -> Option<ElementId> {
        let cx = &mut ResolveCx::default();
        let mut segments = name.split(constants::QUALIFIED_SEPARATOR);
        let mut current = self.lookup_lexical(segments.next()?, Some(from), cx)?;
        for segment in segments {
            current = self.lookup_member(current, segment, Some(from), cx)?;
        }
        Some(current)
    }

    /// Link every reference of `id` and its owned members and report what
    /// is wrong with them.
    pub fn resolve(&self, id: ElementId) -> Vec<Diagnostic> {
        if !self.graph.contains(id) {
            warn!(element = %id, "resolve requested for a stale element id");
            return Vec::new();
        }
        let mut out = Vec::new();
        self.resolve_tree(id, &mut ResolveCx::default(), &mut out);
        out
    }

    /// Resolve a whole document, checking `cancel` between its top-level
    /// members.
    pub fn resolve_document(
        &self,
        file: FileId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, Cancelled> {
        let Some(root) = self.graph.document_root(file) else {
            warn!(%file, "resolve requested for unknown document");
            return Ok(Vec::new());
        };
        let started = Instant::now();
        let cx = &mut ResolveCx::default();
        let mut out = self.check_element(root, cx).to_vec();
        for &member in self.graph.children(root) {
            if cancel.is_cancelled() {
                debug!(%file, "resolution cancelled");
                return Err(Cancelled);
            }
            self.resolve_tree(member, cx, &mut out);
        }
        info!(%file, diagnostics = out.len(), elapsed = ?started.elapsed(), "document resolved");
        Ok(out)
    }

    /// Names visible from `id` as seen through `ctx`.
    pub fn scope(&self, id: ElementId, ctx: VisibilityContext) -> Arc<Scope> {
        self.scope_in(id, ctx, &mut ResolveCx::default())
    }

    /// Evaluate `expr` with names resolved from `context`.
    pub fn evaluate(&self, expr: &Expr, context: ElementId) -> Evaluation {
        crate::eval::evaluate_in(self, expr, context, None, &mut ResolveCx::default())
    }

    /// Evaluate the bound value of a feature, if it has one.
    pub fn evaluate_value(&self, feature: ElementId) -> Option<Evaluation> {
        let value = self.graph.get(feature)?.value.clone()?;
        Some(self.evaluate(&value, feature))
    }

    pub fn direct_generals(&self, id: ElementId) -> Arc<[ElementId]> {
        self.direct_generals_in(id, &mut ResolveCx::default())
    }

    pub fn all_generals(&self, id: ElementId) -> Arc<[ElementId]> {
        self.all_generals_in(id, &mut ResolveCx::default())
    }

    /// Whether `sub` is `sup` or specializes it directly or indirectly.
    pub fn conforms(&self, sub: ElementId, sup: ElementId) -> bool {
        self.conforms_in(sub, sup, &mut ResolveCx::default())
    }

    pub fn types_of(&self, feature: ElementId) -> Vec<ElementId> {
        self.types_of_in(feature, &mut ResolveCx::default())
    }

    pub fn conjugated_type(&self, id: ElementId) -> Option<ElementId> {
        self.conjugated_type_in(id, &mut ResolveCx::default())
    }

    pub fn effective_direction(&self, ty: ElementId, feature: ElementId) -> Option<Direction> {
        self.effective_direction_in(ty, feature, &mut ResolveCx::default())
    }

    pub fn effective_name(&self, id: ElementId) -> Option<SmolStr> {
        self.effective_name_in(id, &mut ResolveCx::default())
    }

    /// `A::B::c` style name, `None` if the element or an owner below the
    /// document root has no name.
    pub fn qualified_name(&self, id: ElementId) -> Option<String> {
        let cx = &mut ResolveCx::default();
        let mut segments = vec![self.effective_name_in(id, cx)?];
        for owner in self.graph.ancestors(id) {
            if self.graph.owner(owner).is_none() {
                break;
            }
            segments.push(self.effective_name_in(owner, cx)?);
        }
        segments.reverse();
        Some(segments.join(constants::QUALIFIED_SEPARATOR))
    }

    pub fn relationship_target(&self, rel: ElementId) -> Option<ElementId> {
        self.relationship_target_in(rel, &mut ResolveCx::default())
    }

    pub fn relationship_source(&self, rel: ElementId) -> Option<ElementId> {
        self.relationship_source_in(rel, &mut ResolveCx::default())
    }

    pub fn import_target(&self, import: ElementId) -> Option<ElementId> {
        self.import_target_in(import, &mut ResolveCx::default())
    }

    pub fn alias_target(&self, alias: ElementId) -> Option<ElementId> {
        self.alias_target_in(alias, &mut ResolveCx::default())
    }

    pub fn metadata_types(&self, id: ElementId) -> Vec<ElementId> {
        self.metadata_types_in(id, &mut ResolveCx::default())
    }
}
