//! Relationship resolution: reference linking, general types and the
//! structural checks behind [`SemanticModel::resolve`].

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind, codes};
use super::element::{Element, ElementData, RelEnd};
use super::ids::ElementId;
use super::kind::{Capability, ElementKind, RelationshipKind};
use super::model::{InProgress, RefSlot, ResolveCx, SemanticModel};
use super::scope::VisibilityContext;
use crate::base::TextRange;
use crate::syntax::{Direction, Expr, ExprKind, QualifiedRef};

impl SemanticModel {
    // ------------------------------------------------------------------------
    // References
    // ------------------------------------------------------------------------

    /// The element the target end of relationship `rel` designates.
    pub(crate) fn relationship_target_in(&self, rel: ElementId, cx: &mut ResolveCx) -> Option<ElementId> {
        self.memo(
            &self.caches.references,
            (rel, RefSlot::Target),
            InProgress::Reference(rel, RefSlot::Target),
            cx,
            || None,
            |cx| {
                let element = self.graph.get(rel)?;
                let data = element.relationship()?;
                match &data.target {
                    RelEnd::Element(id) => Some(*id),
                    RelEnd::Reference(reference) => {
                        let found = match data.source.as_element() {
                            Some(source) => self.resolve_clause_target(data.kind, source, reference, cx),
                            None => self.resolve_qualified(reference, element.owner, cx),
                        };
                        self.note_resolution(rel, reference, found);
                        found
                    }
                }
            },
        )
    }

    /// The element the source end of relationship `rel` designates.
    pub(crate) fn relationship_source_in(&self, rel: ElementId, cx: &mut ResolveCx) -> Option<ElementId> {
        self.memo(
            &self.caches.references,
            (rel, RefSlot::Source),
            InProgress::Reference(rel, RefSlot::Source),
            cx,
            || None,
            |cx| {
                let element = self.graph.get(rel)?;
                match &element.relationship()?.source {
                    RelEnd::Element(id) => Some(*id),
                    RelEnd::Reference(reference) => {
                        let found = self.resolve_qualified(reference, element.owner, cx);
                        self.note_resolution(rel, reference, found);
                        found
                    }
                }
            },
        )
    }

    /// Resolve the target of a relationship clause declared by `source`.
    ///
    /// Redefined and subsetted features are searched among the features
    /// the owner of `source` inherits before falling back to lexical lookup.
    /// A redefinition never looks in the owner's own scope, which would
    /// contain the redefining feature itself.
    fn resolve_clause_target(
        &self,
        kind: RelationshipKind,
        source: ElementId,
        reference: &QualifiedRef,
        cx: &mut ResolveCx,
    ) -> Option<ElementId> {
        let owner = self.graph.owner(source);
        let simple = reference.path.len() == 1 && !reference.is_chain();
        match kind {
            RelationshipKind::Redefinition | RelationshipKind::Subsetting => {
                if simple
                    && let Some(owner) = owner
                    && let Some(found) = self.lookup_inherited(owner, reference.last().as_str(), cx)
                {
                    return Some(found);
                }
                let from = if kind == RelationshipKind::Redefinition {
                    owner.and_then(|o| self.graph.owner(o))
                } else {
                    owner
                };
                self.resolve_qualified(reference, from, cx)
            }
            _ => self.resolve_qualified(reference, owner, cx),
        }
    }

    /// Find `name` among the members the direct generals of `owner` expose
    /// to specializations.
    fn lookup_inherited(&self, owner: ElementId, name: &str, cx: &mut ResolveCx) -> Option<ElementId> {
        let generals = self.direct_generals_in(owner, cx);
        generals
            .iter()
            .find_map(|&g| self.scope_in(g, VisibilityContext::Inherited, cx).get(name))
    }

    pub(crate) fn import_target_in(&self, import: ElementId, cx: &mut ResolveCx) -> Option<ElementId> {
        self.memo(
            &self.caches.references,
            (import, RefSlot::Target),
            InProgress::Reference(import, RefSlot::Target),
            cx,
            || None,
            |cx| {
                let element = self.graph.get(import)?;
                let data = element.import()?;
                let found = self.resolve_shallow(&data.target, element.owner?, cx);
                self.note_resolution(import, &data.target, found);
                found
            },
        )
    }

    pub(crate) fn alias_target_in(&self, alias: ElementId, cx: &mut ResolveCx) -> Option<ElementId> {
        self.memo(
            &self.caches.references,
            (alias, RefSlot::Target),
            InProgress::Reference(alias, RefSlot::Target),
            cx,
            || None,
            |cx| {
                let element = self.graph.get(alias)?;
                let data = element.alias()?;
                let found = self.resolve_shallow(&data.target, element.owner?, cx);
                self.note_resolution(alias, &data.target, found);
                found
            },
        )
    }

    fn note_resolution(&self, from: ElementId, reference: &QualifiedRef, found: Option<ElementId>) {
        match found {
            Some(target) => {
                trace!(%reference, %target, "resolved reference");
                self.note_dependency(from, target);
            }
            None => {
                trace!(%reference, "unresolved reference");
                self.note_unresolved(from);
            }
        }
    }

    // ------------------------------------------------------------------------
    // General types
    // ------------------------------------------------------------------------

    pub(crate) fn direct_generals_in(&self, id: ElementId, cx: &mut ResolveCx) -> Arc<[ElementId]> {
        self.memo(
            &self.caches.direct_generals,
            id,
            InProgress::Generals(id),
            cx,
            || Arc::from(Vec::new()),
            |cx| Arc::from(self.compute_direct_generals(id, cx)),
        )
    }

    fn compute_direct_generals(&self, id: ElementId, cx: &mut ResolveCx) -> Vec<ElementId> {
        let Some(element) = self.graph.get(id) else {
            return Vec::new();
        };
        if !element.kind.is_type() {
            return Vec::new();
        }
        let mut generals = Vec::new();
        let push = |general: Option<ElementId>, generals: &mut Vec<ElementId>| {
            if let Some(g) = general
                && g != id
                && !generals.contains(&g)
            {
                generals.push(g);
            }
        };

        let mut differencing_seen = false;
        let mut subsets = false;
        for &member in &element.members {
            let Some(data) = self.graph.get(member).and_then(Element::relationship) else {
                continue;
            };
            if data.source.as_element() != Some(id) {
                continue;
            }
            subsets |= matches!(
                data.kind,
                RelationshipKind::Subsetting | RelationshipKind::Redefinition
            );
            let contributes = match data.kind {
                kind if kind.is_generalization() => true,
                RelationshipKind::Intersecting => true,
                RelationshipKind::Differencing => !std::mem::replace(&mut differencing_seen, true),
                _ => false,
            };
            if contributes {
                push(self.relationship_target_in(member, cx), &mut generals);
            }
        }

        for rel in self.standalone_relationships_naming(element) {
            let Some(kind) = self.graph.get(rel).and_then(Element::relationship_kind) else {
                continue;
            };
            if kind.is_generalization() && self.relationship_source_in(rel, cx) == Some(id) {
                subsets |= matches!(
                    kind,
                    RelationshipKind::Subsetting | RelationshipKind::Redefinition
                );
                push(self.relationship_target_in(rel, cx), &mut generals);
            }
        }

        // A feature subsets its library default unless it subsets or
        // redefines something itself; typing alone does not count.
        let implicit = if element.kind.is_feature() {
            !subsets
        } else {
            generals.is_empty()
        };
        if implicit
            && self.stdlib_enabled
            && let Some(name) = element.kind.implicit_general()
        {
            push(self.lookup_qualified_in(name, cx), &mut generals);
        }
        generals
    }

    /// Every general of `id`: direct generals first, then the generals of
    /// each of them depth-first, each at most once and never `id` itself.
    pub(crate) fn all_generals_in(&self, id: ElementId, cx: &mut ResolveCx) -> Arc<[ElementId]> {
        if let Some(hit) = self.caches.all_generals.read().get(&id) {
            return hit.clone();
        }
        let Some(frame) = cx.enter(InProgress::AllGenerals(id)) else {
            return Arc::from(Vec::new());
        };
        let mut visited = FxHashSet::default();
        visited.insert(id);
        let mut out = Vec::new();
        let directs = self.direct_generals_in(id, cx);
        for &d in directs.iter() {
            if visited.insert(d) {
                out.push(d);
            }
        }
        for &d in directs.iter() {
            let mut stack: Vec<ElementId> = self.direct_generals_in(d, cx).iter().rev().copied().collect();
            while let Some(g) = stack.pop() {
                if visited.insert(g) {
                    out.push(g);
                    stack.extend(self.direct_generals_in(g, cx).iter().rev().copied());
                }
            }
        }
        for &g in &out {
            self.note_dependency(id, g);
        }
        let result: Arc<[ElementId]> = Arc::from(out);
        if cx.exit(frame) {
            debug!(element = %id, generals = result.len(), "general set computed");
            self.caches.all_generals.write().insert(id, result.clone());
        }
        result
    }

    pub(crate) fn conforms_in(&self, sub: ElementId, sup: ElementId, cx: &mut ResolveCx) -> bool {
        sub == sup || self.all_generals_in(sub, cx).contains(&sup)
    }

    // ------------------------------------------------------------------------
    // Features
    // ------------------------------------------------------------------------

    /// Declared name, or the name of the single feature an unnamed feature
    /// redefines.
    pub(crate) fn effective_name_in(&self, id: ElementId, cx: &mut ResolveCx) -> Option<SmolStr> {
        let element = self.graph.get(id)?;
        if let Some(name) = &element.name {
            return Some(name.clone());
        }
        if !element.kind.is_feature() {
            return None;
        }
        self.memo(
            &self.caches.effective_names,
            id,
            InProgress::Name(id),
            cx,
            || None,
            |cx| match self.redefined_features_in(id, cx).as_slice() {
                [single] => self.effective_name_in(*single, cx),
                _ => None,
            },
        )
    }

    /// Types of a feature: its own typings, then those of the features it
    /// subsets or redefines.
    pub(crate) fn types_of_in(&self, id: ElementId, cx: &mut ResolveCx) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(feature) = stack.pop() {
            if !visited.insert(feature) {
                continue;
            }
            let mut next = Vec::new();
            for &member in self.graph.children(feature) {
                let Some(data) = self.graph.get(member).and_then(Element::relationship) else {
                    continue;
                };
                if data.source.as_element() != Some(feature) {
                    continue;
                }
                match data.kind {
                    RelationshipKind::FeatureTyping => {
                        if let Some(ty) = self.relationship_target_in(member, cx)
                            && !out.contains(&ty)
                        {
                            out.push(ty);
                        }
                    }
                    RelationshipKind::Subsetting | RelationshipKind::Redefinition => {
                        next.extend(self.relationship_target_in(member, cx));
                    }
                    _ => {}
                }
            }
            stack.extend(next.into_iter().rev());
        }
        out
    }

    /// Conjugations `id` declares, in order.
    fn conjugations_of(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.graph.children(id).iter().copied().filter(move |&rel| {
            self.graph.get(rel).is_some_and(|e| {
                e.relationship().is_some_and(|r| {
                    r.kind == RelationshipKind::Conjugation && r.source.as_element() == Some(id)
                })
            })
        })
    }

    pub(crate) fn conjugated_type_in(&self, id: ElementId, cx: &mut ResolveCx) -> Option<ElementId> {
        let first = self.conjugations_of(id).next()?;
        self.relationship_target_in(first, cx)
    }

    /// Direction of `feature` as seen from `ty`, flipped once for every
    /// conjugation it is reached through.
    pub(crate) fn effective_direction_in(
        &self,
        ty: ElementId,
        feature: ElementId,
        cx: &mut ResolveCx,
    ) -> Option<Direction> {
        let declared = self.graph.get(feature)?.feature.as_ref()?.direction;
        let mut flipped = false;
        let mut current = ty;
        let mut visited = FxHashSet::default();
        while visited.insert(current) {
            if self.graph.owner(feature) == Some(current) {
                break;
            }
            let Some(original) = self.conjugated_type_in(current, cx) else {
                break;
            };
            let reachable = self.graph.owner(feature).is_some_and(|owner| {
                owner == original || self.conforms_in(original, owner, cx)
            });
            if !reachable {
                break;
            }
            flipped = !flipped;
            current = original;
        }
        declared.map(|d| if flipped { d.conjugate() } else { d })
    }

    /// Metadata features applied to `id` with `#M` or `@M`.
    pub(crate) fn applied_metadata(&self, id: ElementId) -> Vec<ElementId> {
        self.graph
            .children(id)
            .iter()
            .copied()
            .filter(|&m| {
                self.graph
                    .get(m)
                    .is_some_and(|e| e.kind == ElementKind::MetadataFeature)
            })
            .collect()
    }

    /// Types of every metadata feature applied to `id`.
    pub(crate) fn metadata_types_in(&self, id: ElementId, cx: &mut ResolveCx) -> Vec<ElementId> {
        self.applied_metadata(id)
            .into_iter()
            .flat_map(|m| self.types_of_in(m, cx))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------------

    /// Diagnostics for `id` alone, not its members.
    pub(crate) fn check_element(&self, id: ElementId, cx: &mut ResolveCx) -> Arc<[Diagnostic]> {
        if let Some(hit) = self.caches.diagnostics.read().get(&id) {
            return hit.clone();
        }
        let Some(element) = self.graph.get(id) else {
            return Arc::from(Vec::new());
        };
        let mut collector = DiagnosticCollector::new(element.document);
        match &element.data {
            ElementData::Relationship(data) => self.check_relationship(element, data.kind, cx, &mut collector),
            ElementData::Import(data) => {
                if self.import_target_in(id, cx).is_none() {
                    collector.invalid_import(data.target.range, &data.target.to_string());
                }
                for filter in &data.filters {
                    self.check_expression_types(filter, id, cx, &mut collector);
                }
            }
            ElementData::Alias(data) => {
                if self.alias_target_in(id, cx).is_none() {
                    collector.undefined_reference(data.target.range, &data.target.to_string());
                }
            }
            ElementData::Plain => {
                if element.kind.is_type() {
                    self.check_type(element, cx, &mut collector);
                }
                if element.kind.has(Capability::Namespace) {
                    self.check_duplicates(element, &mut collector);
                }
            }
        }
        let diagnostics: Arc<[Diagnostic]> = Arc::from(collector.take());
        self.caches.diagnostics.write().insert(id, diagnostics.clone());
        diagnostics
    }

    fn check_relationship(
        &self,
        element: &Element,
        kind: RelationshipKind,
        cx: &mut ResolveCx,
        collector: &mut DiagnosticCollector,
    ) {
        let Some(data) = element.relationship() else {
            return;
        };
        let source = match &data.source {
            RelEnd::Element(id) => Some(*id),
            RelEnd::Reference(reference) => {
                let found = self.relationship_source_in(element.id, cx);
                if found.is_none() {
                    collector.undefined_reference(reference.range, &reference.to_string());
                }
                found
            }
        };
        let target = self.relationship_target_in(element.id, cx);
        if target.is_none()
            && let RelEnd::Reference(reference) = &data.target
        {
            collector.undefined_reference(reference.range, &reference.to_string());
        }
        if kind.is_generalization()
            && let (Some(source), Some(target)) = (source, target)
            && source == target
        {
            collector.structural(
                element.range,
                codes::INVALID_SPECIALIZATION,
                format!("an element cannot be its own {}", kind.display()),
            );
        }
    }

    fn check_type(&self, element: &Element, cx: &mut ResolveCx, collector: &mut DiagnosticCollector) {
        let id = element.id;
        let mut operands = [0usize; 3];
        let mut redefinitions = 0;
        for &member in &element.members {
            let Some(kind) = self.graph.get(member).and_then(Element::relationship_kind) else {
                continue;
            };
            match kind {
                RelationshipKind::Unioning => operands[0] += 1,
                RelationshipKind::Intersecting => operands[1] += 1,
                RelationshipKind::Differencing => operands[2] += 1,
                RelationshipKind::Redefinition => redefinitions += 1,
                _ => {}
            }
        }
        for (count, what) in operands.iter().zip(["unioning", "intersecting", "differencing"]) {
            if *count == 1 {
                collector.structural(
                    element.range,
                    codes::OPERAND_COUNT,
                    format!("{what} requires at least two operands"),
                );
            }
        }
        if self.conjugations_of(id).count() > 1 {
            collector.structural(
                element.range,
                codes::MULTIPLE_CONJUGATIONS,
                "a type can have at most one conjugation",
            );
        }
        if element.name.is_none() && element.kind.is_feature() && redefinitions > 1 {
            collector.structural(
                element.range,
                codes::INVALID_REDEFINITION,
                "a feature redefining more than one feature must be named",
            );
        }

        if let Some(value) = &element.value {
            let evaluation = crate::eval::evaluate_in(self, value, id, None, cx);
            for failure in &evaluation.errors {
                if failure.error.is_static_failure() {
                    collector.evaluation(failure.range, failure.error.to_string());
                }
            }
            if evaluation.errors.is_empty()
                && let Some(multiplicity) = element.feature.as_ref().and_then(|f| f.multiplicity)
                && !multiplicity.contains(evaluation.values.len() as u64)
            {
                collector.add(
                    Diagnostic::warning(
                        element.document,
                        value.range,
                        DiagnosticKind::Structural,
                        format!(
                            "value has {} element(s), outside the declared multiplicity",
                            evaluation.values.len()
                        ),
                    )
                    .with_code(codes::CONSTRAINT_VIOLATION),
                );
            }
        }
    }

    fn check_duplicates(&self, element: &Element, collector: &mut DiagnosticCollector) {
        let mut seen: FxHashMap<&str, TextRange> = FxHashMap::default();
        for &member in &element.members {
            let Some(member) = self.graph.get(member) else {
                continue;
            };
            if !member.kind.is_named_member() && member.kind != ElementKind::Alias {
                continue;
            }
            let Some(name) = member.name.as_deref() else {
                continue;
            };
            let range = member.name_range.unwrap_or(member.range);
            if let Some(existing) = seen.get(name) {
                collector.duplicate_definition(range, name, *existing);
            } else {
                seen.insert(name, range);
            }
        }
    }

    /// Report classification types in `expr` that do not resolve.
    fn check_expression_types(
        &self,
        expr: &Expr,
        context: ElementId,
        cx: &mut ResolveCx,
        collector: &mut DiagnosticCollector,
    ) {
        let mut stack = vec![expr];
        while let Some(expr) = stack.pop() {
            match &expr.kind {
                ExprKind::Classify { operand, ty, .. } => {
                    if self.resolve_qualified(ty, Some(context), cx).is_none() {
                        collector.undefined_reference(ty.range, &ty.to_string());
                    }
                    stack.extend(operand.as_deref());
                }
                ExprKind::Member { base, .. } => stack.push(base),
                ExprKind::Unary { operand, .. } => stack.push(operand),
                ExprKind::Binary { lhs, rhs, .. } => stack.extend([&**lhs, &**rhs]),
                ExprKind::If { cond, then, otherwise } => stack.extend([&**cond, &**then, &**otherwise]),
                ExprKind::Invoke { args, .. } | ExprKind::Sequence(args) => stack.extend(args),
                ExprKind::Index { base, index } => stack.extend([&**base, &**index]),
                ExprKind::Literal(_) | ExprKind::Name(_) => {}
            }
        }
    }

    /// Diagnostics for `id` and everything it owns.
    pub(crate) fn resolve_tree(&self, id: ElementId, cx: &mut ResolveCx, out: &mut Vec<Diagnostic>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.extend(self.check_element(current, cx).iter().cloned());
            stack.extend(self.graph.children(current).iter().rev());
        }
    }
}
