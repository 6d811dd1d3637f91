//! Expression evaluation.
//!
//! Expressions evaluate to a [`Sequence`] of values. Names resolve through
//! the semantic model: a feature with a bound value evaluates to that
//! value, any other element evaluates to a reference to itself. Operators
//! and library functions dispatch to the [`builtins`] registry.
//!
//! A failing subexpression records an [`EvalFailure`] and contributes an
//! empty sequence, so one evaluation can report several problems. An empty
//! operand is a null: operators applied to it produce an empty result
//! without an error.

pub mod builtins;
mod error;
mod range;
mod value;

pub use builtins::{Builtin, Registry, registry};
pub use error::EvalError;
pub use range::{IntRange, RangeIter};
pub use value::{Sequence, Value};

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::{TextRange, constants};
use crate::hir::{
    Capability, ElementId, InProgress, ResolveCx, SemanticModel, VisibilityContext,
};
use crate::syntax::{
    BinaryOp, ClassifyOp, Direction, Expr, ExprKind, Literal, QualifiedRef, UnaryOp,
};

/// Deepest nesting of user-function calls before evaluation gives up.
const MAX_CALL_DEPTH: usize = 64;

/// One failed subexpression.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalFailure {
    pub range: TextRange,
    pub error: EvalError,
}

/// Outcome of evaluating an expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub values: Sequence,
    pub errors: Vec<EvalFailure>,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The values, or the first error.
    pub fn into_result(self) -> Result<Sequence, EvalError> {
        match self.errors.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(self.values),
        }
    }
}

/// Evaluate `expr` with names resolved from `context`. `subject` is what an
/// operand-less classification such as `@Safety` tests.
pub(crate) fn evaluate_in(
    model: &SemanticModel,
    expr: &Expr,
    context: ElementId,
    subject: Option<ElementId>,
    cx: &mut ResolveCx,
) -> Evaluation {
    let mut evaluator = Evaluator {
        model,
        cx,
        context,
        subject,
        bindings: FxHashMap::default(),
        call_depth: 0,
        errors: Vec::new(),
    };
    let values = evaluator.eval(expr);
    trace!(context = %context, values = %values, errors = evaluator.errors.len(), "evaluated expression");
    Evaluation {
        values,
        errors: evaluator.errors,
    }
}

struct Evaluator<'a, 'cx> {
    model: &'a SemanticModel,
    cx: &'cx mut ResolveCx,
    context: ElementId,
    subject: Option<ElementId>,
    /// Arguments bound to the parameters of the functions being called.
    bindings: FxHashMap<ElementId, Sequence>,
    call_depth: usize,
    errors: Vec<EvalFailure>,
}

impl Evaluator<'_, '_> {
    fn fail(&mut self, range: TextRange, error: EvalError) -> Sequence {
        trace!(?range, %error, "evaluation failure");
        self.errors.push(EvalFailure { range, error });
        Sequence::empty()
    }

    fn lift(&mut self, range: TextRange, result: Result<Sequence, EvalError>) -> Sequence {
        result.unwrap_or_else(|error| self.fail(range, error))
    }

    fn eval(&mut self, expr: &Expr) -> Sequence {
        match &expr.kind {
            ExprKind::Literal(literal) => literal_value(literal),
            ExprKind::Name(reference) => self.name(reference, expr.range),
            ExprKind::Member { base, member } => {
                let base = self.eval(base);
                let mut out = Sequence::empty();
                for value in base.iter() {
                    let Value::Ref(owner) = value else {
                        return self.fail(
                            expr.range,
                            EvalError::mismatch(".", format!("{} has no members", value.type_name())),
                        );
                    };
                    match self
                        .model
                        .lookup_member(owner, member.as_str(), Some(self.context), self.cx)
                    {
                        Some(found) => out = out.concat(self.element_value(found)),
                        None => {
                            return self.fail(expr.range, EvalError::UnresolvedName(member.text.to_string()));
                        }
                    }
                }
                out
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand);
                let (package, name) = match op {
                    UnaryOp::Neg => (builtins::DATA_FUNCTIONS, "-"),
                    UnaryOp::Plus => (builtins::DATA_FUNCTIONS, "+"),
                    UnaryOp::Not | UnaryOp::BitNot => (builtins::BOOLEAN_FUNCTIONS, "not"),
                };
                self.builtin(package, name, &[operand], expr.range)
            }
            ExprKind::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, expr.range),
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.eval(cond);
                match self.condition(&cond, "if", expr.range) {
                    Some(true) => self.eval(then),
                    Some(false) => self.eval(otherwise),
                    None => Sequence::empty(),
                }
            }
            ExprKind::Classify { op, operand, ty } => {
                self.classify(*op, operand.as_deref(), ty, expr.range)
            }
            ExprKind::Invoke { callee, args } => self.invoke(callee, args, expr.range),
            ExprKind::Sequence(items) => items
                .iter()
                .fold(Sequence::empty(), |acc, item| acc.concat(self.eval(item))),
            ExprKind::Index { base, index } => {
                let base = self.eval(base);
                let index = self.eval(index);
                self.builtin(builtins::SEQUENCE_FUNCTIONS, "#", &[base, index], expr.range)
            }
        }
    }

    fn builtin(&mut self, package: &str, name: &str, args: &[Sequence], range: TextRange) -> Sequence {
        match registry().get(package, name) {
            Some(builtin) => {
                let result = builtin.call(args);
                self.lift(range, result)
            }
            None => self.fail(range, EvalError::UnknownFunction(format!("{package}::{name}"))),
        }
    }

    /// A single boolean, `None` for a null or after recording a failure.
    fn condition(&mut self, values: &Sequence, op: &str, range: TextRange) -> Option<bool> {
        match values.len() {
            0 => None,
            1 => match values.first() {
                Some(Value::Bool(b)) => Some(b),
                Some(Value::Ref(_)) => {
                    self.fail(range, EvalError::NotEvaluable(op.to_string()));
                    None
                }
                Some(other) => {
                    self.fail(
                        range,
                        EvalError::mismatch(op, format!("expected a Boolean, got {}", other.type_name())),
                    );
                    None
                }
                None => None,
            },
            n => {
                self.fail(range, EvalError::mismatch(op, format!("expected a single value, got {n}")));
                None
            }
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, range: TextRange) -> Sequence {
        let symbol = op.symbol();
        match op {
            BinaryOp::And | BinaryOp::Or | BinaryOp::Implies => {
                let lhs = self.eval(lhs);
                let Some(left) = self.condition(&lhs, symbol, range) else {
                    return Sequence::empty();
                };
                let decided = match op {
                    BinaryOp::And => (!left).then_some(false),
                    BinaryOp::Or => left.then_some(true),
                    _ => (!left).then_some(true),
                };
                if let Some(decided) = decided {
                    return Sequence::single(decided);
                }
                let rhs = self.eval(rhs);
                self.condition(&rhs, symbol, range)
                    .map(Sequence::single)
                    .unwrap_or_default()
            }
            BinaryOp::NullCoalesce => {
                let lhs = self.eval(lhs);
                if lhs.is_empty() { self.eval(rhs) } else { lhs }
            }
            _ => {
                let package = match op {
                    BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Same | BinaryOp::NotSame => {
                        builtins::BASE_FUNCTIONS
                    }
                    BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::Xor => builtins::BOOLEAN_FUNCTIONS,
                    BinaryOp::Range => builtins::INTEGER_FUNCTIONS,
                    _ => builtins::DATA_FUNCTIONS,
                };
                let args = [self.eval(lhs), self.eval(rhs)];
                self.builtin(package, symbol, &args, range)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------------

    fn name(&mut self, reference: &QualifiedRef, range: TextRange) -> Sequence {
        let Some(found) = self
            .model
            .resolve_qualified(reference, Some(self.context), self.cx)
        else {
            return self.fail(range, EvalError::UnresolvedName(reference.to_string()));
        };
        if let Some(bound) = self.bindings.get(&found) {
            return bound.clone();
        }
        if let Some(values) = self.metadata_attribute(found) {
            return values;
        }
        self.element_value(found)
    }

    /// The value of a feature with a bound value, otherwise a reference to
    /// the element. Failures inside the bound value belong to that feature
    /// and are not reported here.
    fn element_value(&mut self, id: ElementId) -> Sequence {
        let Some(element) = self.model.graph().get(id) else {
            return Sequence::empty();
        };
        let Some(value) = element.value.clone().filter(|_| element.kind.is_feature()) else {
            return Sequence::single(Value::Ref(id));
        };
        let Some(frame) = self.cx.enter(InProgress::Value(id)) else {
            trace!(feature = %id, "cyclic value");
            return Sequence::empty();
        };
        let outer = std::mem::replace(&mut self.context, id);
        let reported = self.errors.len();
        let values = self.eval(&value);
        self.errors.truncate(reported);
        self.context = outer;
        self.cx.exit(frame);
        values
    }

    /// Inside an import filter, an attribute of a metadata definition reads
    /// the same attribute of the metadata applied to the candidate.
    fn metadata_attribute(&mut self, feature: ElementId) -> Option<Sequence> {
        let subject = self.subject?;
        let definition = self.model.graph().owner(feature)?;
        let is_metadata_definition = self
            .model
            .graph()
            .get(definition)
            .is_some_and(|e| e.kind.is_type() && e.kind.has(Capability::Metadata));
        if !is_metadata_definition {
            return None;
        }
        let name = self.model.effective_name_in(feature, self.cx)?;
        for metadata in self.model.applied_metadata(subject) {
            let typed = self
                .model
                .types_of_in(metadata, self.cx)
                .into_iter()
                .any(|ty| self.model.conforms_in(ty, definition, self.cx));
            if !typed {
                continue;
            }
            let scope = self
                .model
                .scope_in(metadata, VisibilityContext::Own, self.cx);
            if let Some(attribute) = scope.get(&name) {
                return Some(self.element_value(attribute));
            }
        }
        Some(Sequence::empty())
    }

    // ------------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------------

    fn invoke(&mut self, callee: &QualifiedRef, args: &[Expr], range: TextRange) -> Sequence {
        let args: Vec<Sequence> = args.iter().map(|arg| self.eval(arg)).collect();
        let function = self
            .model
            .resolve_qualified(callee, Some(self.context), self.cx);

        if let Some(function) = function {
            if let Some(builtin) = self.library_builtin(function) {
                let result = builtin.call(&args);
                return self.lift(range, result);
            }
            if let Some(values) = self.call_user_function(function, args.clone(), range) {
                return values;
            }
        }

        match registry().by_name(callee.last().as_str()) {
            Some(builtin) => {
                let result = builtin.call(&args);
                self.lift(range, result)
            }
            None => self.fail(range, EvalError::UnknownFunction(callee.to_string())),
        }
    }

    /// The built-in implementing a function declared in a library package.
    fn library_builtin(&self, function: ElementId) -> Option<&'static Builtin> {
        let graph = self.model.graph();
        let element = graph.get(function)?;
        if !element.document.is_library() {
            return None;
        }
        let package = graph.get(element.owner?)?;
        if !package.kind.has(Capability::Package) {
            return None;
        }
        registry().get(package.name.as_deref()?, element.name.as_deref()?)
    }

    /// Bind `args` to the input parameters of `function` and evaluate its
    /// result expression. `None` if it has none.
    fn call_user_function(
        &mut self,
        function: ElementId,
        args: Vec<Sequence>,
        range: TextRange,
    ) -> Option<Sequence> {
        let graph = self.model.graph();
        let element = graph.get(function)?;
        let result = element.result.clone()?;
        if self.call_depth >= MAX_CALL_DEPTH {
            let name = element.name.clone().unwrap_or_else(|| SmolStr::new_static("<anonymous>"));
            return Some(self.fail(range, EvalError::RecursionLimit(name.to_string())));
        }
        let params: Vec<ElementId> = element
            .members
            .iter()
            .copied()
            .filter(|&m| {
                graph.get(m).is_some_and(|p| {
                    p.feature.as_ref().is_some_and(|f| {
                        matches!(f.direction, Some(Direction::In | Direction::InOut))
                    })
                })
            })
            .collect();
        if params.len() != args.len() {
            let name = element.name.clone().unwrap_or_default();
            return Some(self.fail(
                range,
                EvalError::ArgumentCount {
                    name,
                    expected: "as many as declared parameters",
                    found: args.len(),
                },
            ));
        }

        let saved: Vec<(ElementId, Option<Sequence>)> = params
            .iter()
            .zip(args)
            .map(|(&param, arg)| (param, self.bindings.insert(param, arg)))
            .collect();
        let outer = std::mem::replace(&mut self.context, function);
        self.call_depth += 1;
        let values = self.eval(&result);
        self.call_depth -= 1;
        self.context = outer;
        for (param, previous) in saved {
            match previous {
                Some(previous) => self.bindings.insert(param, previous),
                None => self.bindings.remove(&param),
            };
        }
        Some(values)
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    fn classify(
        &mut self,
        op: ClassifyOp,
        operand: Option<&Expr>,
        ty: &QualifiedRef,
        range: TextRange,
    ) -> Sequence {
        let values = match operand {
            Some(operand) => self.eval(operand),
            None => match self.subject {
                Some(subject) => Sequence::single(Value::Ref(subject)),
                None => {
                    return self.fail(range, EvalError::NotEvaluable(op.symbol().to_string()));
                }
            },
        };
        let Some(target) = self.model.resolve_qualified(ty, Some(self.context), self.cx) else {
            return self.fail(range, EvalError::UnresolvedName(ty.to_string()));
        };
        if values.is_empty() {
            return Sequence::empty();
        }

        let model = self.model;
        match op {
            ClassifyOp::As => values
                .iter()
                .filter(|v| self.is_type(v, target))
                .collect(),
            ClassifyOp::Meta => values
                .iter()
                .filter_map(|v| v.as_element())
                .flat_map(|e| model.applied_metadata(e))
                .filter(|&m| self.has_metadata_type(m, target))
                .map(Value::Ref)
                .collect(),
            _ => {
                let all = values.iter().all(|v| match op {
                    ClassifyOp::HasType => self.value_types(&v).contains(&target),
                    ClassifyOp::IsType => self.is_type(&v, target),
                    ClassifyOp::Classifies => {
                        self.is_type(&v, target) || self.has_metadata(&v, target)
                    }
                    _ => self.is_metaclass(&v, target) || self.has_metadata(&v, target),
                });
                Sequence::single(all)
            }
        }
    }

    /// Types of a value: the scalar type of a literal, the types of a
    /// feature, nothing for other elements.
    fn value_types(&mut self, value: &Value) -> Vec<ElementId> {
        let scalar = match value {
            Value::Bool(_) => constants::BOOLEAN,
            Value::Int(_) | Value::Infinity => constants::INTEGER,
            Value::Real(_) => constants::REAL,
            Value::String(_) => constants::STRING,
            Value::Ref(id) => {
                let is_feature = self
                    .model
                    .graph()
                    .get(*id)
                    .is_some_and(|e| e.kind.is_feature());
                return if is_feature {
                    self.model.types_of_in(*id, self.cx)
                } else {
                    Vec::new()
                };
            }
        };
        self.model.lookup_qualified_in(scalar, self.cx).into_iter().collect()
    }

    fn is_type(&mut self, value: &Value, target: ElementId) -> bool {
        self.value_types(value)
            .into_iter()
            .any(|ty| self.model.conforms_in(ty, target, self.cx))
    }

    fn has_metadata_type(&mut self, metadata: ElementId, target: ElementId) -> bool {
        self.model
            .types_of_in(metadata, self.cx)
            .into_iter()
            .any(|ty| self.model.conforms_in(ty, target, self.cx))
    }

    fn has_metadata(&mut self, value: &Value, target: ElementId) -> bool {
        let Some(element) = value.as_element() else {
            return false;
        };
        self.model
            .applied_metadata(element)
            .into_iter()
            .any(|m| self.has_metadata_type(m, target))
    }

    /// Whether the element's metaclass is `target` or specializes it.
    fn is_metaclass(&self, value: &Value, target: ElementId) -> bool {
        let graph = self.model.graph();
        let (Some(element), Some(name)) = (
            value.as_element().and_then(|id| graph.get(id)),
            graph.get(target).and_then(|t| t.name.as_deref()),
        ) else {
            return false;
        };
        element.kind.metaclass_ancestry().contains(&name)
    }
}

fn literal_value(literal: &Literal) -> Sequence {
    match literal {
        Literal::Bool(b) => Sequence::single(*b),
        Literal::Integer(i) => Sequence::single(*i),
        Literal::Real(r) => Sequence::single(*r),
        Literal::String(s) => Sequence::single(Value::String(s.clone())),
        Literal::Null => Sequence::empty(),
        Literal::Infinity => Sequence::single(Value::Infinity),
    }
}
