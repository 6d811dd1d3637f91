//! Expression syntax nodes.
//!
//! Expressions are kept as a plain tree and evaluated directly by
//! [`crate::eval`]; there is no separate lowering or compilation step.

use smol_str::SmolStr;

use super::ast::{Ident, QualifiedRef};
use crate::base::TextRange;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    /// A numeric literal written with a decimal point or an exponent.
    Real(f64),
    String(SmolStr),
    /// `null` or `()`: the empty sequence.
    Null,
    /// `*`
    Infinity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `not x`
    Not,
    /// `~x`
    BitNot,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "not",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Same,
    NotSame,
    /// `&`, both operands evaluated
    BitAnd,
    /// `|`, both operands evaluated
    BitOr,
    Xor,
    /// `and`, right operand evaluated only when the left is true
    And,
    /// `or`, right operand evaluated only when the left is false
    Or,
    Implies,
    /// `??`
    NullCoalesce,
    /// `..`
    Range,
}

impl BinaryOp {
    /// The operator name as declared in the standard library.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Same => "===",
            BinaryOp::NotSame => "!==",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::Xor => "xor",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Implies => "implies",
            BinaryOp::NullCoalesce => "??",
            BinaryOp::Range => "..",
        }
    }
}

/// Classification operators, all taking a type reference on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifyOp {
    HasType,
    IsType,
    /// `@`
    Classifies,
    /// `@@`
    MetaClassifies,
    As,
    Meta,
}

impl ClassifyOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ClassifyOp::HasType => "hastype",
            ClassifyOp::IsType => "istype",
            ClassifyOp::Classifies => "@",
            ClassifyOp::MetaClassifies => "@@",
            ClassifyOp::As => "as",
            ClassifyOp::Meta => "meta",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A (possibly qualified) name.
    Name(QualifiedRef),
    /// `base.member`
    Member { base: Box<Expr>, member: Ident },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `if cond ? then else otherwise`
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `operand op Type`; without an operand the subject of the evaluation
    /// (e.g. the candidate of an import filter) is classified.
    Classify {
        op: ClassifyOp,
        operand: Option<Box<Expr>>,
        ty: QualifiedRef,
    },
    /// `F(a, b)`
    Invoke { callee: QualifiedRef, args: Vec<Expr> },
    /// `(a, b, c)`
    Sequence(Vec<Expr>),
    /// `base[index]` or `base#(index)`, 1-based.
    Index { base: Box<Expr>, index: Box<Expr> },
}

impl Expr {
    pub fn new(kind: ExprKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Every name referenced by this expression, in source order.
    pub fn references(&self) -> Vec<&QualifiedRef> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a QualifiedRef>) {
        match &self.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Name(r) => out.push(r),
            ExprKind::Member { base, .. } => base.collect_references(out),
            ExprKind::Unary { operand, .. } => operand.collect_references(out),
            ExprKind::Binary { lhs, rhs, .. } => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                cond.collect_references(out);
                then.collect_references(out);
                otherwise.collect_references(out);
            }
            ExprKind::Classify { operand, ty, .. } => {
                if let Some(operand) = operand {
                    operand.collect_references(out);
                }
                out.push(ty);
            }
            ExprKind::Invoke { callee, args } => {
                out.push(callee);
                for arg in args {
                    arg.collect_references(out);
                }
            }
            ExprKind::Sequence(items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            ExprKind::Index { base, index } => {
                base.collect_references(out);
                index.collect_references(out);
            }
        }
    }
}
