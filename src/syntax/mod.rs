//! Syntax trees handed to the semantic layer.
//!
//! The parser produces a [`SyntaxFile`] per document: a tree of [`Member`]s
//! whose nodes carry [`TextRange`](crate::base::TextRange)s. Nothing in this
//! module resolves names; every reference is kept as a [`QualifiedRef`] until
//! the HIR links it.

mod ast;
mod expr;
mod file;

pub use ast::{
    AliasDecl, Bound, Decl, DeclKind, Direction, DocDecl, Ident, ImportDecl, ImportWildcard,
    MetadataDecl, Member, Multiplicity, QualifiedRef, RelClause, RelClauseKind, RelationshipDecl,
    StandaloneRelKind, Visibility,
};
pub use expr::{BinaryOp, ClassifyOp, Expr, ExprKind, Literal, UnaryOp};
pub use file::{FileExtension, ParseError, ParseErrorKind, SyntaxFile};
