//! # syster-semantics
//!
//! Semantic resolution engine for KerML and SysML v2 models: links parsed
//! documents into an element graph, computes the names visible in every
//! namespace, and evaluates model-level expressions.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → AnalysisHost / Analysis facade, cancellation
//!   ↓
//! eval      → Expression evaluation, built-in function registry
//!   ↓
//! hir       → Element graph, scopes, resolution, diagnostics
//!   ↓
//! project   → Standard library and file loading
//!   ↓
//! syntax    → Syntax tree types, ParseError
//!   ↓
//! parser    → Logos lexer, recursive-descent parser
//!   ↓
//! base      → Primitives (FileId, TextRange, LineIndex, constants)
//! ```

/// Foundation types: FileId, TextRange, LineIndex, constants
pub mod base;

/// Parser: Logos lexer and recursive-descent parser
pub mod parser;

/// Syntax: tree types handed to the semantic layer
pub mod syntax;

/// Standard library and file loading
pub mod project;

/// High-level IR: element graph and semantic resolution
pub mod hir;

/// Model-level expression evaluation
pub mod eval;

/// Engine facade: AnalysisHost, Analysis
pub mod ide;

pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use eval::{EvalError, Evaluation, IntRange, Sequence, Value};
pub use hir::{Diagnostic, ElementId, ElementKind, Scope, SemanticModel, VisibilityContext};
pub use ide::{Analysis, AnalysisHost, EngineOptions};
pub use project::{StdLib, StdLibSource};
