//! High-level IR (HIR): the element graph and semantic resolution.
//!
//! ## Key Types
//!
//! - [`SemanticModel`] - element graph plus memoized resolution queries
//! - [`ElementGraph`] - owned storage of every element, per document
//! - [`Element`] / [`ElementKind`] - one model element and its metaclass
//! - [`Scope`] - ordered names visible in a namespace
//! - [`RootDatabase`] - salsa database memoizing per-document parsing
//!
//! ## Query Layers
//!
//! ```text
//! file_text(file)                 ← INPUT: raw source text
//!     │
//!     ▼
//! parse_file(file)                ← salsa, per document
//!     │
//!     ▼
//! lower_document(file)            ← element subgraph per document
//!     │
//!     ▼
//! direct_generals / all_generals  ← specialization closure
//!     │
//!     ▼
//! scope(ns, ctx)                  ← owned, inherited, imported names
//!     │
//!     ▼
//! resolve(element)                ← linked references + diagnostics
//! ```

mod db;
mod diagnostics;
mod element;
mod graph;
mod ids;
mod kind;
mod lower;
mod model;
mod resolve;
mod scope;

pub use db::{FileText, ParseResult, RootDatabase, parse_file};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticKind, RelatedInfo, Severity, codes,
};
pub use element::{
    AliasData, Element, ElementData, FeatureData, ImportData, RelEnd, RelationshipData,
};
pub use graph::{Document, ElementGraph};
pub use ids::ElementId;
pub use kind::{Capability, ElementKind, RelationshipKind};
pub use model::{Cancelled, SemanticModel};
pub use scope::{Origin, Scope, ScopeEntry, VisibilityContext};

pub(crate) use model::{InProgress, ResolveCx};
