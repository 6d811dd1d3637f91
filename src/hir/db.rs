//! Salsa database for per-document parsing.
//!
//! Parsing is the only per-document computation that does not depend on
//! other documents, so it is the part kept in salsa: a changed text
//! re-parses exactly one document. Cross-document resolution lives in
//! [`SemanticModel`](super::SemanticModel), whose own caches are invalidated
//! from the documents that were re-lowered.

use std::sync::Arc;

use crate::base::FileId;
use crate::syntax::{FileExtension, ParseError, SyntaxFile};

// ============================================================================
// INPUTS
// ============================================================================

/// Input: the text of one document.
///
/// Set this explicitly when a document is opened or changed.
#[salsa::input]
pub struct FileText {
    pub file: FileId,
    pub extension: FileExtension,
    #[return_ref]
    pub text: String,
}

// ============================================================================
// DATABASE
// ============================================================================

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {
    fn salsa_event(&self, _event: &dyn Fn() -> salsa::Event) {}
}

impl RootDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// PARSE RESULT
// ============================================================================

/// A parsed document.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult {
    pub file: FileId,
    pub syntax: Arc<SyntaxFile>,
}

// Real literals make the tree only `PartialEq`; salsa needs `Eq` to decide
// whether dependents must be recomputed.
impl Eq for ParseResult {}

impl ParseResult {
    pub fn errors(&self) -> &[ParseError] {
        self.syntax.errors()
    }

    pub fn has_errors(&self) -> bool {
        self.syntax.has_errors()
    }
}

// ============================================================================
// TRACKED QUERIES
// ============================================================================

/// Parse a document. Memoized until its `FileText` changes.
#[salsa::tracked]
pub fn parse_file(db: &dyn salsa::Database, file_text: FileText) -> ParseResult {
    let file = file_text.file(db);
    let syntax = SyntaxFile::new(file_text.text(db), file_text.extension(db));
    tracing::debug!(%file, errors = syntax.errors().len(), "parsed document");
    ParseResult {
        file,
        syntax: Arc::new(syntax),
    }
}
