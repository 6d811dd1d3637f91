//! Diagnostics: semantic error reporting.
//!
//! Nothing in the engine fails on bad input: unresolved references,
//! malformed relationships and failed evaluations all become
//! [`Diagnostic`]s while resolution continues with partial results.

use std::fmt;
use std::sync::Arc;

use crate::base::{FileId, TextRange};
use crate::syntax::ParseError;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// Which stage of analysis produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The document could not be parsed.
    Syntax,
    /// A cross reference has no target.
    Linking,
    /// A relationship or declaration is malformed.
    Structural,
    /// Evaluating an expression failed.
    Evaluation,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    pub range: TextRange,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub file: FileId,
    pub range: TextRange,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(
        file: FileId,
        range: TextRange,
        kind: DiagnosticKind,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file,
            range,
            severity: Severity::Error,
            kind,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        file: FileId,
        range: TextRange,
        kind: DiagnosticKind,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, range, kind, message)
        }
    }

    /// Diagnostic for a syntax error reported by the parser.
    pub fn syntax(file: FileId, error: &ParseError) -> Self {
        Self::error(file, error.range, DiagnosticKind::Syntax, error.message())
            .with_code(codes::SYNTAX_ERROR)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Semantic analysis errors (linking, structure, evaluation)
/// - **E0100-E0199**: Syntax errors
/// - **W0001-W0099**: Warnings
pub mod codes {
    /// Undefined reference (name not found).
    pub const UNDEFINED_REFERENCE: &str = "E0001";
    /// Duplicate definition.
    pub const DUPLICATE_DEFINITION: &str = "E0004";
    /// Invalid specialization relationship.
    pub const INVALID_SPECIALIZATION: &str = "E0006";
    /// Invalid redefinition.
    pub const INVALID_REDEFINITION: &str = "E0009";
    /// Constraint violation.
    pub const CONSTRAINT_VIOLATION: &str = "E0011";
    /// Invalid import statement.
    pub const INVALID_IMPORT: &str = "E0014";
    /// Union, intersection or difference with exactly one operand.
    pub const OPERAND_COUNT: &str = "E0015";
    /// More than one conjugation on a type.
    pub const MULTIPLE_CONJUGATIONS: &str = "E0016";
    /// Evaluating an expression failed.
    pub const EVALUATION_ERROR: &str = "E0020";

    /// Syntax error.
    pub const SYNTAX_ERROR: &str = "E0100";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while an element is checked.
#[derive(Clone, Debug)]
pub struct DiagnosticCollector {
    file: FileId,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector for diagnostics in `file`.
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an undefined reference error.
    pub fn undefined_reference(&mut self, range: TextRange, name: &str) {
        self.add(
            Diagnostic::error(
                self.file,
                range,
                DiagnosticKind::Linking,
                format!("undefined reference: '{name}'"),
            )
            .with_code(codes::UNDEFINED_REFERENCE),
        );
    }

    /// Add an unresolved import error.
    pub fn invalid_import(&mut self, range: TextRange, target: &str) {
        self.add(
            Diagnostic::error(
                self.file,
                range,
                DiagnosticKind::Linking,
                format!("cannot resolve import target '{target}'"),
            )
            .with_code(codes::INVALID_IMPORT),
        );
    }

    /// Add a duplicate definition error.
    pub fn duplicate_definition(&mut self, range: TextRange, name: &str, existing: TextRange) {
        self.add(
            Diagnostic::error(
                self.file,
                range,
                DiagnosticKind::Structural,
                format!("duplicate definition: '{name}' is already defined"),
            )
            .with_code(codes::DUPLICATE_DEFINITION)
            .with_related(RelatedInfo {
                file: self.file,
                range: existing,
                message: Arc::from(format!("previous definition of '{name}'")),
            }),
        );
    }

    /// Add a structural error with the given code.
    pub fn structural(&mut self, range: TextRange, code: &str, message: impl Into<Arc<str>>) {
        self.add(
            Diagnostic::error(self.file, range, DiagnosticKind::Structural, message)
                .with_code(code),
        );
    }

    /// Add an evaluation error.
    pub fn evaluation(&mut self, range: TextRange, message: impl Into<Arc<str>>) {
        self.add(
            Diagnostic::error(self.file, range, DiagnosticKind::Evaluation, message)
                .with_code(codes::EVALUATION_ERROR),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
