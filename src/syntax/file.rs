//! Parsed documents.

use std::path::Path;

use thiserror::Error;

use super::ast::Member;
use crate::base::{LineIndex, TextRange, constants};

/// Language of a document, chosen from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileExtension {
    SysML,
    KerML,
}

impl FileExtension {
    /// Detect the language from a path; anything that is not `.kerml` is
    /// treated as SysML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(constants::KERML_EXT) => FileExtension::KerML,
            _ => FileExtension::SysML,
        }
    }
}

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("invalid token '{0}'")]
    InvalidToken(String),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
}

/// A syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub range: TextRange,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// A parsed document: its top-level members plus any syntax errors.
///
/// Parsing always yields a tree; members that could not be parsed are
/// skipped and reported in [`SyntaxFile::errors`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxFile {
    pub(crate) members: Vec<Member>,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) extension: FileExtension,
    pub(crate) line_index: LineIndex,
}

impl SyntaxFile {
    /// Parse source code in the given language.
    pub fn new(source: &str, extension: FileExtension) -> Self {
        let (members, errors) = crate::parser::parse(source);
        Self {
            members,
            errors,
            extension,
            line_index: LineIndex::new(source),
        }
    }

    /// Parse a SysML document.
    pub fn sysml(source: &str) -> Self {
        Self::new(source, FileExtension::SysML)
    }

    /// Parse a KerML document.
    pub fn kerml(source: &str) -> Self {
        Self::new(source, FileExtension::KerML)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn extension(&self) -> FileExtension {
        self.extension
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}
