//! Diagnostic assertions.

use syster::base::FileId;
use syster::hir::{Diagnostic, DiagnosticKind};
use syster::ide::AnalysisHost;

pub fn diagnostics(host: &AnalysisHost, path: &str) -> Vec<Diagnostic> {
    let file: FileId = host
        .file_id(path)
        .unwrap_or_else(|| panic!("no document '{path}'"));
    host.analysis().diagnostics(file)
}

/// Diagnostics carrying `code`.
pub fn with_code<'a>(diagnostics: &'a [Diagnostic], code: &str) -> Vec<&'a Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some(code))
        .collect()
}

pub fn of_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.kind == kind).collect()
}

pub fn assert_clean(host: &AnalysisHost, path: &str) {
    let found = diagnostics(host, path);
    assert!(found.is_empty(), "unexpected diagnostics in '{path}': {found:#?}");
}
