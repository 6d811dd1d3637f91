//! Hosts and lookups used across test modules.

use syster::base::FileId;
use syster::eval::Evaluation;
use syster::hir::{ElementId, Scope, VisibilityContext};
use syster::ide::{AnalysisHost, EngineOptions};

/// A host without a standard library, holding the given documents.
pub fn host_with(files: &[(&str, &str)]) -> AnalysisHost {
    let mut host = AnalysisHost::with_options(&EngineOptions::new().without_stdlib())
        .expect("a disabled library always loads");
    for (path, content) in files {
        add_clean(&mut host, path, content);
    }
    host
}

/// A host with the embedded standard library, holding the given documents.
pub fn host_with_stdlib(files: &[(&str, &str)]) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    for (path, content) in files {
        add_clean(&mut host, path, content);
    }
    host
}

/// A host without a library holding one SysML document.
pub fn sysml_host(source: &str) -> AnalysisHost {
    host_with(&[("test.sysml", source)])
}

/// A host without a library holding one KerML document.
pub fn kerml_host(source: &str) -> AnalysisHost {
    host_with(&[("test.kerml", source)])
}

fn add_clean(host: &mut AnalysisHost, path: &str, content: &str) -> FileId {
    let file = host.set_file_content(path, content);
    let errors = host.analysis().syntax_errors(file);
    assert!(errors.is_empty(), "syntax errors in '{path}': {errors:?}");
    file
}

/// The element a fully qualified name designates, panicking if none does.
pub fn lookup(host: &AnalysisHost, qualified_name: &str) -> ElementId {
    host.analysis()
        .lookup(qualified_name)
        .unwrap_or_else(|| panic!("'{qualified_name}' does not resolve"))
}

/// The scope of `qualified_name` as seen from inside it.
pub fn own_scope(host: &AnalysisHost, qualified_name: &str) -> Scope {
    let id = lookup(host, qualified_name);
    (*host.analysis().scope(id, VisibilityContext::Own)).clone()
}

/// Names of a scope, sorted.
pub fn sorted_names(scope: &Scope) -> Vec<String> {
    let mut names: Vec<String> = scope.names().map(str::to_string).collect();
    names.sort();
    names
}

/// Qualified names of a list of elements, in order.
pub fn qualified_names(host: &AnalysisHost, ids: &[ElementId]) -> Vec<String> {
    let model = host.analysis().model();
    ids.iter()
        .map(|&id| model.qualified_name(id).unwrap_or_else(|| format!("<{id}>")))
        .collect()
}

/// Evaluate `source` inside the element named `context`.
pub fn evaluate_in(host: &AnalysisHost, context: &str, source: &str) -> Evaluation {
    let id = lookup(host, context);
    host.analysis()
        .evaluate_text(source, id)
        .unwrap_or_else(|errors| panic!("'{source}' does not parse: {errors:?}"))
}

/// Evaluate `source` at the root of the document at `path`.
pub fn evaluate_at_root(host: &AnalysisHost, path: &str, source: &str) -> Evaluation {
    let analysis = host.analysis();
    let root = host
        .file_id(path)
        .and_then(|file| analysis.document_root(file))
        .unwrap_or_else(|| panic!("no document '{path}'"));
    analysis
        .evaluate_text(source, root)
        .unwrap_or_else(|errors| panic!("'{source}' does not parse: {errors:?}"))
}
