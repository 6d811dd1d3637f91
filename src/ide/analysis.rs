//! AnalysisHost and Analysis: the owner of all engine state and read-only
//! snapshots over it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//! let file = host.set_file_content("vehicle.sysml", "package V { part def Car; }");
//!
//! let analysis = host.analysis();
//! let diagnostics = analysis.resolve_file(file, &CancellationToken::new())?;
//! ```

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use salsa::Setter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::base::FileId;
use crate::eval::Evaluation;
use crate::hir::{
    Cancelled, Diagnostic, Element, ElementId, FileText, RootDatabase, Scope, SemanticModel,
    VisibilityContext, parse_file,
};
use crate::parser::parse_expression;
use crate::project::{LoadError, StdLib, StdLibSource};
use crate::syntax::{Expr, FileExtension, ParseError};

/// How an engine is set up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub stdlib: StdLibSource,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taken from the environment (`SYSTER_STDLIB`).
    pub fn from_env() -> Self {
        Self {
            stdlib: StdLibSource::from_env(),
        }
    }

    pub fn with_stdlib(mut self, stdlib: StdLibSource) -> Self {
        self.stdlib = stdlib;
        self
    }

    pub fn without_stdlib(self) -> Self {
        self.with_stdlib(StdLibSource::Disabled)
    }
}

/// Owns all mutable state.
///
/// Apply changes with `set_file_content()` and `remove_file()`, then query
/// a consistent snapshot from `analysis()`.
pub struct AnalysisHost {
    db: RootDatabase,
    inputs: FxHashMap<FileId, FileText>,
    file_ids: FxHashMap<String, FileId>,
    file_paths: FxHashMap<FileId, String>,
    next_file: u32,
    model: SemanticModel,
    library: Option<Arc<StdLib>>,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHost {
    /// A host with the embedded standard library.
    pub fn new() -> Self {
        Self::with_library(Some(StdLib::embedded()))
    }

    pub fn with_options(options: &EngineOptions) -> Result<Self, LoadError> {
        Ok(Self::with_library(StdLib::load(&options.stdlib)?))
    }

    fn with_library(library: Option<Arc<StdLib>>) -> Self {
        let model = match &library {
            Some(library) => SemanticModel::with_library(library),
            None => SemanticModel::new(),
        };
        Self {
            db: RootDatabase::new(),
            inputs: FxHashMap::default(),
            file_ids: FxHashMap::default(),
            file_paths: FxHashMap::default(),
            next_file: 0,
            model,
            library,
        }
    }

    /// Set the text of a document, creating it if needed, and link it into
    /// the model. The document's language follows the path's extension.
    pub fn set_file_content(&mut self, path: &str, content: &str) -> FileId {
        let file = match self.file_ids.get(path) {
            Some(&file) => file,
            None => {
                let file = FileId::new(self.next_file);
                self.next_file += 1;
                self.file_ids.insert(path.to_string(), file);
                self.file_paths.insert(file, path.to_string());
                file
            }
        };

        let input = match self.inputs.get(&file) {
            Some(&input) => {
                if input.text(&self.db) == content {
                    debug!(%file, path, "content unchanged");
                    return file;
                }
                input.set_text(&mut self.db).to(content.to_string());
                input
            }
            None => {
                let extension = FileExtension::from_path(Path::new(path));
                let input = FileText::new(&self.db, file, extension, content.to_string());
                self.inputs.insert(file, input);
                input
            }
        };

        let parsed = parse_file(&self.db, input);
        self.model.set_document(file, &parsed.syntax);
        file
    }

    /// Drop a document. Returns whether it was known.
    pub fn remove_file(&mut self, path: &str) -> bool {
        let Some(file) = self.file_ids.remove(path) else {
            return false;
        };
        self.file_paths.remove(&file);
        self.inputs.remove(&file);
        self.model.remove_document(file)
    }

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.file_ids.get(path).copied()
    }

    pub fn file_path(&self, file: FileId) -> Option<&str> {
        self.file_paths.get(&file).map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn library(&self) -> Option<&StdLib> {
        self.library.as_deref()
    }

    /// A snapshot for querying.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            db: &self.db,
            inputs: &self.inputs,
            model: &self.model,
        }
    }
}

/// Read-only view of the engine.
#[derive(Clone, Copy)]
pub struct Analysis<'a> {
    db: &'a RootDatabase,
    inputs: &'a FxHashMap<FileId, FileText>,
    model: &'a SemanticModel,
}

impl<'a> Analysis<'a> {
    pub fn model(&self) -> &'a SemanticModel {
        self.model
    }

    pub fn element(&self, id: ElementId) -> Option<&'a Element> {
        self.model.element(id)
    }

    pub fn document_root(&self, file: FileId) -> Option<ElementId> {
        self.model.document_root(file)
    }

    /// Resolve a fully qualified name from the top level.
    pub fn lookup(&self, qualified_name: &str) -> Option<ElementId> {
        self.model.lookup_qualified(qualified_name)
    }

    pub fn syntax_errors(&self, file: FileId) -> Vec<ParseError> {
        self.inputs
            .get(&file)
            .map(|&input| parse_file(self.db, input).errors().to_vec())
            .unwrap_or_default()
    }

    fn syntax_diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        self.syntax_errors(file)
            .iter()
            .map(|error| Diagnostic::syntax(file, error))
            .collect()
    }

    /// Syntax and semantic diagnostics of a document. The token is checked
    /// between top-level members.
    pub fn resolve_file(
        &self,
        file: FileId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, Cancelled> {
        let mut diagnostics = self.syntax_diagnostics(file);
        diagnostics.extend(self.model.resolve_document(file, cancel)?);
        Ok(diagnostics)
    }

    /// `resolve_file` without cancellation.
    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        self.resolve_file(file, &CancellationToken::new())
            .unwrap_or_default()
    }

    /// Diagnostics of every user document, resolved in parallel.
    pub fn resolve_all(
        &self,
        cancel: &CancellationToken,
    ) -> Result<FxHashMap<FileId, Vec<Diagnostic>>, Cancelled> {
        let mut files: Vec<(FileId, Vec<Diagnostic>)> = self
            .inputs
            .keys()
            .map(|&file| (file, self.syntax_diagnostics(file)))
            .collect();
        let model = self.model;
        files
            .par_iter_mut()
            .try_for_each(|(file, diagnostics)| {
                diagnostics.extend(model.resolve_document(*file, cancel)?);
                Ok(())
            })?;
        info!(documents = files.len(), "workspace resolved");
        Ok(files.into_iter().collect())
    }

    /// Link an element's references and report its problems.
    pub fn resolve(&self, id: ElementId) -> Vec<Diagnostic> {
        self.model.resolve(id)
    }

    pub fn scope(&self, id: ElementId, ctx: VisibilityContext) -> Arc<Scope> {
        self.model.scope(id, ctx)
    }

    pub fn evaluate(&self, expr: &Expr, context: ElementId) -> Evaluation {
        self.model.evaluate(expr, context)
    }

    /// Parse `source` as an expression and evaluate it in `context`.
    pub fn evaluate_text(
        &self,
        source: &str,
        context: ElementId,
    ) -> Result<Evaluation, Vec<ParseError>> {
        let expr = parse_expression(source)?;
        Ok(self.model.evaluate(&expr, context))
    }
}
