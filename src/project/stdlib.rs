//! The standard library: the documents every model implicitly builds on.
//!
//! The library shipped with the crate is compiled in and parsed once per
//! process. A different library can be loaded from a directory, and the
//! library can be disabled altogether for isolated tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{LoadError, file_loader};
use crate::base::{FileId, constants};
use crate::syntax::{FileExtension, SyntaxFile};

macro_rules! embedded {
    ($($file:literal),* $(,)?) => {
        &[$(($file, include_str!(concat!("../../library/", $file)))),*]
    };
}

/// Library sources compiled into the crate, in load order.
const EMBEDDED: &[(&str, &str)] = embedded![
    "Base.kerml",
    "Occurrences.kerml",
    "Objects.kerml",
    "Links.kerml",
    "Performances.kerml",
    "Transfers.kerml",
    "Metaobjects.kerml",
    "ScalarValues.kerml",
    "KerML.kerml",
    "BaseFunctions.kerml",
    "DataFunctions.kerml",
    "BooleanFunctions.kerml",
    "StringFunctions.kerml",
    "SequenceFunctions.kerml",
    "NumericalFunctions.kerml",
    "IntegerFunctions.kerml",
    "SysML.sysml",
    "Attributes.sysml",
    "Items.sysml",
    "Parts.sysml",
    "Ports.sysml",
    "Actions.sysml",
    "Connections.sysml",
    "Interfaces.sysml",
    "Constraints.sysml",
    "Calculations.sysml",
    "Metadata.sysml",
];

/// Where the standard library comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StdLibSource {
    /// The library compiled into the crate.
    #[default]
    Embedded,
    /// Every `.kerml` and `.sysml` file under a directory.
    Directory(PathBuf),
    /// No library: no implicit generals and no library names.
    Disabled,
}

impl StdLibSource {
    /// `Directory` if the `SYSTER_STDLIB` environment variable names one,
    /// `Embedded` otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(constants::STDLIB_ENV_VAR) {
            Some(dir) if !dir.is_empty() => StdLibSource::Directory(PathBuf::from(dir)),
            _ => StdLibSource::Embedded,
        }
    }
}

/// One parsed library document.
#[derive(Debug, Clone)]
pub struct LibraryDocument {
    file: FileId,
    path: PathBuf,
    syntax: Arc<SyntaxFile>,
}

impl LibraryDocument {
    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn syntax(&self) -> &SyntaxFile {
        &self.syntax
    }
}

/// A parsed standard library.
#[derive(Debug, Clone, Default)]
pub struct StdLib {
    documents: Vec<LibraryDocument>,
}

static EMBEDDED_LIBRARY: OnceLock<Arc<StdLib>> = OnceLock::new();

impl StdLib {
    /// The library compiled into the crate, parsed on first use.
    pub fn embedded() -> Arc<StdLib> {
        EMBEDDED_LIBRARY
            .get_or_init(|| {
                let documents = EMBEDDED
                    .par_iter()
                    .enumerate()
                    .map(|(index, (name, source))| {
                        let path = PathBuf::from(name);
                        let syntax = SyntaxFile::new(source, FileExtension::from_path(&path));
                        library_document(index, path, syntax)
                    })
                    .collect();
                let library = StdLib { documents };
                info!(documents = library.len(), "embedded standard library parsed");
                Arc::new(library)
            })
            .clone()
    }

    /// Parse every library file under `dir`.
    pub fn from_directory(dir: &Path) -> Result<StdLib, LoadError> {
        let paths = file_loader::collect_file_paths(dir).inspect_err(|err| {
            warn!(dir = %dir.display(), %err, "standard library directory unusable");
        })?;
        let documents = paths
            .into_par_iter()
            .enumerate()
            .map(|(index, path)| {
                let syntax = file_loader::load_and_parse(&path)?;
                Ok(library_document(index, path, syntax))
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        info!(dir = %dir.display(), documents = documents.len(), "standard library loaded");
        Ok(StdLib { documents })
    }

    /// Load the library `source` describes; `None` when it is disabled.
    pub fn load(source: &StdLibSource) -> Result<Option<Arc<StdLib>>, LoadError> {
        match source {
            StdLibSource::Embedded => Ok(Some(Self::embedded())),
            StdLibSource::Directory(dir) => Self::from_directory(dir).map(|lib| Some(Arc::new(lib))),
            StdLibSource::Disabled => Ok(None),
        }
    }

    pub fn documents(&self) -> &[LibraryDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The document loaded from `path`.
    pub fn document(&self, path: &Path) -> Option<&LibraryDocument> {
        self.documents.iter().find(|d| d.path == path)
    }
}

fn library_document(index: usize, path: PathBuf, syntax: SyntaxFile) -> LibraryDocument {
    for error in syntax.errors() {
        warn!(path = %path.display(), ?error.range, "library syntax error: {}", error.message());
    }
    debug!(path = %path.display(), members = syntax.members().len(), "library document parsed");
    LibraryDocument {
        file: FileId::library(index as u32),
        path,
        syntax: Arc::new(syntax),
    }
}
