//! Loading documents and the standard library from disk.

use std::path::PathBuf;

use thiserror::Error;

pub mod file_loader;
mod stdlib;

pub use stdlib::{LibraryDocument, StdLib, StdLibSource};

/// Why documents could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("unsupported file extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),
}
