//! Collecting and parsing KerML/SysML files from disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::LoadError;
use crate::base::constants::SUPPORTED_EXTENSIONS;
use crate::syntax::{FileExtension, SyntaxFile};

/// Every `.kerml` and `.sysml` file under `dir`, sorted by path.
pub fn collect_file_paths(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && validate_extension(entry.path()).is_ok() {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// The language of `path`, or an error if its extension is not supported.
pub fn validate_extension(path: &Path) -> Result<FileExtension, LoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(FileExtension::from_path(path)),
        _ => Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    }
}

pub fn load_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `content` in the language `path` names.
pub fn parse_content(content: &str, path: &Path) -> Result<SyntaxFile, LoadError> {
    let extension = validate_extension(path)?;
    Ok(SyntaxFile::new(content, extension))
}

pub fn load_and_parse(path: &Path) -> Result<SyntaxFile, LoadError> {
    let extension = validate_extension(path)?;
    let content = load_file(path)?;
    Ok(SyntaxFile::new(&content, extension))
}
