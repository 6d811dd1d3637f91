//! Foundation types for the Syster semantic engine.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`FileId`] - Identifier of a document (user file or library file)
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - Domain constants (file extensions, library names)
//!
//! This module has NO dependencies on other syster modules.

pub mod constants;
mod file_id;
mod position;

pub use file_id::FileId;
pub use position::{LineCol, LineIndex};
pub use text_size::{TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
