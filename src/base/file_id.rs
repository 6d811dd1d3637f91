//! Document identifiers.

use std::fmt;

/// Identifies a single document known to the engine.
///
/// Library documents and user documents share one id space; the
/// [`crate::project::StdLib`] allocates its ids from [`FileId::LIBRARY_BASE`]
/// upwards so they never collide with ids handed out for workspace files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    /// First id reserved for standard library documents.
    pub const LIBRARY_BASE: u32 = 1 << 30;

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Id of the `index`-th library document.
    pub const fn library(index: u32) -> Self {
        Self(Self::LIBRARY_BASE + index)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this id belongs to a standard library document.
    pub const fn is_library(self) -> bool {
        self.0 >= Self::LIBRARY_BASE
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_library() {
            write!(f, "lib#{}", self.0 - Self::LIBRARY_BASE)
        } else {
            write!(f, "file#{}", self.0)
        }
    }
}
