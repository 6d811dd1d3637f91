//! Element identities.

use std::fmt;

/// Identity of an element in the [`ElementGraph`](super::ElementGraph).
///
/// An id is an index into the graph's arena plus the generation of the slot
/// at the time the element was created. Replacing a document frees its slots
/// and bumps their generation, so ids held across a replacement stop
/// resolving instead of pointing at whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
