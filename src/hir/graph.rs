//! The element graph: a generation-checked arena of elements grouped by
//! document.
//!
//! Elements refer to each other only through [`ElementId`]s. Owners are
//! found through the `owner` index stored on each element, never through a
//! pointer, so replacing a document's subgraph cannot leave dangling or
//! cyclic ownership behind. When a document is replaced its slots are freed
//! and their generation is bumped; stale ids then resolve to `None`.

use std::collections::BTreeMap;

use super::element::Element;
use super::ids::ElementId;
use crate::base::FileId;

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// The elements one document contributed.
#[derive(Debug, Clone)]
pub struct Document {
    root: ElementId,
    elements: Vec<ElementId>,
    generation: u32,
}

impl Document {
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Incremented every time the document is replaced.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct ElementGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Ordered by `FileId`, so library documents come after user documents.
    documents: BTreeMap<FileId, Document>,
    revision: u64,
}

impl ElementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_mut()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Allocate a slot and store the element `build` creates for its id.
    pub(crate) fn alloc(&mut self, build: impl FnOnce(ElementId) -> Element) -> ElementId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = ElementId::new(index, slot.generation);
        slot.element = Some(build(id));
        id
    }

    fn free_elements(&mut self, elements: &[ElementId]) {
        for id in elements {
            if let Some(slot) = self.slots.get_mut(id.index() as usize)
                && slot.generation == id.generation()
            {
                slot.element = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index());
            }
        }
    }

    /// Free every element of `file` and register a new subgraph built by
    /// `build`, which receives the graph and must return the new root and
    /// the ids it allocated.
    pub(crate) fn replace_document(
        &mut self,
        file: FileId,
        build: impl FnOnce(&mut Self) -> (ElementId, Vec<ElementId>),
    ) -> &Document {
        let generation = match self.documents.remove(&file) {
            Some(old) => {
                self.free_elements(&old.elements);
                old.generation + 1
            }
            None => 0,
        };
        let (root, elements) = build(self);
        self.revision += 1;
        self.documents.entry(file).or_insert(Document {
            root,
            elements,
            generation,
        })
    }

    /// Drop a document and all of its elements. Returns whether it existed.
    pub(crate) fn remove_document(&mut self, file: FileId) -> bool {
        match self.documents.remove(&file) {
            Some(old) => {
                self.free_elements(&old.elements);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn document(&self, file: FileId) -> Option<&Document> {
        self.documents.get(&file)
    }

    pub fn document_root(&self, file: FileId) -> Option<ElementId> {
        self.documents.get(&file).map(Document::root)
    }

    /// All documents in `FileId` order.
    pub fn documents(&self) -> impl Iterator<Item = (FileId, &Document)> {
        self.documents.iter().map(|(file, doc)| (*file, doc))
    }

    /// Incremented on every document change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Every live element.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().filter_map(|slot| slot.element.as_ref())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn owner(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.owner
    }

    /// Owned members of `id`, empty for stale ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.members.as_slice()).unwrap_or(&[])
    }

    /// Owners of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.owner(id), move |&current| self.owner(current))
    }

    /// Whether `ancestor` owns `id` directly or transitively, or is `id`.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        ancestor == id || self.ancestors(id).any(|a| a == ancestor)
    }
}
