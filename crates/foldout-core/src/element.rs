//! Element identity and the host element registry.
//!
//! The engine never touches a concrete rendering tree. Host elements
//! (triggers, panels, overlay contents, focusable items) are referred to by
//! [`ElementId`], an opaque key minted by an [`ElementRegistry`] that the
//! embedding host owns and scopes explicitly. There is no process-wide
//! registry instance.
//!
//! Besides identity, the registry records each element's parent, which lets
//! a host compute the full dispatch path of a pointer event
//! ([`ElementRegistry::dispatch_path`]), the ingredient outside-click
//! detection needs.
//!
//! # Example
//!
//! ```
//! use foldout_core::ElementRegistry;
//!
//! let mut registry = ElementRegistry::new();
//!
//! let root = registry.insert(None);
//! let trigger = registry.insert(Some(root));
//! let content = registry.insert(Some(root));
//! let item = registry.insert(Some(content));
//!
//! // Innermost element first, then its ancestors up to the root.
//! assert_eq!(registry.dispatch_path(item), vec![item, content, root]);
//! # let _ = trigger;
//! ```

use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::error::ElementError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a host element.
    ///
    /// Ids are minted by an [`ElementRegistry`] and stay unique for the
    /// registry's lifetime: a removed element's id is never reported as
    /// present again, even if its slot is reused.
    pub struct ElementId;
}

/// Per-element bookkeeping.
#[derive(Debug, Clone, Copy)]
struct ElementEntry {
    /// Parent element, if any.
    parent: Option<ElementId>,
}

/// An explicitly scoped registry of host elements.
///
/// The registry is the source of element identity for one rendering
/// surface. It tracks parent links only; geometry, visibility, and focus
/// stay with the host.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: SlotMap<ElementId, ElementEntry>,
}

impl ElementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
        }
    }

    /// Insert a new element, optionally under a parent.
    ///
    /// A missing parent id is tolerated: the element is inserted as a root.
    pub fn insert(&mut self, parent: Option<ElementId>) -> ElementId {
        let parent = parent.filter(|p| self.elements.contains_key(*p));
        let id = self.elements.insert(ElementEntry { parent });
        trace!(target: targets::ELEMENT, ?id, ?parent, "element inserted");
        id
    }

    /// Remove an element.
    ///
    /// Children are re-parented to the removed element's parent so their
    /// dispatch paths stay connected. Removing an unknown id is a no-op and
    /// returns `false`, so teardown code may run more than once.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(entry) = self.elements.remove(id) else {
            return false;
        };

        for other in self.elements.values_mut() {
            if other.parent == Some(id) {
                other.parent = entry.parent;
            }
        }

        trace!(target: targets::ELEMENT, ?id, "element removed");
        true
    }

    /// Check whether an element is present.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Get an element's parent.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.parent)
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Collect an element's ancestors, from the immediate parent to the root.
    pub fn ancestors(&self, id: ElementId) -> Result<Vec<ElementId>, ElementError> {
        if !self.elements.contains_key(id) {
            return Err(ElementError::UnknownElement);
        }

        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            chain.push(parent_id);
            current = self.parent(parent_id);
        }
        Ok(chain)
    }

    /// Build the dispatch path for an event that originated at `id`:
    /// the element itself, then its ancestors up to the root.
    ///
    /// Returns an empty path for an unknown id.
    pub fn dispatch_path(&self, id: ElementId) -> Vec<ElementId> {
        let Ok(ancestors) = self.ancestors(id) else {
            return Vec::new();
        };

        let mut path = Vec::with_capacity(ancestors.len() + 1);
        path.push(id);
        path.extend(ancestors);
        path
    }
}

static_assertions::assert_impl_all!(ElementRegistry: Send, Sync);
