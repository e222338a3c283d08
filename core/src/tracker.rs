use std::collections::HashMap;
use std::collections::hash_map::Entry;

use deepfreeze_types::Path;

use crate::Handle;

/// Identity set for one freeze traversal.
///
/// Records the path at which each composite handle was first entered. Entries are never
/// removed, so any second sighting of a handle counts, whether it is a back-edge to an
/// ancestor or a shared reference from a sibling branch. Equal-but-distinct objects have
/// different handles and are never confused.
#[derive(Debug, Default)]
pub struct CycleTracker {
    visited: HashMap<Handle, Path>,
}

impl CycleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` at `path`.
    ///
    /// Returns the original path if the handle was already registered; the existing entry is
    /// left unchanged.
    pub fn register(&mut self, handle: Handle, path: &Path) -> Option<Path> {
        match self.visited.entry(handle) {
            Entry::Occupied(first) => Some(first.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(path.clone());
                None
            }
        }
    }

    #[must_use]
    pub fn first_seen(&self, handle: Handle) -> Option<&Path> {
        self.visited.get(&handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
