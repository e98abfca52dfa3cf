//! Scroll anchors for rendered documents.
//!
//! The collection view registers one anchor per document when it mounts and
//! releases them when it unmounts. Navigation asks the registry where to
//! scroll; an id with no anchor just means "not on screen".

use std::collections::HashMap;

use crate::flat_row::ROW_HEIGHT;

/// Where a document starts in the flattened row list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: usize,
}

impl Anchor {
    /// Vertical offset that puts the anchor at the top of the viewport
    pub fn offset(&self) -> f32 {
        self.row as f32 * ROW_HEIGHT
    }
}

#[derive(Debug, Default)]
pub struct AnchorRegistry {
    anchors: HashMap<String, Anchor>,
}

impl AnchorRegistry {
    pub fn register(&mut self, id: impl Into<String>, anchor: Anchor) {
        self.anchors.insert(id.into(), anchor);
    }

    pub fn unregister(&mut self, id: &str) -> Option<Anchor> {
        self.anchors.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Anchor> {
        self.anchors.get(id).copied()
    }

    /// Offset to scroll to, or None when nothing is registered for `id`
    pub fn scroll_to(&self, id: &str) -> Option<f32> {
        self.get(id).map(|anchor| anchor.offset())
    }

    /// Release every anchor
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }
}
