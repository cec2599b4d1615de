//! Annotation store: the ordered log of items drawn over the feed.
//!
//! Insertion order is significant. It decides draw order, which marker is
//! "most recent" for hit priority, and each marker's displayed number. The
//! store is the single source of truth for rendering; a full redraw after any
//! mutation must reproduce exactly what a replay of the same appends and
//! removals would produce.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use crate::camera::Point;

pub use events::{Annotation, StrokeColor};

/// In-memory ordered store of annotation items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStore {
    items: Vec<Annotation>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item at the end and return its index.
    pub fn append(&mut self, item: Annotation) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Remove the item at `index`. Out-of-range indices are a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Annotation> {
        if index < self.items.len() { Some(self.items.remove(index)) } else { None }
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove the most recently appended item.
    pub fn undo(&mut self) -> Option<Annotation> {
        self.items.pop()
    }

    /// Extend the stroke at `index` with one more point.
    ///
    /// Returns `false` if there is no item there or it is not a stroke.
    pub fn push_point(&mut self, index: usize, point: Point) -> bool {
        match self.items.get_mut(index) {
            Some(Annotation::Stroke { points, .. }) => {
                points.push(point);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.items.get(index)
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Annotation] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of count markers currently in the store.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_marker()).count()
    }

    /// 1-based rank of the marker at `index` among markers, in store order.
    #[must_use]
    pub fn marker_rank(&self, index: usize) -> Option<usize> {
        if !self.items.get(index)?.is_marker() {
            return None;
        }
        Some(self.items[..=index].iter().filter(|item| item.is_marker()).count())
    }
}
