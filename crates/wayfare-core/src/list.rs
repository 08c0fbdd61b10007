//! Ordered list editing primitive.

use serde::{Deserialize, Serialize};

/// An explicit indexed sequence with append and remove-by-index operations.
///
/// Ordered collection fields (inclusions, exclusions, equipment,
/// deliverables, itinerary steps) use this instead of ad hoc `Vec` splicing
/// so positional edits stay uniform across the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

// Manual impl: the derive would demand `T: Default`, which item types
// like `ItineraryStep` do not provide.
impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> OrderedList<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item at the end.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`, shifting later items down.
    /// Returns `None` when the index is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Returns the item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Borrows the items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Reindexes every item in place, passing its zero-based position.
    pub fn reindex(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for (position, item) in self.items.iter_mut().enumerate() {
            f(position, item);
        }
    }
}

impl<T> From<Vec<T>> for OrderedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
