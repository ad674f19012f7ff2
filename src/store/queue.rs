//! FIFO buffer decoupling record arrival from processing

use std::collections::VecDeque;

/// Strict first-in, first-out queue of items awaiting processing
///
/// Arrival order is significant: later records referencing the same content
/// or user must observe entities created by earlier ones.
#[derive(Debug, Clone)]
pub struct IngestionQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for IngestionQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> IngestionQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item at the back, O(1)
    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Take the oldest item, O(1); `None` when empty
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Check if there is nothing left to process
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items waiting
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Extend<T> for IngestionQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for IngestionQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
