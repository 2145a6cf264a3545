//! Generic FIFO queue.
//!
//! Backs the deferred attendance ingest buffer: events are staged with
//! `enqueue` and later drained in arrival order. Pending events are
//! transient and never persisted.

use std::collections::VecDeque;

use crate::error::{Error, Result};

/// First-in-first-out queue.
///
/// # Example
/// ```
/// use roster::collections::Queue;
///
/// let mut queue = Queue::new();
/// queue.enqueue(1);
/// queue.enqueue(2);
/// assert_eq!(queue.dequeue().unwrap(), 1);
/// assert_eq!(queue.dequeue().unwrap(), 2);
/// assert!(queue.dequeue().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Appends an item at the back.
    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Removes and returns the front item.
    ///
    /// # Errors
    /// [`Error::EmptyStructure`] if the queue is empty.
    pub fn dequeue(&mut self) -> Result<T> {
        self.items
            .pop_front()
            .ok_or(Error::EmptyStructure("queue"))
    }

    /// Returns the front item without removing it.
    ///
    /// # Errors
    /// [`Error::EmptyStructure`] if the queue is empty.
    pub fn peek(&self) -> Result<&T> {
        self.items.front().ok_or(Error::EmptyStructure("queue"))
    }

    /// Whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_dequeue_fifo() {
        let mut queue = Queue::new();
        queue.enqueue("first");
        queue.enqueue("second");
        queue.enqueue("third");
        assert_eq!(queue.dequeue().unwrap(), "first");
        assert_eq!(queue.dequeue().unwrap(), "second");
        assert_eq!(queue.dequeue().unwrap(), "third");
    }

    #[test]
    fn test_dequeue_empty_fails() {
        let mut queue: Queue<i32> = Queue::new();
        assert!(matches!(
            queue.dequeue().unwrap_err(),
            Error::EmptyStructure("queue")
        ));
    }

    #[test]
    fn test_peek_front() {
        let mut queue = Queue::new();
        queue.enqueue(10);
        queue.enqueue(20);
        assert_eq!(queue.peek().unwrap(), &10);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_is_empty_after_drain() {
        let mut queue = Queue::new();
        queue.enqueue(1);
        assert!(!queue.is_empty());
        queue.dequeue().unwrap();
        assert!(queue.is_empty());
    }
}
