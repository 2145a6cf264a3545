//! Generic LIFO stack.
//!
//! Backs the per-student grade history used for undo. Serializes as the
//! underlying bottom-to-top sequence so snapshots round-trip losslessly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Last-in-first-out stack.
///
/// # Example
/// ```
/// use roster::collections::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1);
/// stack.push(2);
/// assert_eq!(stack.peek().unwrap(), &2);
/// assert_eq!(stack.pop().unwrap(), 2);
/// assert_eq!(stack.pop().unwrap(), 1);
/// assert!(stack.pop().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Pushes an item on top.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the top item.
    ///
    /// # Errors
    /// [`Error::EmptyStructure`] if the stack is empty.
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or(Error::EmptyStructure("stack"))
    }

    /// Returns the top item without removing it.
    ///
    /// # Errors
    /// [`Error::EmptyStructure`] if the stack is empty.
    pub fn peek(&self) -> Result<&T> {
        self.items.last().ok_or(Error::EmptyStructure("stack"))
    }

    /// Whether the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates bottom-to-top (insertion order).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}
