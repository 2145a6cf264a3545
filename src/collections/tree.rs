//! Unbalanced binary search tree map.
//!
//! The primary student-ID index: insert-or-replace, lookup, deletion,
//! and lazy ascending in-order traversal. No rebalancing is performed;
//! worst-case height is O(n) under adversarial insertion order, which
//! is an accepted property at the intended dataset size.
//!
//! Node size is not cached: `len` is recomputed by a full traversal
//! count after every structural mutation, so callers must not assume
//! O(log n) size queries.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 12

use std::borrow::Borrow;

struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Box<Node<K, V>>>,
    right: Option<Box<Node<K, V>>>,
}

/// Ordered map over an unbalanced binary search tree.
///
/// Each node exclusively owns its children; there are no parent links,
/// so the whole tree is a plain recursive ownership structure.
///
/// # Example
/// ```
/// use roster::collections::IndexTree;
///
/// let mut tree = IndexTree::new();
/// tree.insert("S2", 1);
/// tree.insert("S1", 0);
/// tree.insert("S3", 2);
///
/// assert_eq!(tree.get(&"S1"), Some(&0));
/// let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
/// assert_eq!(keys, vec!["S1", "S2", "S3"]);
/// ```
pub struct IndexTree<K, V> {
    root: Option<Box<Node<K, V>>>,
    len: usize,
}

impl<K: Ord, V> IndexTree<K, V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a key-value pair.
    ///
    /// If the key already exists, its value is replaced in place
    /// (update semantics, not duplicate insertion).
    pub fn insert(&mut self, key: K, value: V) {
        let mut cursor = &mut self.root;
        loop {
            match cursor {
                None => {
                    *cursor = Some(Box::new(Node {
                        key,
                        value,
                        left: None,
                        right: None,
                    }));
                    break;
                }
                Some(node) => match key.cmp(&node.key) {
                    std::cmp::Ordering::Less => cursor = &mut node.left,
                    std::cmp::Ordering::Greater => cursor = &mut node.right,
                    std::cmp::Ordering::Equal => {
                        node.value = value;
                        break;
                    }
                },
            }
        }
        self.len = count(&self.root);
    }

    /// Looks up a key. O(height) descent.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match key.cmp(node.key.borrow()) {
                std::cmp::Ordering::Less => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Looks up a key, yielding a mutable value reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            cursor = match key.cmp(node.key.borrow()) {
                std::cmp::Ordering::Less => node.left.as_deref_mut(),
                std::cmp::Ordering::Greater => node.right.as_deref_mut(),
                std::cmp::Ordering::Equal => return Some(&mut node.value),
            };
        }
        None
    }

    /// Removes a key, returning its value if it was present.
    ///
    /// Standard BST deletion: leaf and single-child nodes are spliced
    /// out directly; a node with two children is replaced by its
    /// in-order successor (minimum of the right subtree), which is then
    /// removed from that subtree.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = Self::remove_from(&mut self.root, key);
        if removed.is_some() {
            self.len = count(&self.root);
        }
        removed
    }

    /// Lazy ascending in-order traversal of (key, value) pairs.
    ///
    /// Each call starts a fresh traversal.
    pub fn iter(&self) -> InorderIter<'_, K, V> {
        let mut iter = InorderIter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    fn remove_from<Q>(slot: &mut Option<Box<Node<K, V>>>, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = slot.as_deref_mut()?;
        match key.cmp(node.key.borrow()) {
            std::cmp::Ordering::Less => Self::remove_from(&mut node.left, key),
            std::cmp::Ordering::Greater => Self::remove_from(&mut node.right, key),
            std::cmp::Ordering::Equal => {
                let mut node = slot.take()?;
                let value = match (node.left.take(), node.right.take()) {
                    (None, right) => {
                        *slot = right;
                        node.value
                    }
                    (left, None) => {
                        *slot = left;
                        node.value
                    }
                    (left, Some(right)) => {
                        // Two children: the in-order successor takes this
                        // node's place.
                        let (rest, mut successor) = detach_min(right);
                        successor.left = left;
                        successor.right = rest;
                        *slot = Some(successor);
                        node.value
                    }
                };
                Some(value)
            }
        }
    }
}

impl<K: Ord, V> Default for IndexTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Detaches the minimum node of a subtree, returning the remaining
/// subtree and the detached node.
fn detach_min<K, V>(
    mut node: Box<Node<K, V>>,
) -> (Option<Box<Node<K, V>>>, Box<Node<K, V>>) {
    match node.left.take() {
        Some(left) => {
            let (rest, min) = detach_min(left);
            node.left = rest;
            (Some(node), min)
        }
        None => {
            let right = node.right.take();
            (right, node)
        }
    }
}

fn count<K, V>(node: &Option<Box<Node<K, V>>>) -> usize {
    match node {
        None => 0,
        Some(n) => 1 + count(&n.left) + count(&n.right),
    }
}

/// Lazy in-order iterator over an [`IndexTree`].
///
/// Holds the left spine of the unvisited portion on an explicit stack.
pub struct InorderIter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> InorderIter<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for InorderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}
