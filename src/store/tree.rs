//! Ordered key/entity store backed by an AVL tree
//!
//! Children are owned by their parent (`Option<Box<Node>>`). Rebalancing walks
//! back up the insertion/removal path through the recursion itself, so nodes
//! never hold a pointer to their parent.

use std::cmp::Ordering;
use std::fmt::Debug;

use super::{StoreError, StoreResult};

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    /// Height of the subtree rooted here; a leaf has height 1.
    height: i32,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left height minus right height
    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Self-balancing binary search tree mapping unique keys to owned values
///
/// After every insert and remove the height difference between the two
/// subtrees of any node is at most one, which keeps `insert`, `get` and
/// `remove` at O(log n) in the worst case.
#[derive(Debug)]
pub struct AvlStore<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for AvlStore<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K: Ord + Debug, V> AvlStore<K, V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the store
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    /// Insert a new entry
    ///
    /// Fails with [`StoreError::DuplicateKey`] when the key is already
    /// present; the existing value is left untouched. Callers wanting upsert
    /// semantics check [`AvlStore::contains_key`] first.
    pub fn insert(&mut self, key: K, value: V) -> StoreResult<()> {
        Self::insert_at(&mut self.root, key, value).map_err(|key| StoreError::DuplicateKey {
            key: format!("{:?}", key),
        })?;
        self.len += 1;
        Ok(())
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Look up a mutable reference to the value stored under `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut link = self.root.as_deref_mut();
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            };
        }
        None
    }

    /// Check if `key` is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove the entry stored under `key`, returning its value
    ///
    /// Removing an absent key is a no-op and returns `None`.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = Self::remove_at(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Iterate over entries in ascending key order
    ///
    /// Every call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Iterate over keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterate over values in ascending key order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Verify stored heights, the AVL balance bound and strict key ordering
    pub fn check_invariants(&self) -> StoreResult<()> {
        Self::check_node(&self.root, None, None)?;
        let counted = self.iter().count();
        if counted != self.len {
            return Err(StoreError::Corrupted(format!(
                "length mismatch: tracked {} but traversed {}",
                self.len, counted
            )));
        }
        Ok(())
    }

    fn insert_at(link: &mut Link<K, V>, key: K, value: V) -> Result<(), K> {
        match *link {
            None => {
                *link = Some(Box::new(Node::new(key, value)));
                return Ok(());
            },
            Some(ref mut node) => match key.cmp(&node.key) {
                Ordering::Less => Self::insert_at(&mut node.left, key, value)?,
                Ordering::Greater => Self::insert_at(&mut node.right, key, value)?,
                Ordering::Equal => return Err(key),
            },
        }
        Self::rebalance(link);
        Ok(())
    }

    fn remove_at(link: &mut Link<K, V>, key: &K) -> Option<V> {
        let ordering = key.cmp(&link.as_ref()?.key);
        let removed = match ordering {
            Ordering::Less => Self::remove_at(&mut link.as_mut()?.left, key)?,
            Ordering::Greater => Self::remove_at(&mut link.as_mut()?.right, key)?,
            Ordering::Equal => {
                let mut node = link.take()?;
                *link = match (node.left.take(), node.right.take()) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        // Splice in the in-order successor
                        let (mut successor, rest) = Self::take_min(right);
                        successor.left = Some(left);
                        successor.right = rest;
                        Some(successor)
                    },
                };
                node.value
            },
        };
        Self::rebalance(link);
        Some(removed)
    }

    /// Detach the minimum node of a subtree, returning it with the rebalanced rest
    fn take_min(mut node: Box<Node<K, V>>) -> (Box<Node<K, V>>, Link<K, V>) {
        match node.left.take() {
            Some(left) => {
                let (min, rest) = Self::take_min(left);
                node.left = rest;
                let mut link = Some(node);
                Self::rebalance(&mut link);
                (min, link)
            },
            None => {
                let rest = node.right.take();
                node.update_height();
                (node, rest)
            },
        }
    }

    fn rebalance(link: &mut Link<K, V>) {
        let Some(node) = link.as_mut() else {
            return;
        };
        node.update_height();
        let balance = node.balance_factor();

        if balance > 1 {
            // Left-right case
            if node.left.as_ref().map_or(0, |left| left.balance_factor()) < 0 {
                Self::rotate_left(&mut node.left);
            }
            Self::rotate_right(link);
        } else if balance < -1 {
            // Right-left case
            if node.right.as_ref().map_or(0, |right| right.balance_factor()) > 0 {
                Self::rotate_right(&mut node.right);
            }
            Self::rotate_left(link);
        }
    }

    fn rotate_left(link: &mut Link<K, V>) {
        let Some(mut node) = link.take() else {
            return;
        };
        let Some(mut pivot) = node.right.take() else {
            *link = Some(node);
            return;
        };
        node.right = pivot.left.take();
        node.update_height();
        pivot.left = Some(node);
        pivot.update_height();
        *link = Some(pivot);
    }

    fn rotate_right(link: &mut Link<K, V>) {
        let Some(mut node) = link.take() else {
            return;
        };
        let Some(mut pivot) = node.left.take() else {
            *link = Some(node);
            return;
        };
        node.left = pivot.right.take();
        node.update_height();
        pivot.right = Some(node);
        pivot.update_height();
        *link = Some(pivot);
    }

    /// Returns the verified height of the subtree
    fn check_node(link: &Link<K, V>, lower: Option<&K>, upper: Option<&K>) -> StoreResult<i32> {
        let Some(node) = link else {
            return Ok(0);
        };
        if lower.is_some_and(|lower| node.key <= *lower)
            || upper.is_some_and(|upper| node.key >= *upper)
        {
            return Err(StoreError::Corrupted(format!(
                "key {:?} is out of order",
                node.key
            )));
        }

        let left = Self::check_node(&node.left, lower, Some(&node.key))?;
        let right = Self::check_node(&node.right, Some(&node.key), upper)?;

        if (left - right).abs() > 1 {
            return Err(StoreError::Corrupted(format!(
                "node {:?} has balance factor {}",
                node.key,
                left - right
            )));
        }
        let expected = 1 + left.max(right);
        if node.height != expected {
            return Err(StoreError::Corrupted(format!(
                "node {:?} stores height {} but has height {}",
                node.key, node.height, expected
            )));
        }
        Ok(expected)
    }
}

impl<'a, K: Ord + Debug, V> IntoIterator for &'a AvlStore<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy in-order iterator over an [`AvlStore`]
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<&'a Node<K, V>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
