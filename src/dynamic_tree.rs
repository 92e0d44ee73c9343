use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::error::Result;
use crate::probe::Probe;
use crate::raw::RawRbTree;

mod order_statistic;

/// An order-statistic Red-Black tree.
///
/// Keys are added one [`insert`](DynamicOSTree::insert) at a time and removed with
/// [`delete`](DynamicOSTree::delete); recoloring and rotations after each mutation keep the
/// height within 2·log₂(n + 1). Every node records the size of its subtree, so
/// [`select`](DynamicOSTree::select) finds the i-th smallest key in O(log n).
///
/// Each tree owns a private nil sentinel that stands in for every absent child. It is created
/// with the tree and released exactly once when the tree is destroyed or dropped.
///
/// Duplicate keys are allowed; each insert adds a node.
///
/// The `P` parameter is a [`Probe`] that receives a count of every comparison and node write.
///
/// # Examples
///
/// ```
/// use os_trees::DynamicOSTree;
///
/// let mut tree = DynamicOSTree::build([5, 1, 4, 2, 8]);
/// assert_eq!(tree.select(1), Ok(&1));
/// assert_eq!(tree.select(5), Ok(&8));
///
/// tree.delete(&4).unwrap();
/// assert_eq!(tree.keys(), [&1, &2, &5, &8]);
///
/// tree.insert(3);
/// assert_eq!(tree.rank_of(&3), Some(3));
/// ```
pub struct DynamicOSTree<K, P = ()> {
    raw: RawRbTree<K, P>,
}

impl<K> DynamicOSTree<K> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(())
    }
}

impl<K: Ord> DynamicOSTree<K> {
    /// Builds a tree by inserting `keys` in iteration order.
    ///
    /// The order changes the shape but not the contents.
    ///
    /// # Complexity
    ///
    /// O(n log n)
    #[must_use]
    pub fn build<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Self::build_with_probe(keys, ())
    }
}

impl<K, P: Probe> DynamicOSTree<K, P> {
    /// Creates an empty tree reporting steps to `probe`.
    #[must_use]
    pub fn with_probe(probe: P) -> Self {
        Self {
            raw: RawRbTree::new(probe),
        }
    }

    /// Builds a tree by inserting `keys` in iteration order, reporting steps to `probe`.
    #[must_use]
    pub fn build_with_probe<I: IntoIterator<Item = K>>(keys: I, probe: P) -> Self
    where
        K: Ord,
    {
        let mut tree = Self::with_probe(probe);
        tree.extend(keys);
        log::debug!("red-black tree: built {} nodes, height {}", tree.len(), tree.height());
        tree
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of real nodes on the longest root-to-leaf path, 0 for an empty tree.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the key stored at the root.
    #[must_use]
    pub fn root_key(&self) -> Option<&K> {
        self.raw.root_key()
    }

    /// Returns the probe receiving this tree's step counts.
    pub fn probe(&self) -> &P {
        self.raw.probe()
    }

    /// Returns every key in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        self.raw.collect_keys(&mut keys);
        keys
    }

    /// Returns true if `key` is in the tree.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(key)
    }

    /// Adds `key` to the tree.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        self.raw.insert(key);
    }

    /// Removes a node holding `key`, returning the stored key.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`](crate::Error::EmptyTree) if the tree is empty,
    /// [`Error::NotFound`](crate::Error::NotFound) if `key` is absent. The tree is unchanged
    /// on error.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn delete<Q>(&mut self, key: &Q) -> Result<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.delete(key)
    }

    /// Consumes the tree, freeing every node in post-order and then the sentinel.
    ///
    /// Returns the number of keyed nodes freed.
    pub fn destroy(mut self) -> usize {
        self.raw.destroy()
    }
}

impl<K> Default for DynamicOSTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, P: Probe> Extend<K> for DynamicOSTree<K, P> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for DynamicOSTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::build(iter)
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for DynamicOSTree<K> {
    fn from(keys: [K; N]) -> Self {
        Self::build(keys)
    }
}

impl<K: fmt::Debug, P: Probe> fmt::Debug for DynamicOSTree<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
