use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::error::Result;
use crate::probe::Probe;
use crate::raw::RawStaticTree;

mod order_statistic;

/// An order-statistic tree built once, perfectly balanced, from sorted keys.
///
/// [`build`](StaticOSTree::build) splits the input at its midpoint recursively, giving a tree of
/// height ⌈log₂(n + 1)⌉ in O(n) time with no rotations. Every node records the size of its
/// subtree, so [`select`](StaticOSTree::select) finds the i-th smallest key in O(height).
///
/// The tree never rebalances. [`delete`](StaticOSTree::delete) keeps every subtree size exact,
/// but the shape it leaves behind is whatever plain BST deletion produces, so a long run of
/// deletions can leave one side much deeper than the other. Use
/// [`DynamicOSTree`](crate::DynamicOSTree) if keys arrive over time or balance must be kept.
///
/// The `P` parameter is a [`Probe`] that receives a count of every comparison and node write.
///
/// # Examples
///
/// ```
/// use os_trees::StaticOSTree;
///
/// let mut tree = StaticOSTree::build(&[1, 2, 3, 4, 5, 6, 7]);
/// assert_eq!(tree.root_key(), Some(&4));
/// assert_eq!(tree.select(4), Ok(&4));
///
/// assert_eq!(tree.delete(&4), Ok(4));
/// assert_eq!(tree.select(4), Ok(&5));
/// assert_eq!(tree.len(), 6);
/// ```
pub struct StaticOSTree<K, P = ()> {
    raw: RawStaticTree<K, P>,
}

impl<K: Clone> StaticOSTree<K> {
    /// Builds a balanced tree over `sorted`.
    ///
    /// `sorted` must be in ascending order; the midpoint of each range becomes the subtree root.
    /// Building from unsorted keys is a logic error: `select` still returns keys by position but
    /// `delete` may fail to find them.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn build(sorted: &[K]) -> Self
    where
        K: Ord,
    {
        Self::build_with_probe(sorted, ())
    }
}

impl<K: Clone, P: Probe> StaticOSTree<K, P> {
    /// Builds a balanced tree over `sorted`, reporting steps to `probe`.
    #[must_use]
    pub fn build_with_probe(sorted: &[K], probe: P) -> Self
    where
        K: Ord,
    {
        debug_assert!(sorted.is_sorted(), "`StaticOSTree::build()` - keys must be sorted");
        Self {
            raw: RawStaticTree::build(sorted, probe),
        }
    }
}

impl<K, P: Probe> StaticOSTree<K, P> {
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

    /// Number of nodes on the longest root-to-leaf path, 0 for an empty tree.
    ///
    /// Never grows: deletions can only shorten paths, though not evenly.
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
        self.raw.rank_of(key).is_some()
    }

    /// Consumes the tree, freeing every node once in post-order.
    ///
    /// Returns the number of nodes freed. Dropping the tree releases the same memory; `destroy`
    /// exists for callers that want the post-order walk and its count.
    pub fn destroy(mut self) -> usize {
        self.raw.destroy()
    }
}

impl<K: Clone + Ord, P: Probe> StaticOSTree<K, P> {
    /// Removes `key`, returning the stored key.
    ///
    /// A node with two children takes its in-order successor's key and the successor is removed
    /// instead. Every node on the path loses one from its size. No rotation happens.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`](crate::Error::EmptyTree) if the tree is empty,
    /// [`Error::NotFound`](crate::Error::NotFound) if `key` is absent. The tree is unchanged
    /// on error.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn delete<Q>(&mut self, key: &Q) -> Result<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.delete(key)
    }
}

impl<K: fmt::Debug, P: Probe> fmt::Debug for StaticOSTree<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
