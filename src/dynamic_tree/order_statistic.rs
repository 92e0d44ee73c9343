use core::borrow::Borrow;

use super::DynamicOSTree;
use crate::error::Result;
use crate::order_statistic::OrderStatistic;
use crate::probe::Probe;

impl<K, P: Probe> DynamicOSTree<K, P> {
    /// Returns the key of one-based rank `rank`: the `rank`-th smallest key.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`](crate::Error::EmptyTree) if the tree is empty,
    /// [`Error::OutOfRange`](crate::Error::OutOfRange) if `rank` is 0 or greater than
    /// [`len`](DynamicOSTree::len).
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use os_trees::{DynamicOSTree, Error};
    ///
    /// let tree = DynamicOSTree::build([30, 10, 20]);
    /// assert_eq!(tree.select(1), Ok(&10));
    /// assert_eq!(tree.select(4), Err(Error::OutOfRange { rank: 4, len: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&K> {
        self.raw.select(rank)
    }

    /// Returns the one-based rank of `key`, or `None` if it is absent.
    ///
    /// With duplicate keys the rank of whichever copy the search meets first is returned.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key)
    }
}

impl<K: Ord, P: Probe> OrderStatistic<K> for DynamicOSTree<K, P> {
    fn len(&self) -> usize {
        DynamicOSTree::len(self)
    }

    fn select(&self, rank: usize) -> Result<&K> {
        DynamicOSTree::select(self, rank)
    }

    fn delete(&mut self, key: &K) -> Result<K> {
        DynamicOSTree::delete(self, key)
    }
}
