use core::borrow::Borrow;

use super::StaticOSTree;
use crate::error::Result;
use crate::order_statistic::OrderStatistic;
use crate::probe::Probe;

impl<K, P: Probe> StaticOSTree<K, P> {
    /// Returns the key of one-based rank `rank`: the `rank`-th smallest key.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`](crate::Error::EmptyTree) if the tree is empty,
    /// [`Error::OutOfRange`](crate::Error::OutOfRange) if `rank` is 0 or greater than
    /// [`len`](StaticOSTree::len).
    ///
    /// # Complexity
    ///
    /// O(height)
    ///
    /// # Examples
    ///
    /// ```
    /// use os_trees::{Error, StaticOSTree};
    ///
    /// let tree = StaticOSTree::build(&[10, 20, 30]);
    /// assert_eq!(tree.select(2), Ok(&20));
    /// assert_eq!(tree.select(0), Err(Error::OutOfRange { rank: 0, len: 3 }));
    /// assert_eq!(tree.select(4), Err(Error::OutOfRange { rank: 4, len: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&K> {
        self.raw.select(rank)
    }

    /// Returns the one-based rank of `key`, or `None` if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use os_trees::StaticOSTree;
    ///
    /// let tree = StaticOSTree::build(&[10, 20, 30]);
    /// assert_eq!(tree.rank_of(&30), Some(3));
    /// assert_eq!(tree.rank_of(&25), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key)
    }
}

impl<K: Clone + Ord, P: Probe> OrderStatistic<K> for StaticOSTree<K, P> {
    fn len(&self) -> usize {
        StaticOSTree::len(self)
    }

    fn select(&self, rank: usize) -> Result<&K> {
        StaticOSTree::select(self, rank)
    }

    fn delete(&mut self, key: &K) -> Result<K> {
        StaticOSTree::delete(self, key)
    }
}
