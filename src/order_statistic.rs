use crate::error::Result;

/// The contract shared by [`StaticOSTree`](crate::StaticOSTree) and
/// [`DynamicOSTree`](crate::DynamicOSTree).
///
/// Ranks are one-based: rank 1 is the smallest key and rank `len()` the largest.
///
/// # Examples
///
/// ```
/// use os_trees::{DynamicOSTree, OrderStatistic, StaticOSTree};
///
/// fn median<T: OrderStatistic<i32>>(tree: &T) -> Option<i32> {
///     tree.select(tree.len().div_ceil(2)).ok().copied()
/// }
///
/// assert_eq!(median(&StaticOSTree::build(&[1, 2, 3, 4, 5])), Some(3));
/// assert_eq!(median(&DynamicOSTree::build([9, 7, 8])), Some(8));
/// assert_eq!(median(&DynamicOSTree::<i32>::new()), None);
/// ```
pub trait OrderStatistic<K> {
    /// Number of keys in the tree.
    fn len(&self) -> usize;

    /// Returns true if the tree holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the key of one-based rank `rank`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`](crate::Error::EmptyTree) on an empty tree,
    /// [`Error::OutOfRange`](crate::Error::OutOfRange) if `rank` is not in `1..=len()`.
    fn select(&self, rank: usize) -> Result<&K>;

    /// Removes `key`, returning the key that was stored.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`](crate::Error::EmptyTree) on an empty tree,
    /// [`Error::NotFound`](crate::Error::NotFound) if `key` is absent.
    fn delete(&mut self, key: &K) -> Result<K>;
}
