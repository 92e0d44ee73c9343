//! Hooks for counting the primitive steps a tree operation performs.
//!
//! Every key comparison and every write to a node (link, size, or color) inside the trees is
//! reported to the tree's [`Probe`]. The default probe, `()`, ignores everything and compiles
//! away. [`OpCounter`] tallies both kinds of step so an external harness can chart the cost of
//! `build`, `select`, and `delete` against input size.

use core::cell::Cell;

/// Receives step counts from a tree.
///
/// Methods take `&self` because read-only operations such as `select` report too. Implementors
/// that accumulate should use interior mutability.
pub trait Probe {
    /// Records `n` key or link comparisons.
    #[inline]
    fn comparisons(&self, n: u64) {
        let _ = n;
    }

    /// Records `n` writes to node fields or tree-local cursors.
    #[inline]
    fn assignments(&self, n: u64) {
        let _ = n;
    }
}

impl Probe for () {}

impl<P: Probe + ?Sized> Probe for &P {
    #[inline]
    fn comparisons(&self, n: u64) {
        (**self).comparisons(n);
    }

    #[inline]
    fn assignments(&self, n: u64) {
        (**self).assignments(n);
    }
}

/// A [`Probe`] that counts comparisons and assignments.
///
/// # Examples
///
/// ```
/// use os_trees::{DynamicOSTree, OpCounter};
///
/// let counter = OpCounter::new();
/// let tree = DynamicOSTree::build_with_probe([3, 1, 2], &counter);
/// let built = counter.total();
/// assert!(built > 0);
///
/// counter.reset();
/// assert_eq!(tree.select(2), Ok(&2));
/// assert!(counter.comparisons() > 0);
/// ```
#[derive(Debug, Default)]
pub struct OpCounter {
    comparisons: Cell<u64>,
    assignments: Cell<u64>,
}

impl OpCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            comparisons: Cell::new(0),
            assignments: Cell::new(0),
        }
    }

    #[must_use]
    pub fn comparisons(&self) -> u64 {
        self.comparisons.get()
    }

    #[must_use]
    pub fn assignments(&self) -> u64 {
        self.assignments.get()
    }

    /// Comparisons plus assignments.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.comparisons() + self.assignments()
    }

    /// Zeroes both counters.
    pub fn reset(&self) {
        self.comparisons.set(0);
        self.assignments.set(0);
    }
}

impl Probe for OpCounter {
    #[inline]
    fn comparisons(&self, n: u64) {
        self.comparisons.set(self.comparisons.get() + n);
    }

    #[inline]
    fn assignments(&self, n: u64) {
        self.assignments.set(self.assignments.get() + n);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn counter_accumulates_and_resets() {
        let counter = OpCounter::new();
        Probe::comparisons(&counter, 3);
        Probe::assignments(&counter, 4);
        assert_eq!(counter.comparisons(), 3);
        assert_eq!(counter.assignments(), 4);
        assert_eq!(counter.total(), 7);

        counter.reset();
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn borrowed_counter_forwards() {
        let counter = OpCounter::new();
        let borrowed = &counter;
        Probe::comparisons(&borrowed, 2);
        Probe::assignments(&borrowed, 5);
        assert_eq!(counter.comparisons(), 2);
        assert_eq!(counter.assignments(), 5);
    }

    #[test]
    fn unit_probe_is_silent() {
        ().comparisons(10);
        ().assignments(10);
    }
}
