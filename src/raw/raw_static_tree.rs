use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::BstNode;
use crate::error::{Error, Result};
use crate::probe::Probe;

/// Explicit traversal stack; deep enough for any balanced tree without spilling.
type Stack = SmallVec<[Handle; 32]>;

/// The balanced BST backing `StaticOSTree`.
///
/// Built once from sorted keys. Deletions keep every `size` exact but never restore balance.
pub(crate) struct RawStaticTree<K, P> {
    nodes: Arena<BstNode<K>>,
    root: Option<Handle>,
    probe: P,
}

impl<K, P: Probe> RawStaticTree<K, P> {
    pub(crate) fn build(keys: &[K], probe: P) -> Self
    where
        K: Clone,
    {
        let mut tree = Self {
            nodes: Arena::with_capacity(keys.len()),
            root: None,
            probe,
        };
        if !keys.is_empty() {
            tree.root = tree.build_range(keys, 0, keys.len() - 1);
        }
        log::debug!("static tree: built {} nodes, height {}", tree.len(), tree.height());
        tree
    }

    // Builds the subtree over the inclusive range `keys[lo..=hi]`, rooted at its midpoint.
    fn build_range(&mut self, keys: &[K], lo: usize, hi: usize) -> Option<Handle>
    where
        K: Clone,
    {
        let mid = lo + (hi - lo) / 2;
        let left = if mid > lo { self.build_range(keys, lo, mid - 1) } else { None };
        let right = if mid < hi { self.build_range(keys, mid + 1, hi) } else { None };
        self.probe.comparisons(1);
        self.probe.assignments(4);
        Some(self.nodes.alloc(BstNode::new(keys[mid].clone(), hi - lo + 1, left, right)))
    }

    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn probe(&self) -> &P {
        &self.probe
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        self.root.map(|h| &self.nodes.get(h).key)
    }

    #[inline]
    fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| self.nodes.get(h).size)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| {
            let node = self.nodes.get(h);
            1 + self.height_of(node.left).max(self.height_of(node.right))
        })
    }

    /// Returns the key of 1-based rank `rank`.
    pub(crate) fn select(&self, mut rank: usize) -> Result<&K> {
        let Some(mut current) = self.root else {
            return Err(Error::EmptyTree);
        };
        let len = self.len();
        if rank == 0 || rank > len {
            return Err(Error::OutOfRange { rank, len });
        }

        loop {
            let node = self.nodes.get(current);
            let pos = self.size_of(node.left) + 1;
            self.probe.assignments(2);
            self.probe.comparisons(2);
            let next = match rank.cmp(&pos) {
                Ordering::Equal => return Ok(&node.key),
                Ordering::Less => node.left,
                Ordering::Greater => {
                    rank -= pos;
                    node.right
                }
            };
            debug_assert!(next.is_some(), "select: size invariant violated below {current:?}");
            current = next.ok_or(Error::OutOfRange { rank, len })?;
        }
    }

    /// Returns the 1-based rank of `key`, if present.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut before = 0;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            self.probe.comparisons(1);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(before + self.size_of(node.left) + 1),
                Ordering::Greater => {
                    before += self.size_of(node.left) + 1;
                    current = node.right;
                }
            }
        }
        None
    }

    /// Appends references to every key, in order, to `out`.
    pub(crate) fn collect_keys<'a>(&'a self, out: &mut alloc::vec::Vec<&'a K>) {
        let mut stack = Stack::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(h) = current {
                stack.push(h);
                current = self.nodes.get(h).left;
            }
            if let Some(h) = stack.pop() {
                let node = self.nodes.get(h);
                out.push(&node.key);
                current = node.right;
            }
        }
    }
}

impl<K: Clone + Ord, P: Probe> RawStaticTree<K, P> {
    /// Removes `key`, returning it.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Result<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        let (root, removed) = self.delete_at(self.root, key)?;
        self.root = root;
        Ok(removed)
    }

    // Deletes `key` from the subtree at `link`, returning the subtree's new root and the removed
    // key. Every node left on the path back up loses exactly one from its size. On error nothing
    // below `link` has been touched.
    fn delete_at<Q>(&mut self, link: Option<Handle>, key: &Q) -> Result<(Option<Handle>, K)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = link.ok_or(Error::NotFound)?;
        self.probe.comparisons(2);
        let ordering = key.cmp(self.nodes.get(h).key.borrow());
        let removed = match ordering {
            Ordering::Less => {
                let (left, removed) = self.delete_at(self.nodes.get(h).left, key)?;
                self.nodes.get_mut(h).left = left;
                self.probe.assignments(1);
                removed
            }
            Ordering::Greater => {
                let (right, removed) = self.delete_at(self.nodes.get(h).right, key)?;
                self.nodes.get_mut(h).right = right;
                self.probe.assignments(1);
                removed
            }
            Ordering::Equal if self.nodes.get(h).is_full() => {
                // Overwrite with the in-order successor, then remove the successor below.
                let successor = self.minimum(self.nodes.get(h).right);
                let successor_key = self.nodes.get(successor).key.clone();
                let removed = core::mem::replace(&mut self.nodes.get_mut(h).key, successor_key.clone());
                let (right, _) = self.delete_at::<K>(self.nodes.get(h).right, &successor_key)?;
                self.nodes.get_mut(h).right = right;
                self.probe.assignments(3);
                removed
            }
            Ordering::Equal => {
                let node = self.nodes.take(h);
                self.probe.comparisons(1);
                self.probe.assignments(2);
                return Ok((node.left.or(node.right), node.key));
            }
        };
        self.nodes.get_mut(h).size -= 1;
        self.probe.assignments(1);
        Ok((Some(h), removed))
    }

    fn minimum(&self, link: Option<Handle>) -> Handle {
        let mut current = link.expect("`RawStaticTree::minimum()` - empty subtree!");
        while let Some(left) = self.nodes.get(current).left {
            self.probe.comparisons(1);
            current = left;
        }
        current
    }
}

impl<K, P> RawStaticTree<K, P> {
    /// Frees every node in post-order, returning how many were freed.
    pub(crate) fn destroy(&mut self) -> usize {
        let mut freed = 0;
        let mut stack = Stack::new();
        let mut last: Option<Handle> = None;
        let mut current = self.root.take();
        while current.is_some() || !stack.is_empty() {
            while let Some(h) = current {
                stack.push(h);
                current = self.nodes.get(h).left;
            }
            let Some(&top) = stack.last() else { break };
            let right = self.nodes.get(top).right;
            if right.is_some() && right != last {
                current = right;
            } else {
                stack.pop();
                self.nodes.free(top);
                freed += 1;
                last = Some(top);
            }
        }
        debug_assert!(self.nodes.is_empty(), "destroy: {} nodes unreachable from the root", self.nodes.len());
        log::debug!("static tree: destroyed {freed} nodes");
        freed
    }
}
