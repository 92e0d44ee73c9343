use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, RbNode, Side};
use crate::error::{Error, Result};
use crate::probe::Probe;

/// The Red-Black tree backing `DynamicOSTree`.
///
/// All nodes, including this tree's own nil sentinel, live in `nodes`. The sentinel stands in
/// for every absent child and for the root's parent, so rotations and fixups never branch on
/// "no node". Its `parent` link is scratch space: deletion parks the spliced-in position there
/// when the node moved into place is nil.
pub(crate) struct RawRbTree<K, P> {
    nodes: Arena<RbNode<K>>,
    nil: Handle,
    root: Handle,
    probe: P,
}

impl<K, P: Probe> RawRbTree<K, P> {
    pub(crate) fn new(probe: P) -> Self {
        let mut nodes = Arena::new();
        let nil = Handle::from_index(0);
        let allocated = nodes.alloc(RbNode::sentinel(nil));
        debug_assert_eq!(allocated, nil);
        Self {
            nodes,
            nil,
            root: nil,
            probe,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root == self.nil
    }

    pub(crate) fn probe(&self) -> &P {
        &self.probe
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        let root = self.nodes.get(self.root);
        (!root.is_sentinel()).then(|| root.key())
    }

    // ─── Field access ───────────────────────────────────────────────────────

    #[inline]
    fn size(&self, h: Handle) -> usize {
        self.nodes.get(h).size
    }

    #[inline]
    fn set_size(&mut self, h: Handle, size: usize) {
        self.probe.assignments(1);
        self.nodes.get_mut(h).size = size;
    }

    #[inline]
    fn color(&self, h: Handle) -> Color {
        self.probe.comparisons(1);
        self.nodes.get(h).color
    }

    #[inline]
    fn set_color(&mut self, h: Handle, color: Color) {
        self.probe.assignments(1);
        self.nodes.get_mut(h).color = color;
    }

    #[inline]
    fn parent(&self, h: Handle) -> Handle {
        self.nodes.get(h).parent
    }

    #[inline]
    fn set_parent(&mut self, h: Handle, parent: Handle) {
        self.probe.assignments(1);
        self.nodes.get_mut(h).parent = parent;
    }

    #[inline]
    fn child(&self, h: Handle, side: Side) -> Handle {
        self.nodes.get(h).child(side)
    }

    #[inline]
    fn set_child(&mut self, h: Handle, side: Side, child: Handle) {
        self.probe.assignments(1);
        self.nodes.get_mut(h).set_child(side, child);
    }

    /// Which side of its parent `h` hangs on.
    #[inline]
    fn side_of(&self, h: Handle) -> Side {
        self.probe.comparisons(1);
        if h == self.child(self.parent(h), Side::Left) { Side::Left } else { Side::Right }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, h: Handle) -> usize {
        if h == self.nil {
            return 0;
        }
        1 + self.height_of(self.child(h, Side::Left)).max(self.height_of(self.child(h, Side::Right)))
    }

    /// Returns the key of 1-based rank `rank`.
    pub(crate) fn select(&self, mut rank: usize) -> Result<&K> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        let len = self.len();
        if rank == 0 || rank > len {
            return Err(Error::OutOfRange { rank, len });
        }

        let mut current = self.root;
        while current != self.nil {
            let pos = self.size(self.child(current, Side::Left)) + 1;
            self.probe.assignments(2);
            self.probe.comparisons(2);
            match rank.cmp(&pos) {
                Ordering::Equal => return Ok(self.nodes.get(current).key()),
                Ordering::Less => current = self.child(current, Side::Left),
                Ordering::Greater => {
                    rank -= pos;
                    current = self.child(current, Side::Right);
                }
            }
        }
        debug_assert!(false, "select: size invariant violated, fell off the tree");
        Err(Error::OutOfRange { rank, len })
    }

    /// Returns the 1-based rank of `key`, if present.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.find(key)?;
        let mut rank = self.size(self.child(h, Side::Left)) + 1;
        let mut current = h;
        while current != self.root {
            let parent = self.parent(current);
            if self.side_of(current) == Side::Right {
                rank += self.size(self.child(parent, Side::Left)) + 1;
            }
            current = parent;
        }
        Some(rank)
    }

    /// Locates a node holding `key`: strictly smaller goes left, anything else right.
    fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while current != self.nil {
            self.probe.comparisons(2);
            self.probe.assignments(1);
            match key.cmp(self.nodes.get(current).key().borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current = self.child(current, Side::Left),
                Ordering::Greater => current = self.child(current, Side::Right),
            }
        }
        None
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(key).is_some()
    }

    /// Appends references to every key, in order, to `out`.
    pub(crate) fn collect_keys<'a>(&'a self, out: &mut alloc::vec::Vec<&'a K>) {
        let mut stack: SmallVec<[Handle; 64]> = SmallVec::new();
        let mut current = self.root;
        while current != self.nil || !stack.is_empty() {
            while current != self.nil {
                stack.push(current);
                current = self.child(current, Side::Left);
            }
            if let Some(h) = stack.pop() {
                out.push(self.nodes.get(h).key());
                current = self.child(h, Side::Right);
            }
        }
    }

    // ─── Rotations ──────────────────────────────────────────────────────────

    /// Rotates the subtree at `x` so that `x` moves down to `side`.
    ///
    /// `rotate(x, Side::Left)` is the classic left rotation: `x`'s right child takes its place.
    /// The new subtree root inherits `x`'s size and only `x` is recomputed; ancestors keep
    /// theirs because the subtree still holds the same keys.
    fn rotate(&mut self, x: Handle, side: Side) {
        let up = side.opposite();
        let y = self.child(x, up);
        let inner = self.child(y, side);
        log::trace!("rotate {side:?} at {x:?}, {y:?} moves up");

        self.set_child(x, up, inner);
        self.probe.comparisons(1);
        if inner != self.nil {
            self.set_parent(inner, x);
        }

        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.probe.comparisons(1);
        if parent == self.nil {
            self.probe.assignments(1);
            self.root = y;
        } else {
            let x_side = self.side_of(x);
            self.set_child(parent, x_side, y);
        }

        self.set_child(y, side, x);
        self.set_parent(x, y);

        self.set_size(y, self.size(x));
        let size = self.size(self.child(x, Side::Left)) + self.size(self.child(x, Side::Right)) + 1;
        self.set_size(x, size);
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    pub(crate) fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let mut parent = self.nil;
        let mut current = self.root;
        let mut side = Side::Left;
        self.probe.comparisons(1);
        while current != self.nil {
            parent = current;
            // The new key lands somewhere below every node on this path.
            self.set_size(parent, self.size(parent) + 1);
            self.probe.comparisons(2);
            self.probe.assignments(1);
            side = if key < *self.nodes.get(current).key() { Side::Left } else { Side::Right };
            current = self.child(current, side);
        }

        let z = self.nodes.alloc(RbNode::new_leaf(key, parent, self.nil));
        self.probe.assignments(2);
        self.probe.comparisons(1);
        if parent == self.nil {
            self.probe.assignments(1);
            self.root = z;
        } else {
            self.set_child(parent, side, z);
        }
        self.insert_fixup(z);
    }

    fn insert_fixup(&mut self, mut z: Handle) {
        while self.color(self.parent(z)) == Color::Red {
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                log::trace!("insert fixup at {z:?}: red uncle, recolor");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            if self.side_of(z) != side {
                log::trace!("insert fixup at {z:?}: black uncle, inner grandchild");
                z = parent;
                self.rotate(z, side);
            }

            log::trace!("insert fixup at {z:?}: black uncle, outer grandchild");
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }
        self.set_color(self.root, Color::Black);
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Moves the subtree at `v` into `u`'s position. `v` may be nil, in which case the
    /// sentinel's parent link records where the splice happened.
    fn transplant(&mut self, u: Handle, v: Handle) {
        let parent = self.parent(u);
        self.probe.comparisons(1);
        if parent == self.nil {
            self.probe.assignments(1);
            self.root = v;
        } else {
            let side = self.side_of(u);
            self.set_child(parent, side, v);
        }
        self.set_parent(v, parent);
    }

    fn minimum(&self, mut h: Handle) -> Handle {
        loop {
            let left = self.child(h, Side::Left);
            self.probe.comparisons(1);
            if left == self.nil {
                return h;
            }
            h = left;
        }
    }

    /// Removes a node holding `key`, returning its key.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Result<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        let z = self.find(key).ok_or(Error::NotFound)?;

        // `y` is the node that leaves its position (z itself, or z's successor), `x` the node
        // that takes y's old position.
        let mut removed_color = self.color(z);
        let x;
        self.probe.assignments(1);
        if self.child(z, Side::Left) == self.nil {
            x = self.child(z, Side::Right);
            self.transplant(z, x);
        } else if self.child(z, Side::Right) == self.nil {
            x = self.child(z, Side::Left);
            self.transplant(z, x);
        } else {
            let y = self.minimum(self.child(z, Side::Right));
            removed_color = self.color(y);
            x = self.child(y, Side::Right);
            self.probe.comparisons(1);
            if self.parent(y) == z {
                self.set_parent(x, y);
            } else {
                self.transplant(y, x);
                let right = self.child(z, Side::Right);
                self.set_child(y, Side::Right, right);
                self.set_parent(right, y);
            }
            self.transplant(z, y);
            let left = self.child(z, Side::Left);
            self.set_child(y, Side::Left, left);
            self.set_parent(left, y);
            self.set_color(y, self.color(z));
            self.set_size(y, self.size(z));
        }
        let removed = self.nodes.take(z).into_key();

        // Every ancestor of x's position lost one descendant.
        let mut ancestor = self.parent(x);
        while ancestor != self.nil {
            self.probe.comparisons(1);
            self.set_size(ancestor, self.size(ancestor) - 1);
            ancestor = self.parent(ancestor);
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }
        // The sentinel's parent was only scratch space for the fixup.
        self.nodes.get_mut(self.nil).parent = self.nil;
        Ok(removed)
    }

    fn delete_fixup(&mut self, mut x: Handle) {
        while x != self.root && self.color(x) == Color::Black {
            let side = self.side_of(x);
            let far = side.opposite();
            let mut w = self.child(self.parent(x), far);

            if self.color(w) == Color::Red {
                log::trace!("delete fixup at {x:?}: red sibling");
                let parent = self.parent(x);
                self.set_color(w, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                w = self.child(self.parent(x), far);
            }

            let near_child = self.child(w, side);
            let far_child = self.child(w, far);
            if self.color(near_child) == Color::Black && self.color(far_child) == Color::Black {
                log::trace!("delete fixup at {x:?}: black nephews, push extra black up");
                self.set_color(w, Color::Red);
                x = self.parent(x);
                continue;
            }

            if self.color(far_child) == Color::Black {
                log::trace!("delete fixup at {x:?}: red near nephew");
                self.set_color(near_child, Color::Black);
                self.set_color(w, Color::Red);
                self.rotate(w, far);
                w = self.child(self.parent(x), far);
            }

            log::trace!("delete fixup at {x:?}: red far nephew");
            let parent = self.parent(x);
            self.set_color(w, self.color(parent));
            self.set_color(parent, Color::Black);
            let far_child = self.child(w, far);
            self.set_color(far_child, Color::Black);
            self.rotate(parent, side);
            x = self.root;
        }
        self.set_color(x, Color::Black);
    }
}

impl<K, P> RawRbTree<K, P> {
    /// Frees every real node in post-order and then the sentinel, returning how many real
    /// nodes were freed. Afterwards the tree owns nothing.
    pub(crate) fn destroy(&mut self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let nil = self.nil;
        let mut freed = 0;
        let mut stack: SmallVec<[Handle; 64]> = SmallVec::new();
        let mut last = nil;
        let mut current = self.root;
        while current != nil || !stack.is_empty() {
            while current != nil {
                stack.push(current);
                current = self.nodes.get(current).child(Side::Left);
            }
            let Some(&top) = stack.last() else { break };
            let right = self.nodes.get(top).child(Side::Right);
            if right != nil && right != last {
                current = right;
            } else {
                stack.pop();
                self.nodes.free(top);
                freed += 1;
                last = top;
            }
        }
        self.root = nil;
        self.nodes.free(nil);
        debug_assert!(self.nodes.is_empty(), "destroy: {} nodes unreachable from the root", self.nodes.len());
        log::debug!("red-black tree: destroyed {freed} nodes and the sentinel");
        freed
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::probe::OpCounter;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord, P: Probe> RawRbTree<K, P> {
        /// Checks the size augmentation, BST order, parent links, and Red-Black properties.
        pub(crate) fn validate_invariants(&self) {
            let sentinel = self.nodes.get(self.nil);
            assert!(sentinel.is_sentinel());
            assert_eq!(sentinel.color, Color::Black, "nil must be black");
            assert_eq!(sentinel.size, 0, "nil must have size 0");

            if self.is_empty() {
                assert_eq!(self.nodes.len(), 1, "an empty tree holds only the sentinel");
                return;
            }
            assert_eq!(self.nodes.get(self.root).color, Color::Black, "root must be black");
            assert_eq!(self.parent(self.root), self.nil, "root's parent must be nil");
            let (size, _) = self.validate_node(self.root, None, None);
            assert_eq!(size + 1, self.nodes.len(), "arena holds unreachable nodes");
        }

        // Returns (subtree size, black height).
        fn validate_node(&self, h: Handle, low: Option<&K>, high: Option<&K>) -> (usize, usize) {
            if h == self.nil {
                return (0, 1);
            }
            let node = self.nodes.get(h);
            assert!(!node.is_sentinel(), "{h:?} is a second sentinel");
            if let Some(low) = low {
                assert!(node.key() >= low, "{h:?} breaks BST order on the left");
            }
            if let Some(high) = high {
                assert!(node.key() <= high, "{h:?} breaks BST order on the right");
            }

            let left = node.child(Side::Left);
            let right = node.child(Side::Right);
            for child in [left, right] {
                if child != self.nil {
                    assert_eq!(self.parent(child), h, "{child:?} has a stale parent link");
                    if node.color == Color::Red {
                        assert_eq!(self.nodes.get(child).color, Color::Black, "red {h:?} has a red child");
                    }
                }
            }

            let (left_size, left_black) = self.validate_node(left, low, Some(node.key()));
            let (right_size, right_black) = self.validate_node(right, Some(node.key()), high);
            assert_eq!(left_black, right_black, "{h:?} has unequal black heights");
            assert_eq!(node.size, left_size + right_size + 1, "{h:?} has a stale size");
            (node.size, left_black + usize::from(node.color == Color::Black))
        }
    }

    fn build(keys: &[i32]) -> RawRbTree<i32, ()> {
        let mut tree = RawRbTree::new(());
        for &key in keys {
            tree.insert(key);
            tree.validate_invariants();
        }
        tree
    }

    fn in_order(tree: &RawRbTree<i32, ()>) -> Vec<i32> {
        let mut keys = Vec::new();
        tree.collect_keys(&mut keys);
        keys.into_iter().copied().collect()
    }

    #[test]
    fn ascending_inserts_stay_logarithmic() {
        let keys: Vec<i32> = (0..1000).collect();
        let tree = build(&keys);
        assert_eq!(tree.len(), 1000);
        // A Red-Black tree of n keys is at most 2 * log2(n + 1) tall.
        assert!(tree.height() <= 20, "height {}", tree.height());
    }

    #[test]
    fn rotation_keeps_sizes() {
        let mut tree = build(&[2, 1, 3]);
        let root = tree.root;
        tree.rotate(root, Side::Left);
        assert_eq!(tree.root_key(), Some(&3));
        assert_eq!(tree.size(tree.root), 3);
        assert_eq!(tree.size(root), 2);
        assert_eq!(in_order(&tree), [1, 2, 3]);

        tree.rotate(tree.root, Side::Right);
        assert_eq!(tree.root_key(), Some(&2));
        assert_eq!(tree.size(tree.root), 3);
        assert_eq!(in_order(&tree), [1, 2, 3]);
    }

    #[test]
    fn sample_sequence() {
        let mut tree = build(&[5, 1, 4, 2, 8]);
        assert_eq!(tree.select(1), Ok(&1));
        assert_eq!(tree.select(5), Ok(&8));
        assert_eq!(tree.delete(&4), Ok(4));
        tree.validate_invariants();
        assert_eq!(in_order(&tree), [1, 2, 5, 8]);
        assert_eq!(tree.rank_of(&5), Some(3));
        assert_eq!(tree.rank_of(&4), None);
    }

    #[test]
    fn missing_key_is_reported() {
        let mut tree = build(&[10, 20, 30]);
        assert_eq!(tree.delete(&25), Err(Error::NotFound));
        tree.validate_invariants();
        assert_eq!(tree.len(), 3);

        let mut empty = build(&[]);
        assert_eq!(empty.delete(&1), Err(Error::EmptyTree));
        assert_eq!(empty.select(1), Err(Error::EmptyTree));
    }

    #[test]
    fn duplicates_do_not_break_invariants() {
        let mut tree = build(&[3, 3, 3, 1, 3, 5, 3]);
        assert_eq!(tree.len(), 7);
        assert_eq!(in_order(&tree), [1, 3, 3, 3, 3, 3, 5]);
        for _ in 0..5 {
            assert_eq!(tree.delete(&3), Ok(3));
            tree.validate_invariants();
        }
        assert_eq!(in_order(&tree), [1, 5]);
        assert!(!tree.contains(&3));
    }

    #[test]
    fn delete_everything_returns_to_sentinel_only() {
        let keys: Vec<i32> = (0..64).map(|i| (i * 37) % 64).collect();
        let mut tree = build(&keys);
        for key in keys.iter().rev() {
            assert_eq!(tree.delete(key), Ok(*key));
            tree.validate_invariants();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn destroy_releases_sentinel_once() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        tree.delete(&6).unwrap();
        assert_eq!(tree.destroy(), 6);
        assert!(tree.nodes.is_empty());
        assert_eq!(tree.destroy(), 0);
    }

    #[test]
    fn probe_sees_every_operation() {
        let counter = OpCounter::new();
        let mut tree = RawRbTree::new(&counter);
        for key in 0..32 {
            tree.insert(key);
        }
        let after_build = counter.total();
        assert!(after_build > 0);

        tree.select(7).unwrap();
        let after_select = counter.total();
        assert!(after_select > after_build);

        tree.delete(&7).unwrap();
        assert!(counter.total() > after_select);
        tree.validate_invariants();
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Delete(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..200).prop_map(Op::Insert),
            2 => (0i32..200).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn random_ops_keep_every_invariant(ops in prop::collection::vec(op_strategy(), 1..400)) {
            let mut tree: RawRbTree<i32, ()> = RawRbTree::new(());
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key);
                        let at = model.partition_point(|&k| k <= key);
                        model.insert(at, key);
                    }
                    Op::Delete(key) => {
                        let expected = match model.binary_search(&key) {
                            Ok(at) => Ok(model.remove(at)),
                            Err(_) if model.is_empty() => Err(Error::EmptyTree),
                            Err(_) => Err(Error::NotFound),
                        };
                        prop_assert_eq!(tree.delete(&key), expected);
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            for (i, expected) in model.iter().enumerate() {
                prop_assert_eq!(tree.select(i + 1), Ok(expected));
            }
            prop_assert_eq!(in_order(&tree), model);
        }
    }
}
