use super::handle::Handle;

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

// Static tree node. An absent child is `None`; there is no sentinel.
pub(crate) struct BstNode<K> {
    pub(crate) key: K,
    // Number of keys in the subtree rooted here, this node included.
    pub(crate) size: usize,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K> BstNode<K> {
    pub(crate) fn new(key: K, size: usize, left: Option<Handle>, right: Option<Handle>) -> Self {
        Self { key, size, left, right }
    }

    /// Returns true if both children are present.
    pub(crate) fn is_full(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

// Red-Black node. Every link is a real handle: absent children and the root's parent point at
// the tree's nil sentinel, which is itself an `RbNode` without a key.
pub(crate) struct RbNode<K> {
    key: Option<K>,
    pub(crate) size: usize,
    pub(crate) color: Color,
    pub(crate) parent: Handle,
    pub(crate) children: [Handle; 2],
}

impl<K> RbNode<K> {
    /// Creates a fresh red leaf hanging below `parent`.
    pub(crate) fn new_leaf(key: K, parent: Handle, nil: Handle) -> Self {
        Self {
            key: Some(key),
            size: 1,
            color: Color::Red,
            parent,
            children: [nil, nil],
        }
    }

    /// Creates the nil sentinel: black, size 0, every link pointing back at itself.
    pub(crate) fn sentinel(nil: Handle) -> Self {
        Self {
            key: None,
            size: 0,
            color: Color::Black,
            parent: nil,
            children: [nil, nil],
        }
    }

    /// Returns true if this node is the nil sentinel.
    pub(crate) fn is_sentinel(&self) -> bool {
        self.key.is_none()
    }

    /// Returns the key, panicking if this is the sentinel.
    #[inline]
    pub(crate) fn key(&self) -> &K {
        self.key.as_ref().expect("`RbNode::key()` - the nil sentinel has no key!")
    }

    /// Consumes a real node, returning its key.
    pub(crate) fn into_key(self) -> K {
        self.key.expect("`RbNode::into_key()` - the nil sentinel has no key!")
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Handle {
        self.children[side as usize]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Handle) {
        self.children[side as usize] = child;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_black_and_empty() {
        let nil = Handle::from_index(0);
        let node: RbNode<i32> = RbNode::sentinel(nil);
        assert!(node.is_sentinel());
        assert_eq!(node.color, Color::Black);
        assert_eq!(node.size, 0);
        assert_eq!(node.child(Side::Left), nil);
        assert_eq!(node.child(Side::Right), nil);
        assert_eq!(node.parent, nil);
    }

    #[test]
    fn leaf_is_red_with_size_one() {
        let nil = Handle::from_index(0);
        let parent = Handle::from_index(3);
        let node = RbNode::new_leaf(42, parent, nil);
        assert!(!node.is_sentinel());
        assert_eq!(node.color, Color::Red);
        assert_eq!(node.size, 1);
        assert_eq!(*node.key(), 42);
        assert_eq!(node.into_key(), 42);
    }

    #[test]
    #[should_panic(expected = "the nil sentinel has no key")]
    fn sentinel_key_panics() {
        let node: RbNode<i32> = RbNode::sentinel(Handle::from_index(0));
        let _ = node.key();
    }

    #[test]
    fn side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }
}
