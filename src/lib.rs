//! Order-statistic binary search trees for Rust.
//!
//! This crate provides two trees whose nodes record the size of their subtree, which turns
//! "find the i-th smallest key" into an O(height) walk from the root:
//!
//! - [`StaticOSTree`] - built once from sorted keys into a perfectly balanced BST in O(n).
//!   Deletion keeps sizes exact but never rebalances.
//! - [`DynamicOSTree`] - a Red-Black tree built by repeated insertion in O(n log n). Insert and
//!   delete restore balance with recoloring and rotations, and rotations repair sizes in O(1).
//!
//! Both implement [`OrderStatistic`]: `len`, `select(rank)` with one-based ranks, and
//! `delete(key)`. Failures are reported as [`Error`] values rather than sentinels.
//!
//! # Example
//!
//! ```
//! use os_trees::{DynamicOSTree, Error, StaticOSTree};
//!
//! let balanced = StaticOSTree::build(&[1, 2, 3, 4, 5, 6, 7]);
//! assert_eq!(balanced.root_key(), Some(&4));
//! assert_eq!(balanced.height(), 3);
//!
//! let mut rb = DynamicOSTree::build([5, 1, 4, 2, 8]);
//! assert_eq!(rb.select(1), Ok(&1));
//! assert_eq!(rb.delete(&4), Ok(4));
//! assert_eq!(rb.delete(&4), Err(Error::NotFound));
//! assert_eq!(rb.select(5), Err(Error::OutOfRange { rank: 5, len: 4 }));
//! ```
//!
//! # Instrumentation
//!
//! Each tree takes a [`Probe`] type parameter, `()` by default. A probe such as [`OpCounter`]
//! is told about every key comparison and node write, which is enough to chart how the cost of
//! each operation grows with the number of keys.
//!
//! # Implementation
//!
//! Nodes live in a per-tree arena and refer to each other by index. The Red-Black tree's parent
//! links are plain indices, and its nil sentinel is an ordinary arena slot owned by the tree,
//! so no node ever owns another and nothing is freed twice.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod dynamic_tree;
pub mod probe;
pub mod static_tree;

pub use dynamic_tree::DynamicOSTree;
pub use error::{Error, Result};
pub use order_statistic::OrderStatistic;
pub use probe::{OpCounter, Probe};
pub use static_tree::StaticOSTree;
