use thiserror::Error;

/// Errors reported by tree operations.
///
/// A failed operation leaves the tree exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// `select` was asked for a rank outside `1..=len`.
    #[error("rank {rank} is out of range for a tree of {len} keys (ranks start at 1)")]
    OutOfRange { rank: usize, len: usize },
    /// `delete` was asked for a key the tree does not hold.
    #[error("key not found")]
    NotFound,
    /// The operation needs at least one key.
    #[error("tree is empty")]
    EmptyTree,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
