use thiserror::Error;

/// AvlError enumerates over all possible errors that this package
/// shall return.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AvlError {
    /// Returned by lookup() and remove() when key is not present.
    #[error("key not found")]
    KeyNotFound,
    /// Fatal case, a node's subtrees differ in height by more than one.
    /// Carries the offending balance factor.
    #[error("unbalanced node, balance factor {0}")]
    Unbalanced(i8),
    /// Fatal case, cached height does not match the children.
    #[error("stale height, cached {cached} computed {computed}")]
    HeightMismatch { cached: u8, computed: u8 },
    /// Fatal case, index entries are not in sort-order. Carries the
    /// depth at which the violation was found.
    #[error("keys out of order at depth {0}")]
    SortError(usize),
}
