//! Error types

use thiserror::Error;

/// Errors surfaced by tree operations.
///
/// A failed call never leaves the tree partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// The tree already holds the maximum number of leaves.
    #[error("merkle tree is full ({max_leaves} leaves)")]
    TreeFull {
        /// Maximum number of leaves the tree accepts
        max_leaves: u64,
    },

    /// A proof was requested for an index past the last usable slot.
    #[error("leaf index {index} out of range (max {max_leaves} leaves)")]
    IndexOutOfRange {
        /// Requested leaf index
        index: u64,
        /// Maximum number of leaves the tree accepts
        max_leaves: u64,
    },

    /// A dynamically sized sibling list did not match the tree depth.
    #[error("proof has {actual} siblings, expected {expected}")]
    ProofLength {
        /// Tree depth
        expected: usize,
        /// Number of siblings supplied
        actual: usize,
    },

    /// Replaying a reference vector produced a different value.
    #[error("test vector {name:?}: {field} mismatch")]
    VectorMismatch {
        /// Vector name
        name: String,
        /// Field that differed
        field: &'static str,
    },
}
