//! Append-only binary Merkle tree for Keccak preimage commitments
//!
//! A party appends 32-byte leaves, publishes only the root, and later proves
//! that any appended leaf sits at its index without revealing the others.
//! Roots and proofs match the on-chain verifier bit for bit:
//! - Fixed depth: [`TREE_DEPTH`] levels, leaves packed left to right
//! - Keccak-256 over `left ‖ right`, no domain separation
//! - Stateless verification through [`verify`]

mod error;
mod hasher;
mod leaf;
mod proof;
mod tree;
mod vectors;
mod zero;

pub use error::MerkleError;
pub use hasher::Keccak256Hasher;
pub use leaf::{deterministic_leaf, LeafPreimage, KECCAK_BLOCK_SIZE};
pub use proof::{verify, MerkleProof};
pub use tree::BinaryMerkleTree;
pub use vectors::{load_vectors, MerkleTestVector};
pub use zero::{empty_root, zero_hash, zero_hashes};

/// 32-byte hash type
pub type Hash = alloy_primitives::B256;

/// Deployed tree depth
pub const TREE_DEPTH: usize = 16;

/// Deepest supported tree; `2^MAX_DEPTH` slots still fit in a `u64`.
pub const MAX_DEPTH: usize = 63;

/// Maximum number of leaves at the deployed depth. The last slot is reserved.
pub const MAX_LEAF_COUNT: u64 = (1 << TREE_DEPTH) - 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployed_constants() {
        assert_eq!(MAX_LEAF_COUNT, 65_535);
        assert_eq!(BinaryMerkleTree::<TREE_DEPTH>::MAX_LEAVES, MAX_LEAF_COUNT);
        assert_eq!(BinaryMerkleTree::<TREE_DEPTH>::new().capacity(), MAX_LEAF_COUNT);
    }

    #[test]
    fn test_insert_and_proof() {
        let mut tree = BinaryMerkleTree::<TREE_DEPTH>::default();
        let leaves: Vec<Hash> = (0..10).map(deterministic_leaf).collect();
        tree.extend(leaves.iter().copied()).unwrap();

        for (index, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof_at(index as u64).unwrap();
            assert!(verify(&tree.root(), leaf, index as u64, &proof));
        }
    }
}
