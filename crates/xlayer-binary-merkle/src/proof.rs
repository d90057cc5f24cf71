//! Inclusion proofs and stateless verification

use std::ops::Deref;

use alloy_primitives::B256;

use crate::{hasher::Keccak256Hasher, MerkleError, TREE_DEPTH};

/// Sibling labels along a leaf's path, deepest first.
///
/// `siblings[0]` sits next to the leaf and `siblings[DEPTH - 1]` is a child
/// of the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof<const DEPTH: usize = TREE_DEPTH> {
    /// Sibling hashes from leaf to root
    pub siblings: [B256; DEPTH],
}

impl<const DEPTH: usize> MerkleProof<DEPTH> {
    /// Wrap a sibling array
    pub const fn new(siblings: [B256; DEPTH]) -> Self {
        Self { siblings }
    }

    /// Fold `leaf` up the sibling path at `index` and return the resulting root.
    ///
    /// Bit `i` of `index` selects whether the accumulator is the right (1) or
    /// left (0) operand at height `i`.
    pub fn compute_root(&self, leaf: &B256, index: u64) -> B256 {
        self.siblings.iter().enumerate().fold(*leaf, |acc, (height, sibling)| {
            if (index >> height) & 1 == 1 {
                Keccak256Hasher::hash_pair(sibling, &acc)
            } else {
                Keccak256Hasher::hash_pair(&acc, sibling)
            }
        })
    }

    /// Verify this proof against a root hash
    pub fn verify(&self, root: &B256, leaf: &B256, index: u64) -> bool {
        verify(root, leaf, index, self)
    }

    /// Consume the proof and return the sibling array
    pub const fn into_inner(self) -> [B256; DEPTH] {
        self.siblings
    }
}

impl<const DEPTH: usize> From<[B256; DEPTH]> for MerkleProof<DEPTH> {
    fn from(siblings: [B256; DEPTH]) -> Self {
        Self { siblings }
    }
}

impl<const DEPTH: usize> TryFrom<&[B256]> for MerkleProof<DEPTH> {
    type Error = MerkleError;

    fn try_from(siblings: &[B256]) -> Result<Self, Self::Error> {
        let siblings = <[B256; DEPTH]>::try_from(siblings).map_err(|_| {
            MerkleError::ProofLength { expected: DEPTH, actual: siblings.len() }
        })?;
        Ok(Self { siblings })
    }
}

impl<const DEPTH: usize> Deref for MerkleProof<DEPTH> {
    type Target = [B256; DEPTH];

    fn deref(&self) -> &Self::Target {
        &self.siblings
    }
}

impl<const DEPTH: usize> AsRef<[B256]> for MerkleProof<DEPTH> {
    fn as_ref(&self) -> &[B256] {
        &self.siblings
    }
}

/// Check that `leaf` sits at `index` under `root` according to `proof`.
///
/// Pure and allocation free. Any mismatch yields `false`, including an index
/// with bits set above the tree depth.
pub fn verify<const DEPTH: usize>(
    root: &B256,
    leaf: &B256,
    index: u64,
    proof: &MerkleProof<DEPTH>,
) -> bool {
    if DEPTH < u64::BITS as usize && index >> DEPTH != 0 {
        return false;
    }
    proof.compute_root(leaf, index) == *root
}
