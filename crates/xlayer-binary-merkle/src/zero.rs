//! Precomputed labels of all-zero subtrees.
//!
//! `Z[0]` is the 32-byte zero value and `Z[h + 1] = keccak256(Z[h] ‖ Z[h])`.
//! Both tables are derived once per process for every supported depth and
//! are immutable afterwards.

use std::sync::OnceLock;

use alloy_primitives::B256;

use crate::{hasher::Keccak256Hasher, MAX_DEPTH};

static ZERO_HASHES: OnceLock<[B256; MAX_DEPTH + 1]> = OnceLock::new();

static EMPTY_ROOTS: OnceLock<[B256; MAX_DEPTH + 1]> = OnceLock::new();

/// Returns `Z[0..=MAX_DEPTH]`, indexed by subtree height.
pub fn zero_hashes() -> &'static [B256; MAX_DEPTH + 1] {
    ZERO_HASHES.get_or_init(|| {
        let mut hashes = [B256::ZERO; MAX_DEPTH + 1];
        for height in 0..MAX_DEPTH {
            hashes[height + 1] = Keccak256Hasher::hash_pair(&hashes[height], &hashes[height]);
        }
        hashes
    })
}

/// Label of an all-zero subtree of the given height.
///
/// # Panics
///
/// Panics if `height > MAX_DEPTH`.
pub fn zero_hash(height: usize) -> B256 {
    zero_hashes()[height]
}

/// Root label of an empty tree of the given depth.
///
/// The accumulator starts from the raw zero hash and folds in `Z[0]`, `Z[1]`,
/// ..., `Z[depth - 1]` on the right, i.e.
/// `H(H(..H(H(0, Z[0]), Z[1])..), Z[depth - 1])`. Verifiers compare against
/// exactly this fold.
///
/// # Panics
///
/// Panics if `depth > MAX_DEPTH`.
pub fn empty_root(depth: usize) -> B256 {
    EMPTY_ROOTS.get_or_init(|| {
        let zeros = zero_hashes();
        let mut roots = [B256::ZERO; MAX_DEPTH + 1];
        let mut acc = B256::ZERO;
        for height in 0..MAX_DEPTH {
            acc = Keccak256Hasher::hash_pair(&acc, &zeros[height]);
            roots[height + 1] = acc;
        }
        roots
    })[depth]
}
