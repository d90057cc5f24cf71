//! Keccak-256 hashing used for every interior node of the tree.

use alloy_primitives::B256;
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 (Ethereum padding, rate 1088) over raw byte concatenations.
///
/// Interior labels are `keccak256(left ‖ right)` with no length prefix and no
/// domain tag, which is what the on-chain verifier recomputes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Hasher;

impl Keccak256Hasher {
    /// Hash two 32-byte values together
    pub fn hash_pair(left: &B256, right: &B256) -> B256 {
        let mut hasher = Keccak::v256();
        hasher.update(left.as_slice());
        hasher.update(right.as_slice());
        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        B256::from(output)
    }

    /// Hash an arbitrary byte string
    pub fn hash(data: &[u8]) -> B256 {
        Self::hash_parts(&[data])
    }

    /// Hash the concatenation of several byte strings without copying them
    /// into one buffer first.
    pub fn hash_parts(parts: &[&[u8]]) -> B256 {
        let mut hasher = Keccak::v256();
        for part in parts {
            hasher.update(part);
        }
        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        B256::from(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_hash_empty_input() {
        assert_eq!(
            Keccak256Hasher::hash(&[]),
            b256!("0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn test_hash_pair_of_zeros() {
        assert_eq!(
            Keccak256Hasher::hash_pair(&B256::ZERO, &B256::ZERO),
            b256!("0xad3228b676f7d3cd4284a5443f17f1962b36e491b30a40b2405849e597ba5fb5")
        );
    }

    #[test]
    fn test_hash_pair_is_concatenation() {
        let left = B256::repeat_byte(1);
        let right = B256::repeat_byte(2);
        let mut joined = [0u8; 64];
        joined[..32].copy_from_slice(left.as_slice());
        joined[32..].copy_from_slice(right.as_slice());

        let hash = Keccak256Hasher::hash_pair(&left, &right);
        assert_eq!(hash, Keccak256Hasher::hash(&joined));
        assert_eq!(hash, Keccak256Hasher::hash_parts(&[left.as_slice(), right.as_slice()]));
        assert_ne!(hash, Keccak256Hasher::hash_pair(&right, &left));
    }
}
