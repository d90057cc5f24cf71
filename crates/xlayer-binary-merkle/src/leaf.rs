//! Leaf construction helpers

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use crate::hasher::Keccak256Hasher;

/// Keccak-f\[1600\] absorption rate in bytes (1088 bits)
pub const KECCAK_BLOCK_SIZE: usize = 136;

/// Deterministic leaf used by the reference test vectors: `0xFF`, the low
/// byte of `i`, then 30 zero bytes.
pub fn deterministic_leaf(i: u64) -> B256 {
    let mut leaf = B256::ZERO;
    leaf.0[0] = 0xff;
    leaf.0[1] = i as u8;
    leaf
}

/// One absorbed block of a large Keccak preimage together with the sponge
/// state commitment after absorbing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafPreimage {
    /// Padded input block
    #[serde(with = "input_hex")]
    pub input: [u8; KECCAK_BLOCK_SIZE],
    /// Block index within the preimage
    pub index: u64,
    /// Commitment to the sponge state after this block
    pub state_commitment: B256,
}

impl LeafPreimage {
    /// Create a new leaf preimage
    pub const fn new(input: [u8; KECCAK_BLOCK_SIZE], index: u64, state_commitment: B256) -> Self {
        Self { input, index, state_commitment }
    }

    /// `keccak256(input ‖ uint256(index) ‖ state_commitment)`, the value
    /// appended to the tree.
    pub fn hash(&self) -> B256 {
        let index = U256::from(self.index).to_be_bytes::<32>();
        Keccak256Hasher::hash_parts(&[
            self.input.as_slice(),
            index.as_slice(),
            self.state_commitment.as_slice(),
        ])
    }
}

mod input_hex {
    use alloy_primitives::hex;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::KECCAK_BLOCK_SIZE;

    pub(super) fn serialize<S: Serializer>(
        input: &[u8; KECCAK_BLOCK_SIZE],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_prefixed(input))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; KECCAK_BLOCK_SIZE], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        <[u8; KECCAK_BLOCK_SIZE]>::try_from(bytes.as_slice()).map_err(|_| {
            D::Error::invalid_length(bytes.len(), &"136 bytes of keccak input")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_leaf_layout() {
        let leaf = deterministic_leaf(0x1234);
        assert_eq!(leaf.0[0], 0xff);
        assert_eq!(leaf.0[1], 0x34);
        assert!(leaf.0[2..].iter().all(|b| *b == 0));
        assert_eq!(deterministic_leaf(1), deterministic_leaf(257));
        assert_ne!(deterministic_leaf(0), deterministic_leaf(1));
    }

    #[test]
    fn test_preimage_hash_layout() {
        let preimage = LeafPreimage::new([0xaa; KECCAK_BLOCK_SIZE], 3, B256::repeat_byte(0xbb));

        let mut bytes = Vec::with_capacity(KECCAK_BLOCK_SIZE + 64);
        bytes.extend_from_slice(&[0xaa; KECCAK_BLOCK_SIZE]);
        bytes.extend_from_slice(&[0u8; 31]);
        bytes.push(3);
        bytes.extend_from_slice(&[0xbb; 32]);
        assert_eq!(preimage.hash(), Keccak256Hasher::hash(&bytes));
    }

    #[test]
    fn test_preimage_hash_depends_on_index() {
        let a = LeafPreimage::new([1; KECCAK_BLOCK_SIZE], 0, B256::ZERO);
        let b = LeafPreimage { index: 1, ..a.clone() };
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_preimage_json() {
        let preimage = LeafPreimage::new([0x01; KECCAK_BLOCK_SIZE], 7, B256::repeat_byte(2));
        let json = serde_json::to_string(&preimage).unwrap();
        assert!(json.contains("\"input\":\"0x0101"));
        let parsed: LeafPreimage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, preimage);

        let short = json.replace(&format!("0x{}", "01".repeat(KECCAK_BLOCK_SIZE)), "0x0101");
        assert!(serde_json::from_str::<LeafPreimage>(&short).is_err());
    }
}
