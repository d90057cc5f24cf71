//! Reference test vectors shared with the on-chain verifier.
//!
//! A vector fixes the root after `leafCount` deterministic leaves and the
//! proof for one slot:
//!
//! ```json
//! [{ "name": "...", "leafCount": 3, "rootHash": "0x..", "index": 1, "proofs": ["0x..", ...] }]
//! ```

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    leaf::deterministic_leaf, proof::MerkleProof, tree::BinaryMerkleTree, MerkleError,
};

/// One reference vector
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleTestVector {
    /// Human readable case name
    pub name: String,
    /// Number of deterministic leaves appended
    pub leaf_count: u64,
    /// Expected root after the appends
    pub root_hash: B256,
    /// Slot the proof is taken at
    pub index: u64,
    /// Expected sibling labels, deepest first
    pub proofs: Vec<B256>,
}

impl MerkleTestVector {
    /// Capture the current root of `tree` and its proof at `index`
    pub fn from_tree<const DEPTH: usize>(
        name: impl Into<String>,
        tree: &BinaryMerkleTree<DEPTH>,
        index: u64,
    ) -> Result<Self, MerkleError> {
        let proof = tree.proof_at(index)?;
        Ok(Self {
            name: name.into(),
            leaf_count: tree.leaf_count(),
            root_hash: tree.root(),
            index,
            proofs: proof.to_vec(),
        })
    }

    /// Rebuild the tree from deterministic leaves and check the root and proof
    /// against this vector.
    pub fn replay<const DEPTH: usize>(&self) -> Result<(), MerkleError> {
        let expected = MerkleProof::<DEPTH>::try_from(self.proofs.as_slice())?;

        let mut tree = BinaryMerkleTree::<DEPTH>::new();
        tree.extend((0..self.leaf_count).map(deterministic_leaf))?;
        if tree.root() != self.root_hash {
            return Err(self.mismatch("rootHash"));
        }
        if tree.proof_at(self.index)? != expected {
            return Err(self.mismatch("proofs"));
        }

        debug!(
            target: "binary_merkle",
            name = %self.name,
            leaf_count = self.leaf_count,
            index = self.index,
            "Test vector replayed"
        );
        Ok(())
    }

    fn mismatch(&self, field: &'static str) -> MerkleError {
        MerkleError::VectorMismatch { name: self.name.clone(), field }
    }
}

/// Parse a JSON array of vectors
pub fn load_vectors(json: &str) -> serde_json::Result<Vec<MerkleTestVector>> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{zero::empty_root, TREE_DEPTH};

    type Tree = BinaryMerkleTree<TREE_DEPTH>;

    fn captured(leaf_count: u64, index: u64) -> MerkleTestVector {
        let mut tree = Tree::new();
        tree.extend((0..leaf_count).map(deterministic_leaf)).unwrap();
        MerkleTestVector::from_tree(format!("{leaf_count}-leaves-at-{index}"), &tree, index).unwrap()
    }

    #[test]
    fn test_empty_tree_vector_literal() {
        let zeros = vec![format!("\"{}\"", B256::ZERO); TREE_DEPTH].join(",");
        let json = format!(
            r#"[{{"name":"empty","leafCount":0,"rootHash":"{}","index":0,"proofs":[{}]}}]"#,
            empty_root(TREE_DEPTH),
            zeros
        );

        let vectors = load_vectors(&json).unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].leaf_count, 0);
        vectors[0].replay::<TREE_DEPTH>().unwrap();
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&vec![captured(3, 1)]).unwrap();
        for field in ["\"name\"", "\"leafCount\":3", "\"rootHash\":\"0x", "\"index\":1", "\"proofs\""] {
            assert!(json.contains(field), "missing {field} in {json}");
        }

        let vectors = load_vectors(&json).unwrap();
        assert_eq!(vectors[0].proofs.len(), TREE_DEPTH);
        vectors[0].replay::<TREE_DEPTH>().unwrap();
    }

    #[test]
    fn test_replay_detects_root_mismatch() {
        let mut vector = captured(4, 2);
        vector.root_hash.0[0] ^= 1;
        assert_eq!(
            vector.replay::<TREE_DEPTH>(),
            Err(MerkleError::VectorMismatch { name: vector.name.clone(), field: "rootHash" })
        );
    }

    #[test]
    fn test_replay_detects_proof_mismatch() {
        let mut vector = captured(4, 2);
        vector.proofs[5].0[31] ^= 1;
        assert_eq!(
            vector.replay::<TREE_DEPTH>(),
            Err(MerkleError::VectorMismatch { name: vector.name.clone(), field: "proofs" })
        );
    }

    #[test]
    fn test_replay_rejects_wrong_depth() {
        let vector = captured(2, 0);
        assert_eq!(
            vector.replay::<8>(),
            Err(MerkleError::ProofLength { expected: 8, actual: TREE_DEPTH })
        );
    }

    #[test]
    fn test_replay_untouched_slot() {
        captured(5, 40).replay::<TREE_DEPTH>().unwrap();
    }
}
