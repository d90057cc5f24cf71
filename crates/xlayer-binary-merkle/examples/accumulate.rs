//! Accumulate leaves, publish the root, then prove and verify membership.
//!
//! Run with:
//! ```bash
//! RUST_LOG=binary_merkle=trace cargo run --example accumulate
//! ```

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use xlayer_binary_merkle::{
    deterministic_leaf, verify, BinaryMerkleTree, MerkleError, MerkleTestVector, TREE_DEPTH,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut tree = BinaryMerkleTree::<TREE_DEPTH>::new();
    info!(root = %tree.root(), "Empty tree");

    for i in 0..8 {
        tree.append(deterministic_leaf(i))?;
    }
    let root = tree.root();
    info!(leaf_count = tree.leaf_count(), %root, "Published root");

    let index = 5;
    let proof = tree.proof_at(index)?;
    let included = verify(&root, &deterministic_leaf(index), index, &proof);
    info!(index, included, "Verified inclusion");

    let vector = MerkleTestVector::from_tree("eight-leaves", &tree, index)?;
    println!("{}", serde_json::to_string_pretty(&[vector])?);

    match tree.proof_at(BinaryMerkleTree::<TREE_DEPTH>::MAX_LEAVES) {
        Err(err @ MerkleError::IndexOutOfRange { .. }) => info!(%err, "Reserved slot rejected"),
        other => info!(?other, "Unexpected proof result"),
    }
    Ok(())
}
