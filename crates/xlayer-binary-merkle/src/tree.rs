//! Append-only binary Merkle tree
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index, so
//! the parent back-links never own anything and dropping the tree releases
//! every node at once. Subtrees that were never touched are not allocated;
//! they read as all-zero subtrees.

use std::fmt;

use alloy_primitives::B256;
use tracing::{debug, trace, warn};

use crate::{
    hasher::Keccak256Hasher,
    leaf::LeafPreimage,
    proof::MerkleProof,
    zero::{empty_root, zero_hashes},
    MerkleError, MAX_DEPTH, TREE_DEPTH,
};

/// Position of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeIndex(usize);

impl NodeIndex {
    const ROOT: Self = Self(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    label: B256,
    parent: Option<NodeIndex>,
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
}

impl Node {
    const fn new(label: B256, parent: Option<NodeIndex>) -> Self {
        Self { label, parent, left: None, right: None }
    }

    const fn child(&self, side: Side) -> Option<NodeIndex> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    const fn child_mut(&mut self, side: Side) -> &mut Option<NodeIndex> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Fixed-depth, append-only Keccak-256 binary Merkle tree.
///
/// Leaves are packed left to right at depth `DEPTH`. The last slot
/// (`2^DEPTH - 1`) is reserved, so the tree accepts at most
/// [`Self::MAX_LEAVES`] leaves.
///
/// ```
/// use alloy_primitives::B256;
/// use xlayer_binary_merkle::{verify, BinaryMerkleTree};
///
/// let mut tree = BinaryMerkleTree::<16>::new();
/// let leaf = B256::repeat_byte(0xab);
/// tree.append(leaf).unwrap();
///
/// let proof = tree.proof_at(0).unwrap();
/// assert!(verify(&tree.root(), &leaf, 0, &proof));
/// ```
#[derive(Clone)]
pub struct BinaryMerkleTree<const DEPTH: usize = TREE_DEPTH> {
    nodes: Vec<Node>,
    leaf_count: u64,
}

impl<const DEPTH: usize> BinaryMerkleTree<DEPTH> {
    const VALID_DEPTH: () = assert!(DEPTH >= 1 && DEPTH <= MAX_DEPTH, "unsupported tree depth");

    /// Number of leaf slots at depth `DEPTH`
    pub const CAPACITY: u64 = 1 << DEPTH;

    /// Maximum number of leaves the tree accepts
    pub const MAX_LEAVES: u64 = Self::CAPACITY - 1;

    /// Create a new empty tree whose root is the empty-root constant
    pub fn new() -> Self {
        let () = Self::VALID_DEPTH;
        debug!(target: "binary_merkle", depth = DEPTH, "Creating empty binary merkle tree");
        Self { nodes: vec![Node::new(empty_root(DEPTH), None)], leaf_count: 0 }
    }

    /// Current root label. Always up to date.
    pub fn root(&self) -> B256 {
        self.node(NodeIndex::ROOT).label
    }

    /// Number of leaves appended so far
    pub const fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Whether no leaf has been appended yet
    pub const fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Whether the next append would fail with [`MerkleError::TreeFull`]
    pub const fn is_full(&self) -> bool {
        self.leaf_count >= Self::MAX_LEAVES
    }

    /// Maximum number of leaves the tree accepts
    pub const fn capacity(&self) -> u64 {
        Self::MAX_LEAVES
    }

    /// Number of materialized nodes, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a leaf in the leftmost free slot and recompute the labels on its
    /// path. Fails without touching the tree once `MAX_LEAVES` leaves are held.
    pub fn append(&mut self, leaf: B256) -> Result<(), MerkleError> {
        if self.is_full() {
            warn!(
                target: "binary_merkle",
                max_leaves = Self::MAX_LEAVES,
                "Rejecting append to full merkle tree"
            );
            return Err(MerkleError::TreeFull { max_leaves: Self::MAX_LEAVES });
        }

        self.leaf_count += 1;
        let slot = self.materialize_path(self.leaf_count);
        self.node_mut(slot).label = leaf;
        self.update_ancestors(slot);

        trace!(
            target: "binary_merkle",
            leaf_count = self.leaf_count,
            %leaf,
            root = %self.root(),
            "Appended leaf"
        );
        Ok(())
    }

    /// Append the hash of a preimage-oracle leaf
    pub fn append_preimage(&mut self, preimage: &LeafPreimage) -> Result<(), MerkleError> {
        self.append(preimage.hash())
    }

    /// Append a batch of leaves. Either every leaf is appended or, if the batch
    /// does not fit, none is and [`MerkleError::TreeFull`] is returned.
    pub fn extend<I>(&mut self, leaves: I) -> Result<(), MerkleError>
    where
        I: IntoIterator<Item = B256>,
    {
        let leaves: Vec<B256> = leaves.into_iter().collect();
        let free = Self::MAX_LEAVES - self.leaf_count;
        if leaves.len() as u64 > free {
            warn!(
                target: "binary_merkle",
                batch = leaves.len(),
                free,
                "Rejecting batch that overflows merkle tree"
            );
            return Err(MerkleError::TreeFull { max_leaves: Self::MAX_LEAVES });
        }
        for leaf in leaves {
            self.append(leaf)?;
        }
        Ok(())
    }

    /// Inclusion proof for the slot at `index`.
    ///
    /// `index` may point past the appended leaves; such a slot commits to the
    /// zero leaf. A sibling that was never materialized by an append is
    /// reported as the raw zero hash, not as `Z[height]`. Nothing in the tree
    /// changes.
    pub fn proof_at(&self, index: u64) -> Result<MerkleProof<DEPTH>, MerkleError> {
        if index >= Self::MAX_LEAVES {
            return Err(MerkleError::IndexOutOfRange { index, max_leaves: Self::MAX_LEAVES });
        }

        let mut siblings = [B256::ZERO; DEPTH];
        let mut current = Some(NodeIndex::ROOT);
        for (depth, side) in Self::descent(index + 1).into_iter().enumerate() {
            let Some(node) = current.map(|idx| self.node(idx)) else {
                // Nothing below an unmaterialized node; the rest stays zero.
                break;
            };
            if let Some(sibling) = node.child(side.other()) {
                siblings[DEPTH - depth - 1] = self.node(sibling).label;
            }
            current = node.child(side);
        }

        trace!(target: "binary_merkle", index, leaf_count = self.leaf_count, "Built inclusion proof");
        Ok(MerkleProof::new(siblings))
    }

    /// Turns taken from the root to reach the `position`-th slot (1-based).
    ///
    /// Starting from the full capacity, go left while the position fits in the
    /// left half, otherwise go right and drop the left half's slots.
    fn descent(position: u64) -> [Side; DEPTH] {
        let mut path = [Side::Left; DEPTH];
        let mut subtree_capacity = Self::CAPACITY;
        let mut remaining = position;
        for step in &mut path {
            let half = subtree_capacity / 2;
            if remaining > half {
                *step = Side::Right;
                remaining -= half;
            }
            subtree_capacity = half;
        }
        path
    }

    /// Walk down to the `position`-th slot, allocating missing nodes as zero
    /// subtrees of their height. Returns the leaf node.
    fn materialize_path(&mut self, position: u64) -> NodeIndex {
        let zeros = zero_hashes();
        let mut current = NodeIndex::ROOT;
        for (depth, side) in Self::descent(position).into_iter().enumerate() {
            current = self.child_or_insert(current, side, zeros[DEPTH - depth - 1]);
        }
        current
    }

    /// Recompute every label from `leaf` up to the root, allocating the other
    /// child of each ancestor if needed.
    fn update_ancestors(&mut self, leaf: NodeIndex) {
        let zeros = zero_hashes();
        let mut current = leaf;
        let mut height = 0;
        while let Some(parent) = self.node(current).parent {
            debug_assert!(
                self.node(parent).left == Some(current) || self.node(parent).right == Some(current),
                "corrupt parent link at height {height}"
            );
            let left = self.child_or_insert(parent, Side::Left, zeros[height]);
            let right = self.child_or_insert(parent, Side::Right, zeros[height]);
            let label = Keccak256Hasher::hash_pair(&self.node(left).label, &self.node(right).label);
            self.node_mut(parent).label = label;
            current = parent;
            height += 1;
        }
        debug_assert_eq!(height, DEPTH, "leaf is not at depth {}", DEPTH);
    }

    fn child_or_insert(&mut self, parent: NodeIndex, side: Side, label: B256) -> NodeIndex {
        if let Some(child) = self.node(parent).child(side) {
            return child;
        }
        let child = NodeIndex(self.nodes.len());
        self.nodes.push(Node::new(label, Some(parent)));
        *self.node_mut(parent).child_mut(side) = Some(child);
        child
    }

    fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0]
    }

    fn node_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.nodes[idx.0]
    }
}

impl<const DEPTH: usize> Default for BinaryMerkleTree<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> fmt::Debug for BinaryMerkleTree<DEPTH> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryMerkleTree")
            .field("depth", &DEPTH)
            .field("leaf_count", &self.leaf_count)
            .field("root", &self.root())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
