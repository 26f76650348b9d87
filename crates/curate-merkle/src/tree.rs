//! # Tree Construction & Verification

use curate_types::{keccak256, Hash32, Match};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// =============================================================================
// TYPES
// =============================================================================

/// Errors from Merkle construction or proof lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// No leaves to commit to.
    #[error("cannot build a commitment over zero matches")]
    EmptyLeafSet,

    /// Requested a proof for a leaf the tree does not contain.
    #[error("leaf not in tree: {0:?}")]
    LeafNotFound(Hash32),
}

/// The commitment over one bundle's matches.
///
/// `leaves` preserves match order (the curated ranking); `proofs` is keyed
/// by leaf hash. The root is reproducible by any party from the matches
/// alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleData {
    /// Tree root.
    pub root: Hash32,
    /// Leaf hashes in match order.
    pub leaves: Vec<Hash32>,
    /// Membership proof per leaf.
    pub proofs: HashMap<Hash32, Vec<Hash32>>,
}

impl MerkleData {
    /// Proof for one leaf, if present.
    pub fn proof_for(&self, leaf: &Hash32) -> Result<&[Hash32], MerkleError> {
        self.proofs
            .get(leaf)
            .map(Vec::as_slice)
            .ok_or(MerkleError::LeafNotFound(*leaf))
    }
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

/// Builds the commitment over `matches`.
///
/// Leaves are the match hashes in match order; the tree itself is built over
/// the sorted leaf set so the root is a function of the set, not the input
/// order.
pub fn build(matches: &[Match]) -> Result<MerkleData, MerkleError> {
    let leaves: Vec<Hash32> = matches.iter().map(Match::hash).collect();
    build_from_leaves(leaves)
}

/// Builds the commitment from precomputed leaf hashes.
pub fn build_from_leaves(leaves: Vec<Hash32>) -> Result<MerkleData, MerkleError> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyLeafSet);
    }

    let mut sorted = leaves.clone();
    sorted.sort_unstable();
    sorted.dedup();

    // Track, per sorted leaf, the sibling path collected while folding the
    // levels upward.
    let mut proofs: Vec<Vec<Hash32>> = vec![Vec::new(); sorted.len()];
    // positions[i] = index of leaf i's ancestor within the current level.
    let mut positions: Vec<usize> = (0..sorted.len()).collect();
    let mut level = sorted.clone();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            match pair {
                [left, right] => next.push(hash_pair(left, right)),
                // Odd node is promoted unchanged.
                [single] => next.push(*single),
                _ => unreachable!("chunks(2) yields 1 or 2 items"),
            }
        }

        for (leaf_idx, pos) in positions.iter_mut().enumerate() {
            let sibling = if *pos % 2 == 0 { *pos + 1 } else { *pos - 1 };
            if sibling < level.len() {
                proofs[leaf_idx].push(level[sibling]);
            }
            *pos /= 2;
        }

        level = next;
    }

    let root = level[0];
    let proofs = sorted
        .iter()
        .copied()
        .zip(proofs)
        .collect::<HashMap<_, _>>();

    Ok(MerkleData {
        root,
        leaves,
        proofs,
    })
}

/// Recomputes the root by folding `proof` over `leaf` and compares it to
/// `root`.
#[must_use]
pub fn verify_proof(leaf: &Hash32, proof: &[Hash32], root: &Hash32) -> bool {
    let computed = proof.iter().fold(*leaf, |acc, sibling| hash_pair(&acc, sibling));
    computed == *root
}

/// Commutative pair hash: children are hashed in sorted order.
fn hash_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut packed = [0u8; 64];
    packed[..32].copy_from_slice(lo.as_bytes());
    packed[32..].copy_from_slice(hi.as_bytes());
    keccak256(&packed)
}

// =============================================================================
// TESTS
// =============================================================================
