//! Inclusion proofs.
//!
//! A proof is the ordered list of siblings met on the way from a leaf to
//! the root, each tagged with the side it sits on. Levels where the node
//! was promoted without a sibling contribute no step.

use std::fmt;

use bondbridge_types::{Hash32, RootHash, TransferId};
use serde::{Deserialize, Serialize};

use crate::tree::{hash_pair, next_level};

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One sibling on the path to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Hash32,
    pub side: Side,
}

/// Ordered sibling path from a leaf to its root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerkleProof {
    pub steps: Vec<ProofStep>,
}

impl MerkleProof {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fold `leaf` through every step.
    #[must_use]
    pub fn compute_root(&self, leaf: &Hash32) -> Hash32 {
        self.steps.iter().fold(*leaf, |acc, step| match step.side {
            Side::Left => hash_pair(&step.sibling, &acc),
            Side::Right => hash_pair(&acc, &step.sibling),
        })
    }

    /// Verify that `id` is included under `root`.
    #[must_use]
    pub fn verify_transfer(&self, root: &RootHash, id: &TransferId) -> bool {
        verify(self, root.as_bytes(), id.as_bytes())
    }
}

impl fmt::Display for MerkleProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proof[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            let side = match step.side {
                Side::Left => 'L',
                Side::Right => 'R',
            };
            write!(f, "{side}:{}", hex::encode(&step.sibling[..4]))?;
        }
        write!(f, "]")
    }
}

/// Build the inclusion proof for `leaves[index]`.
///
/// Returns `None` if `index` is out of range.
#[must_use]
pub fn build_proof(leaves: &[Hash32], index: usize) -> Option<MerkleProof> {
    if index >= leaves.len() {
        return None;
    }
    let mut steps = Vec::new();
    let mut level = leaves.to_vec();
    let mut idx = index;
    while level.len() > 1 {
        let sibling = idx ^ 1;
        if let Some(node) = level.get(sibling) {
            let side = if idx % 2 == 0 { Side::Right } else { Side::Left };
            steps.push(ProofStep {
                sibling: *node,
                side,
            });
        }
        level = next_level(&level);
        idx /= 2;
    }
    Some(MerkleProof { steps })
}

/// Build the inclusion proof for `ids[index]`.
#[must_use]
pub fn transfer_proof(ids: &[TransferId], index: usize) -> Option<MerkleProof> {
    let leaves: Vec<Hash32> = ids.iter().map(|id| id.0).collect();
    build_proof(&leaves, index)
}

/// Recompute the root from `leaf` and `proof` and compare with `root`.
///
/// Returns `false` on mismatch; callers must turn that into a rejection.
#[must_use]
pub fn verify(proof: &MerkleProof, root: &Hash32, leaf: &Hash32) -> bool {
    proof.compute_root(leaf) == *root
}
