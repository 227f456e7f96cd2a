//! Root construction.

use bondbridge_types::{Hash32, RootHash, TransferId, constants};
use sha2::{Digest, Sha256};

/// Hash two sibling nodes in left-to-right order.
#[must_use]
pub fn hash_pair(left: &Hash32, right: &Hash32) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(constants::MERKLE_NODE_TAG);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Collapse one tree level into the next.
pub(crate) fn next_level(level: &[Hash32]) -> Vec<Hash32> {
    level
        .chunks(2)
        .map(|pair| {
            if let [left, right] = pair {
                hash_pair(left, right)
            } else {
                pair[0]
            }
        })
        .collect()
}

/// Build the Merkle root over `leaves` in the given order.
///
/// Order is part of the commitment: any reordering of two distinct leaves
/// yields a different root.
#[must_use]
pub fn build_root(leaves: &[Hash32]) -> Hash32 {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Build the root of a batch of transfer ids.
#[must_use]
pub fn transfer_root(ids: &[TransferId]) -> RootHash {
    let leaves: Vec<Hash32> = ids.iter().map(|id| id.0).collect();
    RootHash(build_root(&leaves))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: u8) -> Hash32 {
        [n; 32]
    }

    #[test]
    fn empty_root_is_zero() {
        assert_eq!(build_root(&[]), [0u8; 32]);
    }

    #[test]
    fn single_leaf_is_root() {
        assert_eq!(build_root(&[leaf(1)]), leaf(1));
    }

    #[test]
    fn two_leaves_hash_pairwise() {
        assert_eq!(build_root(&[leaf(1), leaf(2)]), hash_pair(&leaf(1), &leaf(2)));
    }

    #[test]
    fn odd_leaf_is_promoted() {
        let expected = hash_pair(&hash_pair(&leaf(1), &leaf(2)), &leaf(3));
        assert_eq!(build_root(&[leaf(1), leaf(2), leaf(3)]), expected);
    }

    #[test]
    fn five_leaves_shape() {
        let l: Vec<Hash32> = (1..=5).map(leaf).collect();
        let left = hash_pair(&hash_pair(&l[0], &l[1]), &hash_pair(&l[2], &l[3]));
        let expected = hash_pair(&left, &l[4]);
        assert_eq!(build_root(&l), expected);
    }

    #[test]
    fn order_matters() {
        let ab = build_root(&[leaf(1), leaf(2), leaf(3)]);
        let ba = build_root(&[leaf(2), leaf(1), leaf(3)]);
        assert_ne!(ab, ba, "Order of leaves must affect the root");
    }

    #[test]
    fn pair_hash_is_not_commutative() {
        assert_ne!(hash_pair(&leaf(1), &leaf(2)), hash_pair(&leaf(2), &leaf(1)));
    }

    #[test]
    fn transfer_root_matches_raw() {
        let ids = [TransferId(leaf(4)), TransferId(leaf(5))];
        assert_eq!(transfer_root(&ids), RootHash(build_root(&[leaf(4), leaf(5)])));
    }
}
