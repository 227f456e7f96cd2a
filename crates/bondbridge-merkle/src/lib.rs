//! # bondbridge-merkle
//!
//! **Pure Merkle commitment utilities for BondBridge.**
//!
//! No state, no side effects. The same functions run on the source domain
//! (to commit a batch) and the destination domain (to check inclusion
//! proofs and rebuild roots during settlement), so the combination rule is
//! part of the cross-domain contract:
//!
//! - siblings are hashed pairwise, left to right:
//!   `SHA-256("bondbridge:node:v1:" || left || right)`
//! - an unpaired final node is promoted to the next level unchanged
//! - a single leaf is its own root; an empty list has the all-zero root

pub mod proof;
pub mod tree;

pub use proof::{MerkleProof, ProofStep, Side, build_proof, transfer_proof, verify};
pub use tree::{build_root, hash_pair, transfer_root};
