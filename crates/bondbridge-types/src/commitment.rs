//! Commitment types produced on the source domain.
//!
//! A commit drains the pending batch into a [`CommitmentEvent`]. Only its
//! [`Commitment`] payload crosses domains: exactly `(root, total)`, encoded
//! as 48 bytes (`root || total u128 big-endian`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BridgeError, DomainId, Result, RootHash, TransferId, constants};

/// The payload relayed to the destination domain's root ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment {
    /// Merkle root over the batch's transfer ids, in append order.
    pub root: RootHash,
    /// Sum of the batch's transfer amounts.
    pub total: u128,
}

impl Commitment {
    /// Encode into the fixed-width wire payload.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; constants::COMMITMENT_PAYLOAD_LEN] {
        let mut out = [0u8; constants::COMMITMENT_PAYLOAD_LEN];
        out[..32].copy_from_slice(self.root.as_bytes());
        out[32..].copy_from_slice(&self.total.to_be_bytes());
        out
    }

    /// Decode the fixed-width wire payload.
    ///
    /// # Errors
    /// Returns `Serialization` if `bytes` is not exactly 48 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != constants::COMMITMENT_PAYLOAD_LEN {
            return Err(BridgeError::Serialization(format!(
                "commitment payload must be {} bytes, got {}",
                constants::COMMITMENT_PAYLOAD_LEN,
                bytes.len()
            )));
        }
        let mut root = [0u8; 32];
        root.copy_from_slice(&bytes[..32]);
        let mut total = [0u8; 16];
        total.copy_from_slice(&bytes[32..]);
        Ok(Self {
            root: RootHash(root),
            total: u128::from_be_bytes(total),
        })
    }
}

/// Emitted when a pending batch is committed.
///
/// Carries the relayed [`Commitment`] plus local metadata that never
/// crosses domains. Relayers and bonders use `transfer_ids` to build
/// inclusion proofs and settlement batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentEvent {
    /// Domain the batch is bound for.
    pub destination: DomainId,
    /// Merkle root over the batch.
    pub root: RootHash,
    /// Sum of the batch's transfer amounts.
    pub amount: u128,
    /// The batch's transfer ids in append order (the Merkle leaves).
    pub transfer_ids: Vec<TransferId>,
    /// When the batch was committed.
    pub committed_at: DateTime<Utc>,
}

impl CommitmentEvent {
    /// The cross-domain payload of this event.
    #[must_use]
    pub fn payload(&self) -> Commitment {
        Commitment {
            root: self.root,
            total: self.amount,
        }
    }

    /// Number of transfers in the batch.
    #[must_use]
    pub fn transfer_count(&self) -> usize {
        self.transfer_ids.len()
    }

    /// Position of `id` among the batch's leaves.
    #[must_use]
    pub fn position(&self, id: &TransferId) -> Option<usize> {
        self.transfer_ids.iter().position(|t| t == id)
    }

    /// Whether the batch was empty (the destination will reject it).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.transfer_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_layout() {
        let c = Commitment {
            root: RootHash([0xAA; 32]),
            total: 900,
        };
        let bytes = c.to_bytes();
        assert_eq!(&bytes[..32], &[0xAA; 32]);
        assert_eq!(&bytes[32..], &900u128.to_be_bytes());
        assert_eq!(Commitment::from_bytes(&bytes).unwrap(), c);
    }

    #[test]
    fn payload_rejects_bad_length() {
        let err = Commitment::from_bytes(&[0u8; 47]).unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }

    #[test]
    fn event_payload_and_degenerate() {
        let ev = CommitmentEvent {
            destination: DomainId(2),
            root: RootHash::ZERO,
            amount: 0,
            transfer_ids: Vec::new(),
            committed_at: Utc::now(),
        };
        assert!(ev.is_degenerate());
        assert_eq!(ev.transfer_count(), 0);
        assert_eq!(ev.position(&TransferId([1; 32])), None);
        assert_eq!(ev.payload().total, 0);
    }
}
