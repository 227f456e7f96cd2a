//! Pending batch for outgoing transfers.
//!
//! Transfers are appended in arrival order. A commit atomically drains the
//! batch and turns it into a [`CommitmentEvent`] whose root is the Merkle
//! root over the exact append order. A transfer id appears at most once per
//! batch.

use std::collections::HashSet;

use bondbridge_merkle::transfer_root;
use bondbridge_types::{BridgeError, CommitmentEvent, DomainId, Result, Transfer, TransferId};
use chrono::Utc;

/// Collects transfer ids bound for one destination until the next commit.
pub struct PendingBatch {
    /// Destination every transfer in this batch is bound for.
    destination: DomainId,
    /// Transfer ids in append order.
    transfer_ids: Vec<TransferId>,
    /// Same ids, for duplicate checks.
    pending: HashSet<TransferId>,
    /// Sum of the appended amounts.
    pending_amount: u128,
}

impl PendingBatch {
    /// Create an empty batch for `destination`.
    #[must_use]
    pub fn new(destination: DomainId) -> Self {
        Self {
            destination,
            transfer_ids: Vec::new(),
            pending: HashSet::new(),
            pending_amount: 0,
        }
    }

    /// Record an outgoing transfer.
    ///
    /// # Errors
    /// - `WrongDestinationDomain` if the transfer is bound elsewhere
    /// - `DuplicateTransfer` if the same transfer is already pending
    /// - `AmountOverflow` if the running amount would overflow
    pub fn append(&mut self, transfer: &Transfer) -> Result<TransferId> {
        if transfer.destination_domain_id != self.destination {
            return Err(BridgeError::WrongDestinationDomain {
                expected: self.destination,
                actual: transfer.destination_domain_id,
            });
        }
        let id = transfer.id();
        if self.contains(&id) {
            return Err(BridgeError::DuplicateTransfer(id));
        }
        let pending_amount = self
            .pending_amount
            .checked_add(transfer.amount)
            .ok_or(BridgeError::AmountOverflow)?;

        self.pending.insert(id);
        self.transfer_ids.push(id);
        self.pending_amount = pending_amount;

        tracing::debug!(
            transfer_id = %id,
            destination = %self.destination,
            amount = transfer.amount,
            pending = self.transfer_ids.len(),
            "Transfer appended to pending batch"
        );
        Ok(id)
    }

    /// Drain the batch into a commitment.
    ///
    /// The batch is empty afterwards. Committing an empty batch yields a
    /// zero root and zero amount, which the destination rejects.
    pub fn commit(&mut self) -> CommitmentEvent {
        let transfer_ids = std::mem::take(&mut self.transfer_ids);
        let amount = std::mem::take(&mut self.pending_amount);
        self.pending.clear();
        let root = transfer_root(&transfer_ids);

        CommitmentEvent {
            destination: self.destination,
            root,
            amount,
            transfer_ids,
            committed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn destination(&self) -> DomainId {
        self.destination
    }

    /// Sum of the appended amounts.
    #[must_use]
    pub fn pending_amount(&self) -> u128 {
        self.pending_amount
    }

    /// Transfer ids in append order.
    #[must_use]
    pub fn transfer_ids(&self) -> &[TransferId] {
        &self.transfer_ids
    }

    /// Whether `id` is already in this batch.
    #[must_use]
    pub fn contains(&self, id: &TransferId) -> bool {
        self.pending.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transfer_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfer_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondbridge_merkle::{transfer_proof, verify};
    use bondbridge_types::RootHash;

    const DEST: DomainId = DomainId(2);

    #[test]
    fn append_tracks_ids_and_amount() {
        let mut batch = PendingBatch::new(DEST);
        let a = Transfer::dummy(DEST, 300);
        let b = Transfer::dummy(DEST, 200);
        assert_eq!(batch.append(&a).unwrap(), a.id());
        assert_eq!(batch.append(&b).unwrap(), b.id());
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.pending_amount(), 500);
        assert_eq!(batch.transfer_ids(), &[a.id(), b.id()]);
    }

    #[test]
    fn append_rejects_other_destination() {
        let mut batch = PendingBatch::new(DEST);
        let err = batch.append(&Transfer::dummy(DomainId(3), 1)).unwrap_err();
        assert!(matches!(err, BridgeError::WrongDestinationDomain { .. }));
        assert!(batch.is_empty());
    }

    #[test]
    fn append_overflow_leaves_batch_untouched() {
        let mut batch = PendingBatch::new(DEST);
        batch.append(&Transfer::dummy(DEST, u128::MAX)).unwrap();
        let err = batch.append(&Transfer::dummy(DEST, 1)).unwrap_err();
        assert!(matches!(err, BridgeError::AmountOverflow));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.pending_amount(), u128::MAX);
    }

    #[test]
    fn duplicate_transfer_rejected() {
        let mut batch = PendingBatch::new(DEST);
        let t = Transfer::dummy(DEST, 300);
        batch.append(&t).unwrap();
        let err = batch.append(&t).unwrap_err();
        assert_eq!(err, BridgeError::DuplicateTransfer(t.id()));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.pending_amount(), 300);

        let event = batch.commit();
        assert_eq!(event.amount, 300);
        assert_eq!(event.transfer_ids, vec![t.id()]);
    }

    #[test]
    fn same_transfer_allowed_again_after_commit() {
        let mut batch = PendingBatch::new(DEST);
        let t = Transfer::dummy(DEST, 5);
        batch.append(&t).unwrap();
        batch.commit();
        assert!(!batch.contains(&t.id()));
        batch.append(&t).unwrap();
        assert_eq!(batch.pending_amount(), 5);
    }

    #[test]
    fn commit_drains_and_roots_in_order() {
        let mut batch = PendingBatch::new(DEST);
        let transfers: Vec<Transfer> = (0..3).map(|_| Transfer::dummy(DEST, 300)).collect();
        for t in &transfers {
            batch.append(t).unwrap();
        }
        let ids: Vec<TransferId> = transfers.iter().map(Transfer::id).collect();

        let event = batch.commit();
        assert!(batch.is_empty());
        assert_eq!(batch.pending_amount(), 0);
        assert_eq!(event.amount, 900);
        assert_eq!(event.transfer_ids, ids);
        assert_eq!(event.root, transfer_root(&ids));

        let proof = transfer_proof(&event.transfer_ids, 1).unwrap();
        assert!(verify(&proof, event.root.as_bytes(), ids[1].as_bytes()));
    }

    #[test]
    fn reordering_changes_root() {
        let a = Transfer::dummy(DEST, 1);
        let b = Transfer::dummy(DEST, 2);

        let mut first = PendingBatch::new(DEST);
        first.append(&a).unwrap();
        first.append(&b).unwrap();

        let mut second = PendingBatch::new(DEST);
        second.append(&b).unwrap();
        second.append(&a).unwrap();

        assert_ne!(first.commit().root, second.commit().root);
    }

    #[test]
    fn empty_commit_is_degenerate() {
        let mut batch = PendingBatch::new(DEST);
        let event = batch.commit();
        assert!(event.is_degenerate());
        assert_eq!(event.root, RootHash::ZERO);
        assert_eq!(event.amount, 0);
    }

    #[test]
    fn batch_is_reusable_after_commit() {
        let mut batch = PendingBatch::new(DEST);
        batch.append(&Transfer::dummy(DEST, 5)).unwrap();
        let first = batch.commit();
        let t = Transfer::dummy(DEST, 7);
        batch.append(&t).unwrap();
        let second = batch.commit();
        assert_eq!(second.amount, 7);
        assert_eq!(second.transfer_ids, vec![t.id()]);
        assert_ne!(first.root, second.root);
    }
}
