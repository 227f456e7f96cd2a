//! Source-domain bridge.
//!
//! Owns one [`PendingBatch`] per supported destination and the relay that
//! carries committed roots away. All mutation goes through [`append`] and
//! [`commit`]; both validate before touching state.
//!
//! [`append`]: SourceBridge::append
//! [`commit`]: SourceBridge::commit

use std::collections::{BTreeMap, VecDeque};

use bondbridge_types::{
    AccountId, BridgeError, CommitmentEvent, DomainId, Result, SourceConfig, Transfer, TransferId,
};

use crate::accumulator::PendingBatch;
use crate::relay::MessageRelay;

/// Source-side accumulator of outgoing transfers.
pub struct SourceBridge<R: MessageRelay> {
    /// Domain and batching configuration.
    config: SourceConfig,
    /// One pending batch per supported destination.
    batches: BTreeMap<DomainId, PendingBatch>,
    /// Most recent commitments, oldest first, at most
    /// `commitment_history` of them.
    commitments: VecDeque<CommitmentEvent>,
    /// Transport toward destination domains.
    relay: R,
}

impl<R: MessageRelay> SourceBridge<R> {
    /// Create a bridge for a validated config.
    ///
    /// # Errors
    /// Returns `Configuration` if the config is invalid.
    pub fn new(config: SourceConfig, relay: R) -> Result<Self> {
        config.validate()?;
        let batches = config
            .supported_destinations
            .iter()
            .map(|d| (*d, PendingBatch::new(*d)))
            .collect();
        Ok(Self {
            config,
            batches,
            commitments: VecDeque::new(),
            relay,
        })
    }

    /// Add an outgoing transfer to the pending batch of its destination.
    ///
    /// If that batch already holds `max_pending_transfers` ids it is
    /// committed first, so the new transfer starts the next batch.
    ///
    /// # Errors
    /// - `ZeroAmount` / `RelayerFeeExceedsAmount` for a malformed transfer
    /// - `UnsupportedDomain` if the destination has no batch
    /// - `DuplicateTransfer` if the transfer is already pending
    /// - `AmountOverflow` if the batch amount would overflow
    pub fn append(&mut self, transfer: &Transfer) -> Result<TransferId> {
        transfer.validate()?;
        let destination = transfer.destination_domain_id;
        let batch = self
            .batches
            .get(&destination)
            .ok_or(BridgeError::UnsupportedDomain(destination))?;
        let id = transfer.id();
        // Checked before a capacity commit could move the original away.
        if batch.contains(&id) {
            return Err(BridgeError::DuplicateTransfer(id));
        }
        let full = batch.len() >= self.config.max_pending_transfers;

        if full {
            tracing::info!(
                destination = %destination,
                max = self.config.max_pending_transfers,
                "Pending batch full, committing before append"
            );
            self.commit(destination)?;
        }

        self.batch_mut(destination)?.append(transfer)
    }

    /// Commit the pending batch for `destination` and dispatch its
    /// `(root, amount)` payload to the relay.
    ///
    /// # Errors
    /// Returns `UnsupportedDomain` if the destination has no batch.
    pub fn commit(&mut self, destination: DomainId) -> Result<CommitmentEvent> {
        let event = self.batch_mut(destination)?.commit();

        if event.is_degenerate() {
            tracing::warn!(
                destination = %destination,
                "Committed an empty batch; the destination will reject its zero total"
            );
        }
        tracing::info!(
            destination = %destination,
            root = hex::encode(event.root.as_bytes()),
            amount = event.amount,
            transfers = event.transfer_count(),
            "Transfers committed"
        );

        self.relay.dispatch(destination, event.payload());
        if self.config.commitment_history > 0 {
            if self.commitments.len() >= self.config.commitment_history {
                self.commitments.pop_front();
            }
            self.commitments.push_back(event.clone());
        }
        Ok(event)
    }

    /// Canonical id of a transfer described by its raw fields.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn get_transfer_id(
        &self,
        destination: DomainId,
        sender: &AccountId,
        recipient: &AccountId,
        amount: u128,
        nonce: u64,
        relayer_fee: u128,
        min_swap_out: u128,
        swap_deadline: u64,
    ) -> TransferId {
        bondbridge_types::transfer_id(
            destination,
            sender,
            recipient,
            amount,
            nonce,
            relayer_fee,
            min_swap_out,
            swap_deadline,
        )
    }

    /// Amount pending for `destination` (zero for unknown destinations).
    #[must_use]
    pub fn pending_amount(&self, destination: DomainId) -> u128 {
        self.batches
            .get(&destination)
            .map_or(0, PendingBatch::pending_amount)
    }

    /// Transfer ids pending for `destination`, in append order.
    #[must_use]
    pub fn pending_transfer_ids(&self, destination: DomainId) -> &[TransferId] {
        self.batches
            .get(&destination)
            .map(PendingBatch::transfer_ids)
            .unwrap_or(&[])
    }

    /// Recently emitted commitments, oldest first.
    #[must_use]
    pub fn commitments(&self) -> &VecDeque<CommitmentEvent> {
        &self.commitments
    }

    /// Take the retained commitments, leaving the history empty.
    pub fn drain_commitments(&mut self) -> Vec<CommitmentEvent> {
        self.commitments.drain(..).collect()
    }

    #[must_use]
    pub fn domain_id(&self) -> DomainId {
        self.config.domain_id
    }

    #[must_use]
    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn relay_mut(&mut self) -> &mut R {
        &mut self.relay
    }

    fn batch_mut(&mut self, destination: DomainId) -> Result<&mut PendingBatch> {
        self.batches
            .get_mut(&destination)
            .ok_or(BridgeError::UnsupportedDomain(destination))
    }
}
