//! Destination-domain bridge.
//!
//! Owns every destination ledger (roots, spent transfers, bonds, bonder
//! collateral) and the payout sink. Each operation runs in two phases:
//! a `check_*` pass that reads state and returns everything the mutation
//! needs, then an apply pass whose steps cannot fail once the checks have
//! passed. A rejected call therefore changes nothing.
//!
//! Direct withdrawal:
//! 1. Transfer is well-formed and bound for this domain
//! 2. Proof leads from the transfer id to the claimed root
//! 3. Root has a recorded total
//! 4. Transfer is not spent
//! 5. Root has room for the full amount
//! 6. Apply: mark spent, count against the root, pay recipient and relayer

use std::collections::HashSet;

use bondbridge_merkle::{MerkleProof, transfer_root};
use bondbridge_types::{
    AccountId, BridgeError, Commitment, DestinationConfig, DomainId, Result, RootHash,
    SignedBondRequest, SignedUnstakeRequest, Transfer, TransferId, TransferRoot, constants,
};
use ed25519_dalek::VerifyingKey;

use crate::bonded::BondedWithdrawals;
use crate::bonder_account::{BonderAccount, BonderBalance};
use crate::conservation::PayoutConservation;
use crate::payout::PayoutSink;
use crate::root_ledger::TransferRootLedger;
use crate::spent_registry::SpentTransferRegistry;

/// Where a relayer fee ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeeRoute {
    /// Paid as tokens to the submitting relayer.
    Tokens(AccountId),
    /// Added to the bonder's credit (the relayer is the bonder).
    BonderCredit,
}

/// A settlement that passed every check.
struct SettlementPlan {
    root: RootHash,
    aggregate: u128,
    ids: Vec<TransferId>,
}

/// Destination-side ledger for one domain.
pub struct DestinationBridge<P: PayoutSink> {
    domain_id: DomainId,
    bonder_account: AccountId,
    bonder_key: VerifyingKey,
    roots: TransferRootLedger,
    spent: SpentTransferRegistry,
    bonds: BondedWithdrawals,
    bonder: BonderAccount,
    /// Unstake nonces already consumed.
    unstake_nonces: HashSet<u64>,
    conservation: PayoutConservation,
    payouts: P,
}

impl<P: PayoutSink> DestinationBridge<P> {
    /// Create an empty ledger for `config`.
    ///
    /// # Errors
    /// Returns `Configuration` if the bonder key does not decode.
    pub fn new(config: DestinationConfig, payouts: P) -> Result<Self> {
        let bonder_key = config.bonder.verifying_key()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            domain = %config.domain_id,
            bonder = %config.bonder.account,
            "Destination ledger initialised"
        );
        Ok(Self {
            domain_id: config.domain_id,
            bonder_account: config.bonder.account,
            bonder_key,
            roots: TransferRootLedger::new(),
            spent: SpentTransferRegistry::new(),
            bonds: BondedWithdrawals::new(),
            bonder: BonderAccount::new(),
            unstake_nonces: HashSet::new(),
            conservation: PayoutConservation::new(),
            payouts,
        })
    }

    // ---------------------------------------------------------------------
    // Root ledger
    // ---------------------------------------------------------------------

    /// Apply a relayed commitment payload.
    ///
    /// Redelivery of a payload already applied yields `RootAlreadySet` and
    /// changes nothing, so at-least-once delivery is safe.
    ///
    /// # Errors
    /// `Serialization` for a malformed payload, otherwise as [`set_total`].
    ///
    /// [`set_total`]: DestinationBridge::set_total
    pub fn receive_commitment(&mut self, payload: &[u8]) -> Result<RootHash> {
        let commitment = Commitment::from_bytes(payload)?;
        self.set_total(commitment.root, commitment.total)?;
        Ok(commitment.root)
    }

    /// Record the total of a committed root.
    ///
    /// # Errors
    /// - `ZeroTotal` if `total` is zero
    /// - `RootAlreadySet` if the root already has a total
    pub fn set_total(&mut self, root: RootHash, total: u128) -> Result<()> {
        self.roots.set_total(root, total).inspect_err(|err| {
            tracing::warn!(root = hex::encode(root.as_bytes()), total, %err, "set_total rejected");
        })?;
        tracing::info!(
            domain = %self.domain_id,
            root = hex::encode(root.as_bytes()),
            total,
            "Transfer root recorded"
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Direct withdrawal
    // ---------------------------------------------------------------------

    /// Pay out `transfer` against `root` using an inclusion proof.
    ///
    /// The recipient receives `amount - relayer_fee`. The fee goes to
    /// `relayer` as tokens, or onto the bonder's credit when `relayer` is
    /// the bonder account. The root is charged the full amount.
    ///
    /// # Errors
    /// - `WrongDestinationDomain`, `ZeroAmount`, `RelayerFeeExceedsAmount`
    ///   for a transfer this ledger cannot pay
    /// - `InvalidProof` if the proof does not lead to `root`
    /// - `RootNotFound` if `root` has no total
    /// - `AlreadySpent` if the transfer was already paid
    /// - `WithdrawalExceedsTotal` if the root has no room left
    pub fn withdraw_direct(
        &mut self,
        transfer: &Transfer,
        root: RootHash,
        proof: &MerkleProof,
        relayer: &AccountId,
    ) -> Result<TransferId> {
        let (id, fee_route) = self
            .check_direct(transfer, root, proof, relayer)
            .inspect_err(|err| {
                tracing::warn!(root = hex::encode(root.as_bytes()), %err, "Direct withdrawal rejected");
            })?;

        self.spent.mark_spent(id)?;
        self.roots.add_to_amount_withdrawn(&root, transfer.amount)?;
        if fee_route == FeeRoute::BonderCredit {
            self.bonder.add_credit(transfer.relayer_fee)?;
        }
        self.payouts.pay(&transfer.recipient, transfer.net_amount());
        if let FeeRoute::Tokens(relayer) = fee_route {
            self.payouts.pay(&relayer, transfer.relayer_fee);
        }
        self.conservation.record_fulfilment(transfer.amount);

        tracing::info!(
            transfer_id = %id,
            root = hex::encode(root.as_bytes()),
            amount = transfer.amount,
            relayer_fee = transfer.relayer_fee,
            fee_to_bonder = fee_route == FeeRoute::BonderCredit,
            "Direct withdrawal paid"
        );
        Ok(id)
    }

    fn check_direct(
        &self,
        transfer: &Transfer,
        root: RootHash,
        proof: &MerkleProof,
        relayer: &AccountId,
    ) -> Result<(TransferId, FeeRoute)> {
        self.ensure_destination(transfer)?;
        transfer.validate()?;
        let id = transfer.id();
        if !proof.verify_transfer(&root, &id) {
            return Err(BridgeError::InvalidProof(id));
        }
        self.roots.require(&root)?;
        self.spent.ensure_unspent(&id)?;
        self.roots.ensure_can_withdraw(&root, transfer.amount)?;

        let fee_route = if *relayer == self.bonder_account {
            self.bonder.ensure_can_credit(transfer.relayer_fee)?;
            FeeRoute::BonderCredit
        } else {
            FeeRoute::Tokens(*relayer)
        };
        Ok((id, fee_route))
    }

    // ---------------------------------------------------------------------
    // Bonded withdrawal
    // ---------------------------------------------------------------------

    /// Advance a transfer from the bonder's collateral before its root
    /// arrives.
    ///
    /// Debits the bonder by `transfer.amount`, records the bond, marks the
    /// transfer spent, and pays the recipient `amount - relayer_fee` and
    /// the bonder account the fee.
    ///
    /// # Errors
    /// - `Unauthorized` if the request is not signed by the bonder
    /// - `WrongDestinationDomain`, `ZeroAmount`, `RelayerFeeExceedsAmount`
    /// - `AlreadyBonded` if the transfer already has a bond
    /// - `AlreadySpent` if the transfer was already paid
    /// - `InsufficientBonderBalance` if the debit would pass the credit
    pub fn bond_withdrawal(&mut self, request: &SignedBondRequest) -> Result<TransferId> {
        let id = self.check_bond(request).inspect_err(|err| {
            tracing::warn!(%err, "Bonded withdrawal rejected");
        })?;
        let transfer = request.transfer();

        self.bonder.add_debit(transfer.amount)?;
        self.bonds.bond(id, transfer.amount)?;
        self.spent.mark_spent(id)?;
        self.payouts.pay(&transfer.recipient, transfer.net_amount());
        self.payouts.pay(&self.bonder_account, transfer.relayer_fee);
        self.conservation.record_fulfilment(transfer.amount);

        tracing::info!(
            transfer_id = %id,
            amount = transfer.amount,
            bonder_available = self.bonder.available(),
            "Withdrawal bonded"
        );
        Ok(id)
    }

    fn check_bond(&self, request: &SignedBondRequest) -> Result<TransferId> {
        request.verify(&self.bonder_key)?;
        let transfer = request.transfer();
        self.ensure_destination(transfer)?;
        transfer.validate()?;
        let id = transfer.id();
        self.bonds.ensure_unbonded(&id)?;
        self.spent.ensure_unspent(&id)?;
        self.bonder.ensure_can_debit(transfer.amount)?;
        Ok(id)
    }

    // ---------------------------------------------------------------------
    // Bonded settlement
    // ---------------------------------------------------------------------

    /// Settle the bonds of a committed batch.
    ///
    /// `transfer_ids` must be the batch's full leaf list in commit order:
    /// the root is rebuilt from it, so the list is its own proof. The
    /// bonded amounts of the listed ids are summed, charged to the root,
    /// released, and credited back to the bonder. Ids without a bond
    /// contribute zero, so settling the same batch twice is a no-op.
    ///
    /// # Errors
    /// - `EmptyBatch` for an empty list
    /// - `RootNotFound` if the rebuilt root has no total
    /// - `WithdrawalExceedsTotal` if the aggregate does not fit the root
    pub fn settle_bonded_batch(&mut self, transfer_ids: &[TransferId]) -> Result<RootHash> {
        let plan = self.check_settlement(transfer_ids).inspect_err(|err| {
            tracing::warn!(transfers = transfer_ids.len(), %err, "Bonded settlement rejected");
        })?;

        self.roots.add_to_amount_withdrawn(&plan.root, plan.aggregate)?;
        self.bonder.add_credit(plan.aggregate)?;
        for id in &plan.ids {
            self.bonds.release(id);
        }

        tracing::info!(
            root = hex::encode(plan.root.as_bytes()),
            aggregate = plan.aggregate,
            settled = plan.ids.len(),
            "Bonded batch settled"
        );
        Ok(plan.root)
    }

    fn check_settlement(&self, transfer_ids: &[TransferId]) -> Result<SettlementPlan> {
        if transfer_ids.is_empty() {
            return Err(BridgeError::EmptyBatch);
        }
        let root = transfer_root(transfer_ids);
        self.roots.require(&root)?;

        let mut seen = HashSet::with_capacity(transfer_ids.len());
        let mut ids = Vec::new();
        let mut aggregate: u128 = 0;
        for id in transfer_ids {
            let bonded = self.bonds.amount(id);
            if bonded == 0 || !seen.insert(*id) {
                continue;
            }
            aggregate = aggregate
                .checked_add(bonded)
                .ok_or(BridgeError::AmountOverflow)?;
            ids.push(*id);
        }

        self.roots.ensure_can_withdraw(&root, aggregate)?;
        self.bonder.ensure_can_credit(aggregate)?;
        Ok(SettlementPlan {
            root,
            aggregate,
            ids,
        })
    }

    // ---------------------------------------------------------------------
    // Bonder stake
    // ---------------------------------------------------------------------

    /// Add collateral to the bonder's credit.
    ///
    /// # Errors
    /// `ZeroAmount` or `AmountOverflow`.
    pub fn stake(&mut self, amount: u128) -> Result<()> {
        if amount == 0 {
            return Err(BridgeError::ZeroAmount);
        }
        self.bonder.add_credit(amount)?;
        tracing::info!(amount, bonder_available = self.bonder.available(), "Bonder staked");
        Ok(())
    }

    /// Withdraw collateral to the bonder account.
    ///
    /// # Errors
    /// - `Unauthorized` for a bad signature or a reused nonce
    /// - `ZeroAmount` for a zero amount
    /// - `InsufficientBonderBalance` if the debit would pass the credit
    pub fn unstake(&mut self, request: &SignedUnstakeRequest) -> Result<()> {
        self.check_unstake(request).inspect_err(|err| {
            tracing::warn!(%err, "Unstake rejected");
        })?;
        let amount = request.request.amount;

        self.bonder.add_debit(amount)?;
        self.unstake_nonces.insert(request.request.nonce);
        self.payouts.pay(&self.bonder_account, amount);

        tracing::info!(amount, bonder_available = self.bonder.available(), "Bonder unstaked");
        Ok(())
    }

    fn check_unstake(&self, request: &SignedUnstakeRequest) -> Result<()> {
        request.verify(&self.bonder_key)?;
        if self.unstake_nonces.contains(&request.request.nonce) {
            return Err(BridgeError::Unauthorized {
                reason: format!("unstake nonce {} already used", request.request.nonce),
            });
        }
        if request.request.amount == 0 {
            return Err(BridgeError::ZeroAmount);
        }
        self.bonder.ensure_can_debit(request.request.amount)
    }

    // ---------------------------------------------------------------------
    // Invariants
    // ---------------------------------------------------------------------

    /// Check that every unit paid out is accounted for by a root or an
    /// outstanding bond, and that the bonder balance is non-negative.
    ///
    /// # Errors
    /// `InvariantViolation` or `InsufficientBonderBalance`.
    pub fn verify_conservation(&self) -> Result<()> {
        self.conservation
            .verify(self.roots.total_withdrawn(), self.bonds.outstanding())?;
        self.bonder.require_positive_balance()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Canonical id of `transfer`.
    #[must_use]
    pub fn get_transfer_id(&self, transfer: &Transfer) -> TransferId {
        transfer.id()
    }

    /// Accounting entry for `root`; unknown roots read as zero.
    #[must_use]
    pub fn get_root(&self, root: &RootHash) -> TransferRoot {
        self.roots.get(root)
    }

    /// Outstanding bond for `transfer_id` (zero if none or settled).
    #[must_use]
    pub fn get_bonded_amount(&self, transfer_id: &TransferId) -> u128 {
        self.bonds.amount(transfer_id)
    }

    #[must_use]
    pub fn is_transfer_spent(&self, transfer_id: &TransferId) -> bool {
        self.spent.is_spent(transfer_id)
    }

    #[must_use]
    pub fn bonder_balance(&self) -> BonderBalance {
        self.bonder.balance()
    }

    /// Value still withdrawable against `root`.
    #[must_use]
    pub fn available_to_withdraw(&self, root: &RootHash) -> u128 {
        self.roots.get(root).remaining()
    }

    #[must_use]
    pub fn domain_id(&self) -> DomainId {
        self.domain_id
    }

    #[must_use]
    pub fn bonder_account(&self) -> AccountId {
        self.bonder_account
    }

    #[must_use]
    pub fn payouts(&self) -> &P {
        &self.payouts
    }

    fn ensure_destination(&self, transfer: &Transfer) -> Result<()> {
        if transfer.destination_domain_id != self.domain_id {
            return Err(BridgeError::WrongDestinationDomain {
                expected: self.domain_id,
                actual: transfer.destination_domain_id,
            });
        }
        Ok(())
    }
}
