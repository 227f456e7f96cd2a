//! Transfer model and the transfer identity codec.
//!
//! A [`Transfer`] is identified everywhere by its [`TransferId`]: a SHA-256
//! digest over every field in a fixed order and width. The layout is part
//! of the cross-domain wire contract, so source and destination must agree
//! on it byte for byte:
//!
//! ```text
//! tag "bondbridge:transfer_id:v1:"
//! destination_domain_id  u64  big-endian   8
//! sender                 [u8; 32]          32
//! recipient              [u8; 32]          32
//! amount                 u128 big-endian   16
//! nonce                  u64  big-endian   8
//! relayer_fee            u128 big-endian   16
//! min_swap_out           u128 big-endian   16
//! swap_deadline          u64  big-endian   8
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, BridgeError, DomainId, Result, TransferId, constants};

/// A requested value movement from a source domain to a destination domain.
///
/// Immutable once created. Two transfers are the same entity iff their
/// [`TransferId`]s match; `nonce` exists only to tell otherwise identical
/// transfers apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// Domain the value is redeemed on.
    pub destination_domain_id: DomainId,
    /// Account that sent the value on the source domain.
    pub sender: AccountId,
    /// Account that receives the value on the destination domain.
    pub recipient: AccountId,
    /// Gross amount, relayer fee included.
    pub amount: u128,
    /// Caller-chosen uniqueness nonce.
    pub nonce: u64,
    /// Portion of `amount` paid to whoever relays the withdrawal.
    pub relayer_fee: u128,
    /// Minimum output of an optional destination-side swap (0 = no swap).
    pub min_swap_out: u128,
    /// Deadline of an optional destination-side swap (0 = no swap).
    pub swap_deadline: u64,
}

impl Transfer {
    /// Compute this transfer's canonical [`TransferId`].
    #[must_use]
    pub fn id(&self) -> TransferId {
        transfer_id(
            self.destination_domain_id,
            &self.sender,
            &self.recipient,
            self.amount,
            self.nonce,
            self.relayer_fee,
            self.min_swap_out,
            self.swap_deadline,
        )
    }

    /// Amount delivered to the recipient once the relayer fee is taken.
    #[must_use]
    pub fn net_amount(&self) -> u128 {
        self.amount.saturating_sub(self.relayer_fee)
    }

    /// Whether the transfer requests a destination-side swap.
    #[must_use]
    pub fn has_swap(&self) -> bool {
        self.min_swap_out != 0 || self.swap_deadline != 0
    }

    /// Structural checks applied before a transfer enters a batch.
    ///
    /// # Errors
    /// - `ZeroAmount` if `amount == 0`
    /// - `RelayerFeeExceedsAmount` if `relayer_fee > amount`
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(BridgeError::ZeroAmount);
        }
        if self.relayer_fee > self.amount {
            return Err(BridgeError::RelayerFeeExceedsAmount {
                amount: self.amount,
                relayer_fee: self.relayer_fee,
            });
        }
        Ok(())
    }

    /// A transfer between random accounts, for tests.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn dummy(destination: DomainId, amount: u128) -> Self {
        Self {
            destination_domain_id: destination,
            sender: AccountId::random(),
            recipient: AccountId::random(),
            amount,
            nonce: rand::random(),
            relayer_fee: 0,
            min_swap_out: 0,
            swap_deadline: 0,
        }
    }
}

/// Serialize the transfer fields into the fixed-width preimage (tag excluded).
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn transfer_id_preimage(
    destination_domain_id: DomainId,
    sender: &AccountId,
    recipient: &AccountId,
    amount: u128,
    nonce: u64,
    relayer_fee: u128,
    min_swap_out: u128,
    swap_deadline: u64,
) -> [u8; constants::TRANSFER_ID_PREIMAGE_LEN] {
    let mut data = [0u8; constants::TRANSFER_ID_PREIMAGE_LEN];
    data[0..8].copy_from_slice(&destination_domain_id.0.to_be_bytes());
    data[8..40].copy_from_slice(sender.as_bytes());
    data[40..72].copy_from_slice(recipient.as_bytes());
    data[72..88].copy_from_slice(&amount.to_be_bytes());
    data[88..96].copy_from_slice(&nonce.to_be_bytes());
    data[96..112].copy_from_slice(&relayer_fee.to_be_bytes());
    data[112..128].copy_from_slice(&min_swap_out.to_be_bytes());
    data[128..136].copy_from_slice(&swap_deadline.to_be_bytes());
    data
}

/// Compute the canonical [`TransferId`] from raw transfer fields.
///
/// Pure and deterministic; any change to a field, its width or its
/// position changes every downstream id.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn transfer_id(
    destination_domain_id: DomainId,
    sender: &AccountId,
    recipient: &AccountId,
    amount: u128,
    nonce: u64,
    relayer_fee: u128,
    min_swap_out: u128,
    swap_deadline: u64,
) -> TransferId {
    let preimage = transfer_id_preimage(
        destination_domain_id,
        sender,
        recipient,
        amount,
        nonce,
        relayer_fee,
        min_swap_out,
        swap_deadline,
    );
    let mut hasher = Sha256::new();
    hasher.update(constants::TRANSFER_ID_TAG);
    hasher.update(preimage);
    TransferId(hasher.finalize().into())
}
