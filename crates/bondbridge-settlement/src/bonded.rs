//! Outstanding bonded withdrawals.
//!
//! Maps a transfer id to the amount the bonder advanced for it. The entry
//! is non-zero from the bond until the batch containing the transfer is
//! settled, after which it reads zero again.

use std::collections::HashMap;

use bondbridge_types::{BridgeError, Result, TransferId};

/// Amounts advanced by the bonder and not yet settled against a root.
#[derive(Debug, Default)]
pub struct BondedWithdrawals {
    bonded: HashMap<TransferId, u128>,
    /// Sum of all outstanding entries.
    outstanding: u128,
}

impl BondedWithdrawals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount currently bonded for `transfer_id` (zero if none).
    #[must_use]
    pub fn amount(&self, transfer_id: &TransferId) -> u128 {
        self.bonded.get(transfer_id).copied().unwrap_or(0)
    }

    /// # Errors
    /// Returns `AlreadyBonded` if the transfer has an outstanding bond.
    pub fn ensure_unbonded(&self, transfer_id: &TransferId) -> Result<()> {
        if self.amount(transfer_id) > 0 {
            return Err(BridgeError::AlreadyBonded(*transfer_id));
        }
        Ok(())
    }

    /// Record a bond of `amount` for `transfer_id`.
    ///
    /// # Errors
    /// - `ZeroAmount` for a zero bond
    /// - `AlreadyBonded` if the transfer has an outstanding bond
    /// - `AmountOverflow` if the outstanding sum would overflow
    pub fn bond(&mut self, transfer_id: TransferId, amount: u128) -> Result<()> {
        if amount == 0 {
            return Err(BridgeError::ZeroAmount);
        }
        self.ensure_unbonded(&transfer_id)?;
        let outstanding = self
            .outstanding
            .checked_add(amount)
            .ok_or(BridgeError::AmountOverflow)?;
        self.bonded.insert(transfer_id, amount);
        self.outstanding = outstanding;
        Ok(())
    }

    /// Zero the entry for `transfer_id`, returning what was bonded.
    pub fn release(&mut self, transfer_id: &TransferId) -> u128 {
        let amount = self.bonded.remove(transfer_id).unwrap_or(0);
        self.outstanding -= amount;
        amount
    }

    /// Sum of all outstanding bonds.
    #[must_use]
    pub fn outstanding(&self) -> u128 {
        self.outstanding
    }

    /// Number of transfers with an outstanding bond.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bonded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonded.is_empty()
    }
}
