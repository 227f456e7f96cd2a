//! Bonder collateral accounting.
//!
//! The bonder's position is two monotone counters: `credit` (stake plus
//! released bonds plus fees earned) and `debit` (outstanding and past
//! advances plus withdrawn stake). The balance `credit - debit` never goes
//! negative; every debit is checked against it before it is applied.

use bondbridge_types::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/// Snapshot of the bonder's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonderBalance {
    pub credit: u128,
    pub debit: u128,
}

impl BonderBalance {
    /// Collateral available for new bonds or unstaking.
    #[must_use]
    pub fn available(&self) -> u128 {
        self.credit.saturating_sub(self.debit)
    }
}

/// Credit/debit ledger for the designated bonder.
///
/// Both counters only grow. All mutations are atomic: either the full
/// operation succeeds or the counters are unchanged.
#[derive(Debug, Default)]
pub struct BonderAccount {
    balance: BonderBalance,
}

impl BonderAccount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the bonder's credit.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if credit would overflow.
    pub fn add_credit(&mut self, amount: u128) -> Result<()> {
        self.balance.credit = self.credited(amount)?;
        Ok(())
    }

    /// Check that `amount` can be credited.
    ///
    /// # Errors
    /// Returns `AmountOverflow`.
    pub fn ensure_can_credit(&self, amount: u128) -> Result<()> {
        self.credited(amount).map(|_| ())
    }

    /// Add to the bonder's debit, keeping the balance non-negative.
    ///
    /// # Errors
    /// Returns `InsufficientBonderBalance` if `debit + amount` would pass
    /// `credit`.
    pub fn add_debit(&mut self, amount: u128) -> Result<()> {
        self.balance.debit = self.debited(amount)?;
        Ok(())
    }

    /// Check that `amount` can be debited.
    ///
    /// # Errors
    /// Returns `InsufficientBonderBalance`.
    pub fn ensure_can_debit(&self, amount: u128) -> Result<()> {
        self.debited(amount).map(|_| ())
    }

    /// # Errors
    /// Returns `InsufficientBonderBalance` if debit exceeds credit.
    pub fn require_positive_balance(&self) -> Result<()> {
        if self.balance.debit > self.balance.credit {
            return Err(self.insufficient(0));
        }
        Ok(())
    }

    #[must_use]
    pub fn balance(&self) -> BonderBalance {
        self.balance
    }

    #[must_use]
    pub fn available(&self) -> u128 {
        self.balance.available()
    }

    fn credited(&self, amount: u128) -> Result<u128> {
        self.balance
            .credit
            .checked_add(amount)
            .ok_or(BridgeError::AmountOverflow)
    }

    fn debited(&self, amount: u128) -> Result<u128> {
        self.balance
            .debit
            .checked_add(amount)
            .filter(|debit| *debit <= self.balance.credit)
            .ok_or_else(|| self.insufficient(amount))
    }

    fn insufficient(&self, requested: u128) -> BridgeError {
        BridgeError::InsufficientBonderBalance {
            credit: self.balance.credit,
            debit: self.balance.debit,
            requested,
        }
    }
}
