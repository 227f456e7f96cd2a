//! Per-root withdrawal accounting.
//!
//! A [`TransferRoot`] tracks how much of a committed batch has been paid
//! out. `amount_withdrawn` only grows and never passes `total`.

use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result, RootHash};

/// Accounting entry for one committed root on the destination domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRoot {
    /// Declared batch value. Zero means "not recorded yet".
    pub total: u128,
    /// Value already paid out against this root.
    pub amount_withdrawn: u128,
}

impl TransferRoot {
    /// Whether a total has been recorded.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.total > 0
    }

    /// Value still withdrawable against this root.
    #[must_use]
    pub fn remaining(&self) -> u128 {
        self.total.saturating_sub(self.amount_withdrawn)
    }

    /// Whether the whole total has been withdrawn.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.is_set() && self.amount_withdrawn == self.total
    }

    /// Compute the withdrawn amount after taking `amount` more, without
    /// mutating.
    ///
    /// # Errors
    /// Returns `WithdrawalExceedsTotal` if the result would pass `total`.
    pub fn checked_withdraw(&self, root: RootHash, amount: u128) -> Result<u128> {
        let exceeds = || BridgeError::WithdrawalExceedsTotal {
            root,
            total: self.total,
            withdrawn: self.amount_withdrawn,
            requested: amount,
        };
        let next = self.amount_withdrawn.checked_add(amount).ok_or_else(exceeds)?;
        if next > self.total {
            return Err(exceeds());
        }
        Ok(next)
    }
}
