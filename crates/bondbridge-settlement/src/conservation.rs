//! Payout conservation invariant checker.
//!
//! Every unit the destination ledger authorizes for a transfer (net amount
//! to the recipient plus relayer fee) is accounted for exactly once:
//! ```text
//! fulfilled == Σ roots.amount_withdrawn + Σ outstanding bonds
//! ```
//! A direct withdrawal adds to both sides at once. A bond adds to
//! `fulfilled` and to the outstanding bonds; settlement then moves the
//! bonded amount into `amount_withdrawn` without changing the sum.
//!
//! If the equation ever breaks the ledger has paid something it cannot
//! account for, and the caller should stop accepting operations.

use bondbridge_types::{BridgeError, Result};

/// Running total of transfer value paid out.
#[derive(Debug, Default)]
pub struct PayoutConservation {
    fulfilled: u128,
}

impl PayoutConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a transfer of `amount` was paid out.
    pub fn record_fulfilment(&mut self, amount: u128) {
        self.fulfilled = self.fulfilled.saturating_add(amount);
    }

    /// Total transfer value paid out so far.
    #[must_use]
    pub fn fulfilled(&self) -> u128 {
        self.fulfilled
    }

    /// Verify `fulfilled` against the ledgers' view.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvariantViolation`] if they differ.
    pub fn verify(&self, total_withdrawn: u128, outstanding_bonds: u128) -> Result<()> {
        let accounted = total_withdrawn.saturating_add(outstanding_bonds);
        if accounted != self.fulfilled {
            return Err(BridgeError::InvariantViolation {
                reason: format!(
                    "fulfilled {} != accounted {accounted} (withdrawn={total_withdrawn}, bonded={outstanding_bonds})",
                    self.fulfilled
                ),
            });
        }
        Ok(())
    }
}
