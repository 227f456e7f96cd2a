//! Token payout collaborator.
//!
//! Token movement is external to the core. The destination ledger decides
//! who is owed what and hands each payment to a [`PayoutSink`].

use std::collections::HashMap;

use bondbridge_types::AccountId;

/// Receives payments the destination ledger has authorized.
pub trait PayoutSink {
    /// Pay `amount` to `to`. Called only after every check has passed.
    fn pay(&mut self, to: &AccountId, amount: u128);
}

/// Balances kept in memory, for tests and simulators.
#[derive(Debug, Default)]
pub struct InMemoryPayouts {
    balances: HashMap<AccountId, u128>,
    total_paid: u128,
    payments: u64,
}

impl InMemoryPayouts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total received by `account`.
    #[must_use]
    pub fn balance(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Sum of every payment made.
    #[must_use]
    pub fn total_paid(&self) -> u128 {
        self.total_paid
    }

    /// Number of non-zero payments made.
    #[must_use]
    pub fn payments(&self) -> u64 {
        self.payments
    }
}

impl PayoutSink for InMemoryPayouts {
    fn pay(&mut self, to: &AccountId, amount: u128) {
        if amount == 0 {
            return;
        }
        let entry = self.balances.entry(*to).or_insert(0);
        *entry = entry.saturating_add(amount);
        self.total_paid = self.total_paid.saturating_add(amount);
        self.payments += 1;
    }
}
