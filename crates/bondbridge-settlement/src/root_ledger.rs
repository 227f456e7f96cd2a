//! Transfer root ledger.
//!
//! Maps each committed root to its [`TransferRoot`] entry. A root's total
//! is written once, by the first delivery of its commitment; later
//! deliveries are rejected. `amount_withdrawn` only grows and never passes
//! the total.

use std::collections::HashMap;

use bondbridge_types::{BridgeError, Result, RootHash, TransferRoot};

/// Destination-side record of every root received.
#[derive(Debug, Default)]
pub struct TransferRootLedger {
    roots: HashMap<RootHash, TransferRoot>,
}

impl TransferRootLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the total of a newly delivered root.
    ///
    /// # Errors
    /// - `ZeroTotal` if `total` is zero
    /// - `RootAlreadySet` if the root already has a total
    pub fn set_total(&mut self, root: RootHash, total: u128) -> Result<()> {
        if total == 0 {
            return Err(BridgeError::ZeroTotal);
        }
        if self.get(&root).is_set() {
            return Err(BridgeError::RootAlreadySet(root));
        }
        self.roots.insert(
            root,
            TransferRoot {
                total,
                amount_withdrawn: 0,
            },
        );
        Ok(())
    }

    /// Entry for `root`; unknown roots read as an unset default.
    #[must_use]
    pub fn get(&self, root: &RootHash) -> TransferRoot {
        self.roots.get(root).copied().unwrap_or_default()
    }

    /// Entry for a root that must already have a total.
    ///
    /// # Errors
    /// Returns `RootNotFound`.
    pub fn require(&self, root: &RootHash) -> Result<TransferRoot> {
        let entry = self.get(root);
        if !entry.is_set() {
            return Err(BridgeError::RootNotFound(*root));
        }
        Ok(entry)
    }

    /// Check that `amount` more can be withdrawn against `root`.
    ///
    /// # Errors
    /// `RootNotFound` or `WithdrawalExceedsTotal`.
    pub fn ensure_can_withdraw(&self, root: &RootHash, amount: u128) -> Result<()> {
        self.require(root)?.checked_withdraw(*root, amount).map(|_| ())
    }

    /// Count `amount` against `root`.
    ///
    /// # Errors
    /// `RootNotFound` or `WithdrawalExceedsTotal`; the entry is unchanged.
    pub fn add_to_amount_withdrawn(&mut self, root: &RootHash, amount: u128) -> Result<()> {
        let next = self.require(root)?.checked_withdraw(*root, amount)?;
        if let Some(entry) = self.roots.get_mut(root) {
            entry.amount_withdrawn = next;
        }
        Ok(())
    }

    /// Iterate over every recorded root.
    pub fn iter(&self) -> impl Iterator<Item = (&RootHash, &TransferRoot)> {
        self.roots.iter()
    }

    /// Sum of `amount_withdrawn` across all roots.
    #[must_use]
    pub fn total_withdrawn(&self) -> u128 {
        self.roots
            .values()
            .fold(0u128, |acc, r| acc.saturating_add(r.amount_withdrawn))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
