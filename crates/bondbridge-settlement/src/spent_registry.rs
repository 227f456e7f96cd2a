//! Spent-transfer registry: prevents paying the same transfer twice.
//!
//! Once a transfer id is marked spent it stays spent. Unlike a bounded
//! cache, nothing is ever evicted: an evicted id could be withdrawn again.

use std::collections::HashSet;

use bondbridge_types::{BridgeError, Result, TransferId};

/// Set of transfer ids that have been paid out, directly or by bond.
#[derive(Debug, Default)]
pub struct SpentTransferRegistry {
    spent: HashSet<TransferId>,
}

impl SpentTransferRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a transfer as spent.
    ///
    /// # Errors
    /// Returns [`BridgeError::AlreadySpent`] if `transfer_id` was already
    /// marked. The registry is unchanged in that case.
    pub fn mark_spent(&mut self, transfer_id: TransferId) -> Result<()> {
        if !self.spent.insert(transfer_id) {
            return Err(BridgeError::AlreadySpent(transfer_id));
        }
        Ok(())
    }

    /// Reject a transfer that is already spent, without marking it.
    ///
    /// # Errors
    /// Returns [`BridgeError::AlreadySpent`].
    pub fn ensure_unspent(&self, transfer_id: &TransferId) -> Result<()> {
        if self.is_spent(transfer_id) {
            return Err(BridgeError::AlreadySpent(*transfer_id));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_spent(&self, transfer_id: &TransferId) -> bool {
        self.spent.contains(transfer_id)
    }

    /// Number of spent transfers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
