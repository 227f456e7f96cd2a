//! # bondbridge-settlement
//!
//! **Destination domain**: root accounting, withdrawals, and bonder
//! settlement.
//!
//! ## Architecture
//!
//! The [`DestinationBridge`] receives `(root, total)` commitments from the
//! relay and pays out transfers against them along two paths:
//!
//! 1. **Direct**: the recipient presents the transfer and a Merkle proof
//!    against a recorded root. Paid immediately, counted against the root.
//! 2. **Bonded**: the designated bonder advances the payout before the root
//!    arrives, backed by its collateral. Once the root is recorded the
//!    bonder settles the whole batch and its collateral is released.
//!
//! Every operation validates before the first mutation, so a rejected call
//! leaves all ledgers unchanged. [`PayoutConservation`] checks after the
//! fact that every unit paid out is accounted for by a root or an
//! outstanding bond.
//!
//! Concurrent callers go through a [`LedgerExecutor`], which applies
//! operations one at a time in submission order.

pub mod bonded;
pub mod bonder_account;
pub mod conservation;
pub mod destination;
pub mod executor;
pub mod payout;
pub mod root_ledger;
pub mod spent_registry;

pub use bonded::BondedWithdrawals;
pub use bonder_account::{BonderAccount, BonderBalance};
pub use conservation::PayoutConservation;
pub use destination::DestinationBridge;
pub use executor::LedgerExecutor;
pub use payout::{InMemoryPayouts, PayoutSink};
pub use root_ledger::TransferRootLedger;
pub use spent_registry::SpentTransferRegistry;
