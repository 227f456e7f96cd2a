//! # bondbridge-types
//!
//! Shared types, errors, and configuration for the **BondBridge** core.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`TransferId`], [`RootHash`], [`AccountId`], [`DomainId`]
//! - **Transfer model**: [`Transfer`] and the transfer identity codec [`transfer_id`]
//! - **Commitment model**: [`CommitmentEvent`], [`Commitment`] (the relayed payload)
//! - **Root accounting**: [`TransferRoot`]
//! - **Bonder credentials**: [`BondRequest`], [`SignedBondRequest`], [`UnstakeRequest`]
//! - **Configuration**: [`SourceConfig`], [`DestinationConfig`], [`BonderConfig`]
//! - **Errors**: [`BridgeError`] with `BB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod bond;
pub mod commitment;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod root;
pub mod transfer;

// Re-export all primary types at crate root for ergonomic imports:
//   use bondbridge_types::{Transfer, TransferId, RootHash, ...};

pub use bond::*;
pub use commitment::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use root::*;
pub use transfer::*;

// Constants are accessed via `bondbridge_types::constants::FOO`
// (not re-exported to avoid name collisions).
