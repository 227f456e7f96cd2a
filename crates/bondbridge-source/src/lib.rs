//! # bondbridge-source
//!
//! **Source domain**: collects outgoing transfers into per-destination
//! pending batches and commits each batch as a Merkle root.
//!
//! ## Architecture
//!
//! 1. **PendingBatch**: ordered transfer ids plus a running amount
//! 2. **SourceBridge**: validates transfers, routes them to the batch for
//!    their destination, forces a commit when a batch is full
//! 3. **MessageRelay**: external transport that carries each
//!    `(root, total)` payload to the destination's root ledger
//!
//! ## Transfer Flow
//!
//! ```text
//! SourceBridge.append() → PendingBatch.append()
//!     → SourceBridge.commit() → PendingBatch.commit() → CommitmentEvent
//!     → MessageRelay.dispatch(Commitment) → destination set_total()
//! ```
//!
//! Value is escrowed or burned by the token collaborator before `append`
//! is called; this crate only does the accounting.

pub mod accumulator;
pub mod bridge;
pub mod relay;

pub use accumulator::PendingBatch;
pub use bridge::SourceBridge;
pub use relay::{InMemoryRelay, MessageRelay, RelayedCommitment};
