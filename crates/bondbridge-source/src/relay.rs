//! Cross-domain relay collaborator.
//!
//! The relay transport is external. The core only needs to hand it a
//! `(destination, payload)` pair; the transport guarantees eventual,
//! at-least-once delivery with no ordering relative to other payloads.
//! [`InMemoryRelay`] is a queue with exactly those semantics for tests and
//! simulators.

use std::collections::VecDeque;

use bondbridge_types::{Commitment, DomainId, Result, constants};

/// Transport carrying commitments to destination domains.
pub trait MessageRelay {
    /// Queue `commitment` for delivery to `destination`.
    fn dispatch(&mut self, destination: DomainId, commitment: Commitment);
}

/// A payload in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayedCommitment {
    pub destination: DomainId,
    pub payload: [u8; constants::COMMITMENT_PAYLOAD_LEN],
}

impl RelayedCommitment {
    /// Decode the opaque payload.
    pub fn decode(&self) -> Result<Commitment> {
        Commitment::from_bytes(&self.payload)
    }
}

/// In-process relay queue.
///
/// Delivery order is chosen by the consumer: [`pop_oldest`],
/// [`pop_newest`], or [`peek`] for redelivery of something already
/// delivered.
///
/// [`pop_oldest`]: InMemoryRelay::pop_oldest
/// [`pop_newest`]: InMemoryRelay::pop_newest
/// [`peek`]: InMemoryRelay::peek
#[derive(Debug, Default)]
pub struct InMemoryRelay {
    outbox: VecDeque<RelayedCommitment>,
    dispatched: u64,
}

impl InMemoryRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest payload in flight.
    pub fn pop_oldest(&mut self) -> Option<RelayedCommitment> {
        self.outbox.pop_front()
    }

    /// Take the newest payload in flight (out-of-order delivery).
    pub fn pop_newest(&mut self) -> Option<RelayedCommitment> {
        self.outbox.pop_back()
    }

    /// Look at a payload without consuming it.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&RelayedCommitment> {
        self.outbox.get(index)
    }

    /// Take every payload bound for `destination`, oldest first.
    pub fn drain_for(&mut self, destination: DomainId) -> Vec<RelayedCommitment> {
        let (matching, rest): (Vec<_>, Vec<_>) = self
            .outbox
            .drain(..)
            .partition(|m| m.destination == destination);
        self.outbox = rest.into();
        matching
    }

    /// Payloads still in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outbox.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outbox.is_empty()
    }

    /// Total payloads ever dispatched.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl MessageRelay for InMemoryRelay {
    fn dispatch(&mut self, destination: DomainId, commitment: Commitment) {
        self.outbox.push_back(RelayedCommitment {
            destination,
            payload: commitment.to_bytes(),
        });
        self.dispatched += 1;
    }
}
