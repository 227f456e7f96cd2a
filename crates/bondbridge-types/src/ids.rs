//! Identifiers used throughout BondBridge.
//!
//! Transfer and root identifiers are raw 32-byte digests; accounts are
//! opaque 32-byte identifiers and domains are plain integers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result};

/// Width of every digest in the system.
pub const HASH_LEN: usize = 32;

/// A raw 32-byte digest.
pub type Hash32 = [u8; HASH_LEN];

fn parse_hex32(s: &str) -> Result<Hash32> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw).map_err(|e| BridgeError::Serialization(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| BridgeError::Serialization(format!("expected 32 bytes, got {}", v.len())))
}

// ---------------------------------------------------------------------------
// TransferId
// ---------------------------------------------------------------------------

/// Canonical digest of a [`crate::Transfer`].
///
/// Used as the replay-prevention key on the destination domain and as the
/// Merkle leaf on the source domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TransferId(pub Hash32);

impl TransferId {
    #[must_use]
    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        parse_hex32(s).map(Self)
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// RootHash
// ---------------------------------------------------------------------------

/// Merkle root committing to an ordered batch of [`TransferId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RootHash(pub Hash32);

impl RootHash {
    /// The degenerate root of an empty batch.
    pub const ZERO: Self = Self([0u8; HASH_LEN]);

    #[must_use]
    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        parse_hex32(s).map(Self)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }
}

impl fmt::Display for RootHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Opaque account identifier on either domain (sender, recipient, relayer,
/// bonder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Hash32);

impl AccountId {
    #[must_use]
    pub fn from_bytes(bytes: Hash32) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        parse_hex32(s).map(Self)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// A random account, for tests.
    #[cfg(feature = "test-helpers")]
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// Identifier of a ledger domain participating in the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DomainId(pub u64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
