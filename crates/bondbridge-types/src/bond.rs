//! Bonder credentials.
//!
//! Only the designated bonder may advance a withdrawal. Rather than relying
//! on an implicit caller identity, each advance is an explicit
//! [`SignedBondRequest`]: the transfer to bond plus an ed25519 signature
//! over `"bondbridge:bond:v1:" || transfer_id`, checked against the bonder
//! key the destination ledger was configured with. Withdrawing stake uses
//! the same scheme with an [`UnstakeRequest`], whose nonce makes each
//! signature single-use.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result, Transfer, TransferId, constants};

/// A request to advance `transfer` from the bonder's collateral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondRequest {
    /// The transfer being advanced. The bonded amount is `transfer.amount`.
    pub transfer: Transfer,
}

impl BondRequest {
    #[must_use]
    pub fn new(transfer: Transfer) -> Self {
        Self { transfer }
    }

    /// The transfer id this request bonds.
    #[must_use]
    pub fn transfer_id(&self) -> TransferId {
        self.transfer.id()
    }

    /// The bytes the bonder signs.
    #[must_use]
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(constants::BOND_REQUEST_TAG.len() + 32);
        bytes.extend_from_slice(constants::BOND_REQUEST_TAG);
        bytes.extend_from_slice(self.transfer_id().as_bytes());
        bytes
    }

    /// Sign this request with the bonder's key.
    #[must_use]
    pub fn sign(self, key: &SigningKey) -> SignedBondRequest {
        let signature = key.sign(&self.signing_bytes());
        SignedBondRequest {
            request: self,
            signature,
        }
    }
}

/// A [`BondRequest`] carrying the bonder's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBondRequest {
    pub request: BondRequest,
    pub signature: Signature,
}

impl SignedBondRequest {
    /// Check the signature against the configured bonder key.
    ///
    /// # Errors
    /// Returns `Unauthorized` if the signature does not verify.
    pub fn verify(&self, bonder_key: &VerifyingKey) -> Result<()> {
        bonder_key
            .verify(&self.request.signing_bytes(), &self.signature)
            .map_err(|_| BridgeError::Unauthorized {
                reason: "bond request not signed by the configured bonder".to_string(),
            })
    }

    #[must_use]
    pub fn transfer(&self) -> &Transfer {
        &self.request.transfer
    }
}

/// A request to withdraw `amount` of the bonder's stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeRequest {
    pub amount: u128,
    /// Single-use nonce; a replayed nonce is rejected.
    pub nonce: u64,
}

impl UnstakeRequest {
    /// The bytes the bonder signs.
    #[must_use]
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(constants::UNSTAKE_REQUEST_TAG.len() + 24);
        bytes.extend_from_slice(constants::UNSTAKE_REQUEST_TAG);
        bytes.extend_from_slice(&self.amount.to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes
    }

    #[must_use]
    pub fn sign(self, key: &SigningKey) -> SignedUnstakeRequest {
        let signature = key.sign(&self.signing_bytes());
        SignedUnstakeRequest {
            request: self,
            signature,
        }
    }
}

/// An [`UnstakeRequest`] carrying the bonder's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUnstakeRequest {
    pub request: UnstakeRequest,
    pub signature: Signature,
}

impl SignedUnstakeRequest {
    /// # Errors
    /// Returns `Unauthorized` if the signature does not verify.
    pub fn verify(&self, bonder_key: &VerifyingKey) -> Result<()> {
        bonder_key
            .verify(&self.request.signing_bytes(), &self.signature)
            .map_err(|_| BridgeError::Unauthorized {
                reason: "unstake request not signed by the configured bonder".to_string(),
            })
    }
}
