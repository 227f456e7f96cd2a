//! Configuration types for source and destination ledgers.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::{AccountId, BridgeError, DomainId, Result, constants};

/// Configuration for the source-domain bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// This domain's identity.
    pub domain_id: DomainId,
    /// Destinations this bridge batches transfers for.
    pub supported_destinations: Vec<DomainId>,
    /// Transfers per pending batch before a send forces a commit.
    #[serde(default = "default_max_pending_transfers")]
    pub max_pending_transfers: usize,
    /// Recent commitment events retained; older ones are dropped.
    #[serde(default = "default_commitment_history")]
    pub commitment_history: usize,
}

fn default_max_pending_transfers() -> usize {
    constants::DEFAULT_MAX_PENDING_TRANSFERS
}

fn default_commitment_history() -> usize {
    constants::DEFAULT_COMMITMENT_HISTORY
}

impl SourceConfig {
    /// Create a config with the default batch capacity.
    #[must_use]
    pub fn new(domain_id: DomainId, supported_destinations: Vec<DomainId>) -> Self {
        Self {
            domain_id,
            supported_destinations,
            max_pending_transfers: constants::DEFAULT_MAX_PENDING_TRANSFERS,
            commitment_history: constants::DEFAULT_COMMITMENT_HISTORY,
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns `Configuration` for a zero batch capacity or a destination
    /// equal to this domain.
    pub fn validate(&self) -> Result<()> {
        if self.max_pending_transfers == 0 {
            return Err(BridgeError::Configuration(
                "max_pending_transfers must be > 0".to_string(),
            ));
        }
        if self.supported_destinations.contains(&self.domain_id) {
            return Err(BridgeError::Configuration(format!(
                "{} cannot bridge to itself",
                self.domain_id
            )));
        }
        Ok(())
    }
}

/// The designated bonder of a destination ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonderConfig {
    /// Account that receives bonder payouts (relayer fees on bonded
    /// withdrawals).
    pub account: AccountId,
    /// Hex-encoded ed25519 public key that signs bond requests.
    pub public_key: String,
}

impl BonderConfig {
    /// Build a config from a verifying key.
    #[must_use]
    pub fn new(account: AccountId, key: &VerifyingKey) -> Self {
        Self {
            account,
            public_key: hex::encode(key.as_bytes()),
        }
    }

    /// Decode the bonder's verifying key.
    ///
    /// # Errors
    /// Returns `Configuration` if the key is not a valid 32-byte ed25519
    /// public key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        let bytes = hex::decode(self.public_key.trim_start_matches("0x"))
            .map_err(|e| BridgeError::Configuration(format!("bonder public_key: {e}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            BridgeError::Configuration("bonder public_key must be 32 bytes".to_string())
        })?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| BridgeError::Configuration(format!("bonder public_key: {e}")))
    }
}

/// Configuration for the destination-domain bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// This domain's identity; transfers must name it as destination.
    pub domain_id: DomainId,
    /// The designated bonder.
    pub bonder: BonderConfig,
}

impl DestinationConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.bonder.verifying_key()?;
        Ok(cfg)
    }
}
