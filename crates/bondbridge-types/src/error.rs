//! Error types for the BondBridge core.
//!
//! All errors use the `BB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Transfer errors
//! - 2xx: Proof / batch errors
//! - 3xx: Transfer root ledger errors
//! - 4xx: Bonded withdrawal / bonder account errors
//! - 5xx: Authorization errors
//! - 9xx: General errors
//!
//! Every error is a synchronous rejection of the whole operation: the
//! ledgers are left exactly as they were before the call.

use thiserror::Error;

use crate::{DomainId, RootHash, TransferId};

/// Central error enum for all BondBridge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    // =================================================================
    // Transfer Errors (1xx)
    // =================================================================
    /// A transfer must move a non-zero amount.
    #[error("BB_ERR_100: Transfer amount must be non-zero")]
    ZeroAmount,

    /// The relayer fee is carved out of the amount, so it cannot exceed it.
    #[error("BB_ERR_101: Relayer fee {relayer_fee} exceeds amount {amount}")]
    RelayerFeeExceedsAmount { amount: u128, relayer_fee: u128 },

    /// The source bridge has no batch for this destination.
    #[error("BB_ERR_102: Unsupported destination: {0}")]
    UnsupportedDomain(DomainId),

    /// A withdrawal was presented to a ledger that is not its destination.
    #[error("BB_ERR_103: Transfer is bound for {actual}, this ledger is {expected}")]
    WrongDestinationDomain { expected: DomainId, actual: DomainId },

    /// An accumulated amount no longer fits in `u128`.
    #[error("BB_ERR_104: Amount overflow")]
    AmountOverflow,

    /// The transfer is already in the pending batch; its amount would be
    /// committed twice but paid once.
    #[error("BB_ERR_105: Transfer already pending: {0}")]
    DuplicateTransfer(TransferId),

    // =================================================================
    // Proof / Batch Errors (2xx)
    // =================================================================
    /// The Merkle inclusion proof does not lead to the claimed root.
    #[error("BB_ERR_200: Invalid proof for {0}")]
    InvalidProof(TransferId),

    /// Settlement was requested with no transfer ids.
    #[error("BB_ERR_201: Empty settlement batch")]
    EmptyBatch,

    // =================================================================
    // Transfer Root Ledger Errors (3xx)
    // =================================================================
    /// No total has been recorded for this root.
    #[error("BB_ERR_300: Transfer root not found: {0}")]
    RootNotFound(RootHash),

    /// The root's total was already recorded (first writer wins).
    #[error("BB_ERR_301: Transfer root already set: {0}")]
    RootAlreadySet(RootHash),

    /// A root cannot be recorded with a zero total.
    #[error("BB_ERR_302: Transfer root total must be non-zero")]
    ZeroTotal,

    /// Withdrawing would take the root past its committed total.
    #[error(
        "BB_ERR_303: Withdrawal exceeds total for {root}: total {total}, withdrawn {withdrawn}, requested {requested}"
    )]
    WithdrawalExceedsTotal {
        root: RootHash,
        total: u128,
        withdrawn: u128,
        requested: u128,
    },

    /// The transfer has already been paid out.
    #[error("BB_ERR_304: Transfer already spent: {0}")]
    AlreadySpent(TransferId),

    // =================================================================
    // Bonded Withdrawal / Bonder Errors (4xx)
    // =================================================================
    /// The transfer already carries a bond.
    #[error("BB_ERR_400: Withdrawal already bonded: {0}")]
    AlreadyBonded(TransferId),

    /// Debiting the bonder would push its balance negative.
    #[error("BB_ERR_401: Insufficient bonder balance: credit {credit}, debit {debit}, requested {requested}")]
    InsufficientBonderBalance {
        credit: u128,
        debit: u128,
        requested: u128,
    },

    // =================================================================
    // Authorization Errors (5xx)
    // =================================================================
    /// The caller could not prove it holds the bonder role.
    #[error("BB_ERR_500: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("BB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("BB_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// The serializing executor has shut down.
    #[error("BB_ERR_903: Ledger executor closed")]
    ExecutorClosed,

    /// Payout conservation or a root bound no longer holds; critical alert.
    #[error("BB_ERR_904: Invariant violation: {reason}")]
    InvariantViolation { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
