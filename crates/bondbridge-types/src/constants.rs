//! System-wide constants for the BondBridge core.

/// Domain tag prefixed to every TransferId preimage.
pub const TRANSFER_ID_TAG: &[u8] = b"bondbridge:transfer_id:v1:";

/// Domain tag prefixed to every internal Merkle node preimage.
pub const MERKLE_NODE_TAG: &[u8] = b"bondbridge:node:v1:";

/// Domain tag prefixed to the bytes a bonder signs for a bond request.
pub const BOND_REQUEST_TAG: &[u8] = b"bondbridge:bond:v1:";

/// Domain tag prefixed to the bytes a bonder signs to withdraw stake.
pub const UNSTAKE_REQUEST_TAG: &[u8] = b"bondbridge:unstake:v1:";

/// Width of a TransferId preimage after the tag:
/// domain(8) + sender(32) + recipient(32) + amount(16) + nonce(8)
/// + relayer_fee(16) + min_swap_out(16) + swap_deadline(8).
pub const TRANSFER_ID_PREIMAGE_LEN: usize = 136;

/// Width of the relayed commitment payload: root(32) + total(16).
pub const COMMITMENT_PAYLOAD_LEN: usize = 48;

/// Default maximum number of transfers held in one pending batch before
/// the next send forces a commit.
pub const DEFAULT_MAX_PENDING_TRANSFERS: usize = 512;

/// Default number of commitment events a source bridge keeps for
/// inspection before dropping the oldest.
pub const DEFAULT_COMMITMENT_HISTORY: usize = 64;

/// Default depth of the serializing executor's request queue.
pub const DEFAULT_EXECUTOR_QUEUE_DEPTH: usize = 1024;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "BondBridge";
