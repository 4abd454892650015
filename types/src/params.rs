//! Suggested transaction parameters and the protocol limits transactions are checked against.

use serde::{Deserialize, Serialize};

use crate::Round;

// ── Protocol limits ──────────────────────────────────────────────────────

/// Minimum fee (microunits) a transaction must pay.
pub const MIN_TXN_FEE: u64 = 1_000;

/// Maximum number of rounds between `first_valid` and `last_valid`.
pub const MAX_TXN_LIFE: u64 = 1_000;

/// Maximum number of transactions in one atomic group.
pub const MAX_GROUP_SIZE: usize = 16;

/// Maximum byte length of an asset unit name.
pub const MAX_UNIT_NAME_LEN: usize = 8;

/// Maximum byte length of an asset name.
pub const MAX_ASSET_NAME_LEN: usize = 32;

/// Maximum byte length of an asset URL.
pub const MAX_URL_LEN: usize = 96;

/// Maximum number of decimals an asset may declare.
pub const MAX_DECIMALS: u32 = 19;

/// Maximum byte length of a transaction note.
pub const MAX_NOTE_LEN: usize = 1_024;

/// Ledger-provided metadata every transaction must carry.
///
/// Fetched fresh for each batch of operations and treated as a read-only
/// snapshot: the validity window expires, so it is never cached across batches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedParams {
    /// Fee in microunits: absolute when `flat_fee`, otherwise per byte.
    pub fee: u64,
    pub flat_fee: bool,
    pub first_valid: Round,
    pub last_valid: Round,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
}

impl SuggestedParams {
    /// Replace the fee with an absolute flat fee.
    pub fn with_flat_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self.flat_fee = true;
        self
    }

    /// Number of rounds in the validity window.
    pub fn validity_window(&self) -> u64 {
        self.last_valid.since(self.first_valid)
    }

    /// Fee a transaction of `signed_len` encoded bytes pays under these params.
    pub fn fee_for(&self, signed_len: usize) -> u64 {
        if self.flat_fee {
            self.fee
        } else {
            self.fee.saturating_mul(signed_len as u64).max(MIN_TXN_FEE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(fee: u64, flat_fee: bool) -> SuggestedParams {
        SuggestedParams {
            fee,
            flat_fee,
            first_valid: Round::new(100),
            last_valid: Round::new(1100),
            genesis_id: "testnet-v1".into(),
            genesis_hash: [9u8; 32],
        }
    }

    #[test]
    fn flat_fee_ignores_size() {
        assert_eq!(params(1_000, true).fee_for(10_000), 1_000);
    }

    #[test]
    fn per_byte_fee_has_floor() {
        assert_eq!(params(0, false).fee_for(250), MIN_TXN_FEE);
        assert_eq!(params(10, false).fee_for(250), 2_500);
    }

    #[test]
    fn with_flat_fee_overrides() {
        let p = params(3, false).with_flat_fee(1_000);
        assert!(p.flat_fee);
        assert_eq!(p.fee, 1_000);
        assert_eq!(p.validity_window(), 1_000);
    }
}
