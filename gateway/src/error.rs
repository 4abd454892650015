use asaflow_types::{Address, AssetId, TxId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The node could not be reached or answered with a transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("account {0} not found")]
    AccountNotFound(Address),

    #[error("transaction {0} not found")]
    TransactionNotFound(TxId),

    #[error("asset {0} not found")]
    AssetNotFound(AssetId),

    /// The ledger refused a submission; nothing from it was applied.
    #[error("rejected by ledger: {0}")]
    Rejected(Rejection),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Why the ledger refused a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{address} has not opted in to asset {asset_id}")]
    NotOptedIn { address: Address, asset_id: AssetId },

    #[error("{address} needs {needed} but has {available}")]
    InsufficientFunds {
        address: Address,
        needed: u64,
        available: u64,
    },

    #[error("invalid signature on transaction {tx_id}")]
    InvalidSignature { tx_id: TxId },

    #[error("invalid group: {reason}")]
    InvalidGroup { reason: String },

    #[error("{reason}")]
    Other { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_is_transient() {
        assert!(GatewayError::Transport("reset".into()).is_transient());
        assert!(!GatewayError::AccountNotFound(Address::new("X")).is_transient());
        assert!(!GatewayError::Rejected(Rejection::Other { reason: "no".into() }).is_transient());
    }

    #[test]
    fn rejection_message_names_asset() {
        let err = GatewayError::Rejected(Rejection::NotOptedIn {
            address: Address::new("BOB"),
            asset_id: AssetId::new(42),
        });
        assert_eq!(err.to_string(), "rejected by ledger: BOB has not opted in to asset 42");
    }
}
