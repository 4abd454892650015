use asaflow_crypto::MnemonicError;
use asaflow_gateway::{GatewayError, Rejection};
use asaflow_transactions::TransactionError;
use asaflow_types::{Address, AssetId, TxId};
use thiserror::Error;

/// Every failure a wallet operation reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Bad input, caught locally before any network call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("no signing key for sender {sender}")]
    MissingSigner { sender: Address },

    #[error("{address} has not opted in to asset {asset_id}")]
    NotOptedIn { address: Address, asset_id: AssetId },

    /// The round budget ran out. The transaction may still confirm later.
    #[error("transaction {tx_id} not confirmed within {rounds} rounds")]
    ConfirmationTimeout { tx_id: TxId, rounds: u64 },

    #[error("ledger query failed: {0}")]
    Query(GatewayError),

    /// The ledger definitively refused the submission.
    #[error("rejected by ledger: {reason}")]
    Rejected { reason: String },

    #[error("account recovery failed: {0}")]
    Recovery(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl WalletError {
    /// Whether repeating the operation later may succeed without changing anything.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConfirmationTimeout { .. } => true,
            Self::Query(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether the ledger may still apply what was submitted.
    ///
    /// Callers must re-query before treating such an operation as failed.
    pub fn outcome_unknown(&self) -> bool {
        matches!(
            self,
            Self::ConfirmationTimeout { .. } | Self::Query(GatewayError::Transport(_))
        )
    }
}

impl From<GatewayError> for WalletError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Rejected(Rejection::NotOptedIn { address, asset_id }) => {
                Self::NotOptedIn { address, asset_id }
            }
            GatewayError::Rejected(Rejection::InsufficientFunds {
                needed, available, ..
            }) => Self::InsufficientFunds { needed, available },
            GatewayError::Rejected(rejection) => Self::Rejected {
                reason: rejection.to_string(),
            },
            other => Self::Query(other),
        }
    }
}

impl From<TransactionError> for WalletError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::InvalidParameter(reason) => Self::InvalidParameter(reason),
            TransactionError::MissingSigner { sender } => Self::MissingSigner { sender },
            other => Self::InvalidParameter(other.to_string()),
        }
    }
}

impl From<MnemonicError> for WalletError {
    fn from(e: MnemonicError) -> Self {
        Self::Recovery(e.to_string())
    }
}
