use asaflow_types::{Address, TxId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// A field is out of bounds; raised locally before any network call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No signing key was supplied for a transaction's sender.
    #[error("no signing key for sender {sender}")]
    MissingSigner { sender: Address },

    /// A key was offered for a transaction it does not own.
    #[error("key for {signer} cannot sign a transaction sent by {sender}")]
    SignerMismatch { sender: Address, signer: Address },

    #[error("invalid signature on transaction {tx_id}")]
    InvalidSignature { tx_id: TxId },

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl TransactionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }
}
