//! Canonical transaction encoding.
//!
//! The canonical form is the `bincode` encoding of the typed record: fixed-width
//! little-endian integers, length-prefixed strings and sequences, fields in
//! declaration order. Transaction ids, group ids and signatures all cover these
//! bytes, so any change to field order or types is a wire-format change.

use asaflow_crypto::hash_with_domain;
use asaflow_types::TxId;

use crate::signed::SignedTransaction;
use crate::{Transaction, TransactionError};

/// Domain prefix for transaction ids and signed bytes.
pub const TX_DOMAIN: &[u8] = b"TX";

/// Domain prefix for group ids.
pub const GROUP_DOMAIN: &[u8] = b"TG";

fn encoding_error(e: bincode::Error) -> TransactionError {
    TransactionError::Encoding(e.to_string())
}

/// Encode a transaction in canonical form.
pub fn encode(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    bincode::serialize(tx).map_err(encoding_error)
}

/// Decode a transaction from its canonical form.
pub fn decode(bytes: &[u8]) -> Result<Transaction, TransactionError> {
    bincode::deserialize(bytes).map_err(encoding_error)
}

/// The bytes a sender's key signs: `"TX" ‖ encode(tx)`.
pub fn bytes_to_sign(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    let mut out = TX_DOMAIN.to_vec();
    out.extend(encode(tx)?);
    Ok(out)
}

/// Transaction id: SHA-512/256 over `"TX" ‖ encode(tx)`.
pub fn tx_id(tx: &Transaction) -> Result<TxId, TransactionError> {
    Ok(TxId::new(hash_with_domain(TX_DOMAIN, &encode(tx)?)))
}

/// Encode an ordered batch of signed transactions for submission.
///
/// A single transaction is submitted as a batch of one.
pub fn encode_signed_batch(batch: &[SignedTransaction]) -> Result<Vec<u8>, TransactionError> {
    bincode::serialize(batch).map_err(encoding_error)
}

/// Decode a submitted batch, preserving its order.
pub fn decode_signed_batch(bytes: &[u8]) -> Result<Vec<SignedTransaction>, TransactionError> {
    bincode::deserialize(bytes).map_err(encoding_error)
}
