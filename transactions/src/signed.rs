//! Signed transactions and the key set used to sign them.

use std::collections::HashMap;

use asaflow_crypto::{
    derive_address, public_from_private, public_key_from_address, sign_message, verify_signature,
};
use asaflow_types::{Address, KeyPair, PrivateKey, Signature, TxId};
use serde::{Deserialize, Serialize};

use crate::{encoding, Transaction, TransactionError};

/// Bytes a signature adds to a transaction's canonical encoding (length prefix plus 64).
pub const ENCODED_SIGNATURE_LEN: usize = 8 + 64;

/// A transaction together with its sender's signature over `"TX" ‖ encode(txn)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub txn: Transaction,
    pub sig: Signature,
}

impl SignedTransaction {
    pub fn tx_id(&self) -> Result<TxId, TransactionError> {
        self.txn.id()
    }

    /// Check the signature against the public key encoded in the sender address.
    pub fn verify(&self) -> Result<(), TransactionError> {
        let tx_id = self.tx_id()?;
        let public = public_key_from_address(self.txn.sender())
            .ok_or(TransactionError::InvalidSignature { tx_id })?;
        let message = encoding::bytes_to_sign(&self.txn)?;
        if verify_signature(&message, &self.sig, &public) {
            Ok(())
        } else {
            Err(TransactionError::InvalidSignature { tx_id })
        }
    }
}

/// Sign `tx` with `key`, which must belong to the transaction's sender.
pub fn sign_transaction(
    tx: Transaction,
    key: &PrivateKey,
) -> Result<SignedTransaction, TransactionError> {
    let signer = derive_address(&public_from_private(key));
    if &signer != tx.sender() {
        return Err(TransactionError::SignerMismatch {
            sender: tx.sender().clone(),
            signer,
        });
    }
    let sig = sign_message(&encoding::bytes_to_sign(&tx)?, key);
    Ok(SignedTransaction { txn: tx, sig })
}

/// Signing keys indexed by the address they sign for.
///
/// Borrows the keys: nothing here copies secret material.
#[derive(Default)]
pub struct Signers<'a> {
    keys: HashMap<Address, &'a PrivateKey>,
}

impl<'a> Signers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key pair under its derived address.
    pub fn add(mut self, keypair: &'a KeyPair) -> Self {
        self.keys.insert(derive_address(&keypair.public), &keypair.private);
        self
    }

    pub fn key_for(&self, address: &Address) -> Option<&'a PrivateKey> {
        self.keys.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sign `tx` with the key registered for its sender.
    pub fn sign(&self, tx: Transaction) -> Result<SignedTransaction, TransactionError> {
        let key = self
            .key_for(tx.sender())
            .ok_or_else(|| TransactionError::MissingSigner {
                sender: tx.sender().clone(),
            })?;
        sign_transaction(tx, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::payment_between;
    use asaflow_crypto::keypair_from_seed;

    #[test]
    fn signed_transaction_verifies() {
        let kp = keypair_from_seed(&[1; 32]);
        let signed = sign_transaction(payment_between(1, 2, 10), &kp.private).unwrap();
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn tampered_transaction_fails_verification() {
        let kp = keypair_from_seed(&[1; 32]);
        let mut signed = sign_transaction(payment_between(1, 2, 10), &kp.private).unwrap();
        if let Transaction::Payment(pay) = &mut signed.txn {
            pay.amount = 11;
        }
        assert!(matches!(
            signed.verify(),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn wrong_key_is_refused() {
        let other = keypair_from_seed(&[9; 32]);
        let err = sign_transaction(payment_between(1, 2, 10), &other.private).unwrap_err();
        assert!(matches!(err, TransactionError::SignerMismatch { .. }));
    }

    #[test]
    fn signers_look_up_by_sender() {
        let a = keypair_from_seed(&[1; 32]);
        let b = keypair_from_seed(&[2; 32]);
        let signers = Signers::new().add(&a).add(&b);
        assert_eq!(signers.len(), 2);
        assert!(signers.sign(payment_between(2, 1, 3)).unwrap().verify().is_ok());

        let err = Signers::new().add(&a).sign(payment_between(2, 1, 3)).unwrap_err();
        assert!(matches!(err, TransactionError::MissingSigner { .. }));
    }

    #[test]
    fn encoded_signature_len_matches_bincode() {
        let kp = keypair_from_seed(&[1; 32]);
        let signed = sign_transaction(payment_between(1, 2, 10), &kp.private).unwrap();
        let unsigned_len = encoding::encode(&signed.txn).unwrap().len();
        let signed_len = bincode::serialize(&signed).unwrap().len();
        assert_eq!(signed_len - unsigned_len, ENCODED_SIGNATURE_LEN);
    }
}
