//! Atomic groups: an ordered set of transactions that all apply or none do.
//!
//! The group id is `SHA-512/256("TG" ‖ encode(members with group cleared))`,
//! so it commits to every member and to their order. It is stamped onto each
//! member before signing; a member changed afterwards no longer matches.

use asaflow_crypto::hash_with_domain;
use asaflow_types::params::MAX_GROUP_SIZE;
use asaflow_types::{GroupId, TxId};

use crate::encoding::{self, GROUP_DOMAIN};
use crate::signed::{SignedTransaction, Signers};
use crate::{Transaction, TransactionError};

/// Compute the group id of an ordered transaction sequence.
pub fn compute_group_id(txs: &[Transaction]) -> Result<GroupId, TransactionError> {
    if txs.is_empty() {
        return Err(TransactionError::invalid("a group needs at least one transaction"));
    }
    if txs.len() > MAX_GROUP_SIZE {
        return Err(TransactionError::invalid(format!(
            "group of {} transactions exceeds {MAX_GROUP_SIZE}",
            txs.len()
        )));
    }
    if let Some(index) = txs.iter().position(|tx| tx.group().is_some()) {
        return Err(TransactionError::invalid(format!(
            "transaction {index} already belongs to a group"
        )));
    }

    let bytes = bincode::serialize(txs).map_err(|e| TransactionError::Encoding(e.to_string()))?;
    Ok(GroupId::new(hash_with_domain(GROUP_DOMAIN, &bytes)))
}

/// An ordered sequence of transactions bound by a shared group id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionGroup {
    id: GroupId,
    txs: Vec<Transaction>,
}

impl TransactionGroup {
    /// Bind `txs` into a group, stamping the group id onto every member.
    ///
    /// Order is preserved exactly as given.
    pub fn new(mut txs: Vec<Transaction>) -> Result<Self, TransactionError> {
        let id = compute_group_id(&txs)?;
        for tx in &mut txs {
            tx.header_mut().group = Some(id);
        }
        tracing::debug!(group = %id, members = txs.len(), "assigned group id");
        Ok(Self { id, txs })
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.txs
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Sign every member with its sender's key.
    ///
    /// Fails with `MissingSigner` naming the first sender without a key; in that
    /// case nothing is returned and nothing can be submitted.
    pub fn sign(self, signers: &Signers<'_>) -> Result<SignedGroup, TransactionError> {
        let signed = self
            .txs
            .into_iter()
            .map(|tx| signers.sign(tx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SignedGroup {
            id: self.id,
            signed,
        })
    }
}

/// A fully signed group, ready for submission as one batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedGroup {
    id: GroupId,
    signed: Vec<SignedTransaction>,
}

impl SignedGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn members(&self) -> &[SignedTransaction] {
        &self.signed
    }

    /// Concatenated submission bytes, in group order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        encoding::encode_signed_batch(&self.signed)
    }

    pub fn tx_ids(&self) -> Result<Vec<TxId>, TransactionError> {
        self.signed.iter().map(SignedTransaction::tx_id).collect()
    }

    /// Id of the first member, used to track confirmation of the whole group.
    pub fn first_tx_id(&self) -> Result<TxId, TransactionError> {
        match self.signed.first() {
            Some(first) => first.tx_id(),
            None => Err(TransactionError::invalid("signed group is empty")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::payment_between;
    use crate::encoding::decode_signed_batch;
    use asaflow_crypto::keypair_from_seed;

    #[test]
    fn group_id_stamped_on_every_member() {
        let group =
            TransactionGroup::new(vec![payment_between(1, 2, 5), payment_between(2, 1, 7)]).unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.transactions().iter().all(|tx| tx.group() == Some(&group.id())));
    }

    #[test]
    fn group_id_depends_on_order() {
        let a = payment_between(1, 2, 5);
        let b = payment_between(2, 1, 7);
        let ab = compute_group_id(&[a.clone(), b.clone()]).unwrap();
        let ba = compute_group_id(&[b, a]).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn group_size_bounds() {
        assert!(compute_group_id(&[]).is_err());
        let many: Vec<_> = (0..=MAX_GROUP_SIZE as u64)
            .map(|i| payment_between(1, 2, i + 1))
            .collect();
        assert!(compute_group_id(&many).is_err());
        assert!(compute_group_id(&many[..MAX_GROUP_SIZE]).is_ok());
        assert!(compute_group_id(&many[..1]).is_ok());
    }

    #[test]
    fn already_grouped_member_rejected() {
        let group = TransactionGroup::new(vec![payment_between(1, 2, 5)]).unwrap();
        let regrouped = group.transactions().to_vec();
        let err = TransactionGroup::new(regrouped).unwrap_err();
        assert!(err.to_string().contains("already belongs"));
    }

    #[test]
    fn sign_requires_every_sender() {
        let a = keypair_from_seed(&[1; 32]);
        let b = keypair_from_seed(&[2; 32]);
        let txs = vec![payment_between(1, 2, 5), payment_between(2, 1, 7)];

        let err = TransactionGroup::new(txs.clone())
            .unwrap()
            .sign(&Signers::new().add(&a))
            .unwrap_err();
        assert!(matches!(err, TransactionError::MissingSigner { .. }));

        let signed = TransactionGroup::new(txs)
            .unwrap()
            .sign(&Signers::new().add(&a).add(&b))
            .unwrap();
        assert!(signed.members().iter().all(|m| m.verify().is_ok()));
    }

    #[test]
    fn submission_bytes_preserve_order() {
        let a = keypair_from_seed(&[1; 32]);
        let b = keypair_from_seed(&[2; 32]);
        let signed = TransactionGroup::new(vec![payment_between(1, 2, 5), payment_between(2, 1, 7)])
            .unwrap()
            .sign(&Signers::new().add(&a).add(&b))
            .unwrap();

        let decoded = decode_signed_batch(&signed.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, signed.members());
        assert_eq!(signed.first_tx_id().unwrap(), signed.tx_ids().unwrap()[0]);
    }
}
