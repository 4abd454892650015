use proptest::prelude::*;

use asaflow_crypto::{derive_address, keypair_from_seed};
use asaflow_transactions::{
    build_asset_transfer, build_payment, compute_group_id, encoding, Signers, Transaction,
    TransactionGroup,
};
use asaflow_types::params::MIN_TXN_FEE;
use asaflow_types::{Address, AssetId, Round, SuggestedParams};

fn params(fee: u64, flat_fee: bool) -> SuggestedParams {
    SuggestedParams {
        fee,
        flat_fee,
        first_valid: Round::new(10),
        last_valid: Round::new(1_010),
        genesis_id: "closednet-v1".into(),
        genesis_hash: [3u8; 32],
    }
}

fn address(seed: u8) -> Address {
    derive_address(&keypair_from_seed(&[seed; 32]).public)
}

proptest! {
    /// A built transfer decodes back to itself.
    #[test]
    fn transfer_encoding_roundtrip(amount in 1u64..u64::MAX, asset in 1u64..u64::MAX) {
        let tx = build_asset_transfer(
            &address(1), &params(1_000, true), &address(2), amount, AssetId::new(asset),
        ).unwrap();
        let decoded = encoding::decode(&encoding::encode(&tx).unwrap()).unwrap();
        prop_assert_eq!(decoded, tx);
    }

    /// Per-byte fees never fall below the protocol minimum.
    #[test]
    fn per_byte_fee_has_floor(fee in 0u64..100, amount in 1u64..1_000_000) {
        let tx = build_payment(&address(1), &params(fee, false), &address(2), amount).unwrap();
        prop_assert!(tx.fee() >= MIN_TXN_FEE);
    }

    /// Flat fees are taken verbatim.
    #[test]
    fn flat_fee_is_exact(fee in 0u64..10_000_000) {
        let tx = build_payment(&address(1), &params(fee, true), &address(2), 1).unwrap();
        prop_assert_eq!(tx.fee(), fee);
    }

    /// The group id is a pure function of the ordered members.
    #[test]
    fn group_id_deterministic(a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
        let p = params(1_000, true);
        let txs = vec![
            build_payment(&address(1), &p, &address(2), a).unwrap(),
            build_asset_transfer(&address(2), &p, &address(1), b, AssetId::new(7)).unwrap(),
        ];
        prop_assert_eq!(compute_group_id(&txs).unwrap(), compute_group_id(&txs.clone()).unwrap());
    }

    /// Changing any member's amount changes the group id.
    #[test]
    fn group_id_commits_to_members(a in 1u64..u64::MAX - 1) {
        let p = params(1_000, true);
        let first = build_payment(&address(1), &p, &address(2), a).unwrap();
        let bumped = build_payment(&address(1), &p, &address(2), a + 1).unwrap();
        let second = build_payment(&address(2), &p, &address(1), 1).unwrap();
        prop_assert_ne!(
            compute_group_id(&[first, second.clone()]).unwrap(),
            compute_group_id(&[bumped, second]).unwrap()
        );
    }

    /// Every member of a signed group verifies and shares the group id.
    #[test]
    fn signed_group_members_verify(a in 1u64..1_000_000, b in 1u64..1_000_000) {
        let p = params(1_000, true);
        let k1 = keypair_from_seed(&[1; 32]);
        let k2 = keypair_from_seed(&[2; 32]);
        let group = TransactionGroup::new(vec![
            build_payment(&address(1), &p, &address(2), a).unwrap(),
            build_asset_transfer(&address(2), &p, &address(1), b, AssetId::new(7)).unwrap(),
        ]).unwrap();
        let id = group.id();
        let signed = group.sign(&Signers::new().add(&k1).add(&k2)).unwrap();
        for member in signed.members() {
            prop_assert!(member.verify().is_ok());
            prop_assert_eq!(member.txn.group(), Some(&id));
        }
        prop_assert!(matches!(signed.members()[0].txn, Transaction::Payment(_)));
    }
}
