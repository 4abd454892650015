//! Opt-ins, single asset transfers and atomic swaps.

use asaflow_gateway::LedgerGateway;
use asaflow_transactions::{
    build_asset_opt_in, build_asset_transfer, build_payment, Signers, TransactionGroup,
};
use asaflow_types::{Address, AssetId, GroupId, TxId};

use crate::account::Account;
use crate::confirmation::Confirmation;
use crate::wallet::Wallet;
use crate::WalletError;

/// An exchange of asset units for native microunits, settled atomically.
///
/// The group is always ordered `[payment buyer -> seller, asset transfer
/// seller -> buyer]`; the group id commits to that order.
pub struct AtomicSwap<'a> {
    pub buyer: &'a Account,
    pub seller: &'a Account,
    pub asset_id: AssetId,
    /// Asset base units moving from seller to buyer.
    pub asset_amount: u64,
    /// Microunits moving from buyer to seller.
    pub price: u64,
}

/// Outcome of a confirmed swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapReceipt {
    pub group_id: GroupId,
    /// Member ids in group order: payment first.
    pub tx_ids: Vec<TxId>,
    pub confirmation: Confirmation,
}

impl<G: LedgerGateway> Wallet<G> {
    /// Register `account` as willing to hold `asset_id`.
    pub async fn opt_in(
        &self,
        account: &Account,
        asset_id: AssetId,
    ) -> Result<Confirmation, WalletError> {
        let params = self.params().await?;
        let tx = build_asset_opt_in(account.address(), &params, asset_id)?;
        tracing::info!(account = %account.address(), asset_id = %asset_id, "opting in");
        self.sign_and_confirm(account, tx).await
    }

    /// Send `amount` base units of `asset_id` to `receiver`.
    ///
    /// Fails with [`WalletError::NotOptedIn`] if the receiver never opted in.
    pub async fn transfer_asset(
        &self,
        sender: &Account,
        receiver: &Address,
        asset_id: AssetId,
        amount: u64,
    ) -> Result<Confirmation, WalletError> {
        let params = self.params().await?;
        let tx = build_asset_transfer(sender.address(), &params, receiver, amount, asset_id)?;
        self.sign_and_confirm(sender, tx).await
    }

    /// Settle `swap` as one atomic group signed by both parties.
    pub async fn atomic_swap(&self, swap: AtomicSwap<'_>) -> Result<SwapReceipt, WalletError> {
        let buyer = swap.buyer.address();
        let seller = swap.seller.address();
        if buyer == seller {
            return Err(WalletError::InvalidParameter(
                "buyer and seller must differ".into(),
            ));
        }

        let params = self.params().await?;
        let payment = build_payment(buyer, &params, seller, swap.price)?;
        let transfer =
            build_asset_transfer(seller, &params, buyer, swap.asset_amount, swap.asset_id)?;

        let group = TransactionGroup::new(vec![payment, transfer])?;
        let signers = Signers::new()
            .add(swap.buyer.keypair())
            .add(swap.seller.keypair());
        let signed = group.sign(&signers)?;
        let tx_ids = signed.tx_ids()?;

        tracing::info!(
            group = %signed.id(),
            %buyer,
            %seller,
            asset_id = %swap.asset_id,
            asset_amount = swap.asset_amount,
            price = swap.price,
            "submitting atomic swap"
        );
        let confirmation = self.submit_group(&signed).await?;
        Ok(SwapReceipt {
            group_id: signed.id(),
            tx_ids,
            confirmation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asaflow_nullables::NullLedger;
    use asaflow_transactions::Transaction;

    use crate::config::{ConfirmationConfig, WalletConfig};

    fn wallet() -> Wallet<NullLedger> {
        let config = WalletConfig {
            confirmation: ConfirmationConfig {
                retry_backoff_ms: 0,
                ..ConfirmationConfig::default()
            },
            ..WalletConfig::default()
        };
        Wallet::new(NullLedger::new(), config).expect("valid config")
    }

    async fn funded_with_asset(wallet: &Wallet<NullLedger>) -> (Account, Account, AssetId) {
        let seller = Account::from_seed(&[1; 32]);
        let buyer = Account::from_seed(&[2; 32]);
        wallet.gateway().fund(seller.address(), 10_000_000);
        wallet.gateway().fund(buyer.address(), 10_000_000);
        let asset_id = wallet.issue_standard_asset(&seller, "tok", 10).await.unwrap();
        (seller, buyer, asset_id)
    }

    #[tokio::test]
    async fn transfer_without_opt_in_is_not_opted_in() {
        let wallet = wallet();
        let (seller, buyer, asset_id) = funded_with_asset(&wallet).await;

        let err = wallet
            .transfer_asset(&seller, buyer.address(), asset_id, 1)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WalletError::NotOptedIn {
                address: buyer.address().clone(),
                asset_id
            }
        );
    }

    #[tokio::test]
    async fn opt_in_then_transfer() {
        let wallet = wallet();
        let (seller, buyer, asset_id) = funded_with_asset(&wallet).await;

        wallet.opt_in(&buyer, asset_id).await.unwrap();
        wallet
            .transfer_asset(&seller, buyer.address(), asset_id, 3)
            .await
            .unwrap();

        let info = wallet.gateway().account_info(buyer.address()).await.unwrap();
        assert_eq!(info.holding(asset_id).map(|h| h.amount), Some(3));
    }

    #[tokio::test]
    async fn swap_is_submitted_payment_first() {
        let wallet = wallet();
        let (seller, buyer, asset_id) = funded_with_asset(&wallet).await;
        wallet.opt_in(&buyer, asset_id).await.unwrap();

        let receipt = wallet
            .atomic_swap(AtomicSwap {
                buyer: &buyer,
                seller: &seller,
                asset_id,
                asset_amount: 2,
                price: 5_000_000,
            })
            .await
            .unwrap();

        let batches = wallet.gateway().submitted();
        let group = batches.last().unwrap();
        assert_eq!(group.len(), 2);
        assert!(matches!(group[0].txn, Transaction::Payment(_)));
        assert!(matches!(group[1].txn, Transaction::AssetTransfer(_)));
        assert_eq!(receipt.tx_ids[0], receipt.confirmation.tx_id);
        assert!(group.iter().all(|m| m.txn.group() == Some(&receipt.group_id)));
    }

    #[tokio::test]
    async fn failed_leg_rolls_back_whole_swap() {
        let wallet = wallet();
        let (seller, buyer, asset_id) = funded_with_asset(&wallet).await;
        let buyer_before = wallet.gateway().account_info(buyer.address()).await.unwrap().amount;

        // No opt-in: the asset leg fails, so the payment must not apply either.
        let err = wallet
            .atomic_swap(AtomicSwap {
                buyer: &buyer,
                seller: &seller,
                asset_id,
                asset_amount: 2,
                price: 5_000_000,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::NotOptedIn { .. }));
        let buyer_after = wallet.gateway().account_info(buyer.address()).await.unwrap().amount;
        assert_eq!(buyer_after, buyer_before);
    }

    #[tokio::test]
    async fn self_swap_rejected_locally() {
        let wallet = wallet();
        let (seller, _, asset_id) = funded_with_asset(&wallet).await;
        let calls = wallet.gateway().submit_calls();

        let err = wallet
            .atomic_swap(AtomicSwap {
                buyer: &seller,
                seller: &seller,
                asset_id,
                asset_amount: 1,
                price: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidParameter(_)));
        assert_eq!(wallet.gateway().submit_calls(), calls);
    }
}
