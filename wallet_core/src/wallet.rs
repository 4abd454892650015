//! The wallet facade: one gateway, one configuration, every operation.

use asaflow_gateway::LedgerGateway;
use asaflow_transactions::encoding::encode_signed_batch;
use asaflow_transactions::{SignedGroup, SignedTransaction, Signers, Transaction};
use asaflow_types::{SuggestedParams, TxId};

use crate::account::Account;
use crate::config::WalletConfig;
use crate::confirmation::{Confirmation, ConfirmationWaiter};
use crate::WalletError;

/// Wallet operations against a ledger reached through `G`.
///
/// Holds no account state of its own: every operation takes the accounts it
/// signs with, and ledger state is always read fresh from the gateway.
pub struct Wallet<G> {
    gateway: G,
    config: WalletConfig,
    waiter: ConfirmationWaiter,
}

impl<G: LedgerGateway> Wallet<G> {
    /// Fails with [`WalletError::Config`] if `config` does not validate.
    pub fn new(gateway: G, config: WalletConfig) -> Result<Self, WalletError> {
        config.validate()?;
        let waiter = ConfirmationWaiter::new(config.confirmation.clone());
        Ok(Self {
            gateway,
            config,
            waiter,
        })
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Fresh suggested params with the configured fee policy applied.
    pub async fn params(&self) -> Result<SuggestedParams, WalletError> {
        let params = self.gateway.suggested_params().await?;
        Ok(self.config.fee.apply(params))
    }

    /// Sign a single transaction with `account`, submit it and wait for confirmation.
    pub(crate) async fn sign_and_confirm(
        &self,
        account: &Account,
        tx: Transaction,
    ) -> Result<Confirmation, WalletError> {
        let signed = Signers::new().add(account.keypair()).sign(tx)?;
        self.submit_single(signed).await
    }

    pub(crate) async fn submit_single(
        &self,
        signed: SignedTransaction,
    ) -> Result<Confirmation, WalletError> {
        let tx_type = signed.txn.tx_type();
        let bytes = encode_signed_batch(std::slice::from_ref(&signed))?;
        let tx_id = self.submit_bytes(&bytes).await?;
        tracing::info!(
            tx_id = %tx_id,
            %tx_type,
            sender = %signed.txn.sender(),
            "submitted transaction"
        );
        self.waiter.wait(&self.gateway, tx_id).await
    }

    /// Submit a signed group as one unit and wait for its first member to confirm.
    pub(crate) async fn submit_group(
        &self,
        group: &SignedGroup,
    ) -> Result<Confirmation, WalletError> {
        let tx_id = self.submit_bytes(&group.to_bytes()?).await?;
        let expected = group.first_tx_id()?;
        if tx_id != expected {
            tracing::warn!(tx_id = %tx_id, %expected, "gateway returned an unexpected id for group");
        }
        tracing::info!(
            tx_id = %tx_id,
            group = %group.id(),
            members = group.members().len(),
            "submitted group"
        );
        self.waiter.wait(&self.gateway, expected).await
    }

    async fn submit_bytes(&self, bytes: &[u8]) -> Result<TxId, WalletError> {
        self.gateway.submit(bytes).await.map_err(|e| {
            tracing::warn!(error = %e, "submission failed");
            WalletError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfirmationConfig, FeeConfig};
    use asaflow_nullables::NullLedger;

    #[test]
    fn zero_round_budget_is_refused() {
        let config = WalletConfig {
            confirmation: ConfirmationConfig {
                max_rounds: 0,
                ..ConfirmationConfig::default()
            },
            ..WalletConfig::default()
        };
        let Err(err) = Wallet::new(NullLedger::new(), config) else {
            panic!("wallet accepted a zero round budget");
        };
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn flat_fee_below_minimum_is_refused() {
        let config = WalletConfig {
            fee: FeeConfig {
                use_suggested: false,
                flat_fee: 999,
            },
            ..WalletConfig::default()
        };
        let Err(err) = Wallet::new(NullLedger::new(), config) else {
            panic!("wallet accepted a flat fee below the minimum");
        };
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn default_config_builds_a_wallet() {
        let wallet = Wallet::new(NullLedger::new(), WalletConfig::default()).expect("valid config");
        assert_eq!(wallet.config(), &WalletConfig::default());
    }
}
