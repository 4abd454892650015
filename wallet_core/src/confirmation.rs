//! Waiting for a submitted transaction to become final.
//!
//! A wait moves `Pending -> Confirmed | TimedOut`. Each round the waiter asks
//! the gateway for the transaction's status once; between rounds it blocks on
//! the gateway until the ledger advances. Transient query failures are retried
//! in place and do not spend the round budget.

use std::future::Future;

use asaflow_gateway::{GatewayError, LedgerGateway};
use asaflow_types::{AssetId, Round, TxId};

use crate::config::ConfirmationConfig;
use crate::WalletError;

/// A transaction that reached a confirmed round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_id: TxId,
    pub confirmed_round: Round,
    /// Id of the asset created by the transaction, if it created one.
    pub asset_index: Option<AssetId>,
}

/// Polls a gateway until a transaction confirms or the round budget runs out.
#[derive(Clone, Debug, Default)]
pub struct ConfirmationWaiter {
    config: ConfirmationConfig,
}

impl ConfirmationWaiter {
    pub fn new(config: ConfirmationConfig) -> Self {
        Self { config }
    }

    /// Wait for `tx_id` to confirm.
    ///
    /// Makes exactly `max_rounds` status queries, plus at most
    /// `transient_retries` extra attempts per query, before failing with
    /// [`WalletError::ConfirmationTimeout`].
    pub async fn wait<G: LedgerGateway>(
        &self,
        gateway: &G,
        tx_id: TxId,
    ) -> Result<Confirmation, WalletError> {
        let max_rounds = self.config.max_rounds;
        let mut round = self.retrying("last_round", || gateway.last_round()).await?;

        for checked in 1..=max_rounds {
            let status = self
                .retrying("transaction_status", || gateway.transaction_status(&tx_id))
                .await?;

            if let Some(confirmed_round) = status.confirmed_round {
                tracing::info!(
                    tx_id = %tx_id,
                    round = %confirmed_round,
                    asset_id = ?status.asset_index.map(|id| id.get()),
                    "transaction confirmed"
                );
                return Ok(Confirmation {
                    tx_id,
                    confirmed_round,
                    asset_index: status.asset_index,
                });
            }
            if let Some(reason) = status.pool_error.filter(|e| !e.is_empty()) {
                tracing::warn!(tx_id = %tx_id, %reason, "transaction dropped from pool");
                return Err(WalletError::Rejected { reason });
            }

            tracing::debug!(tx_id = %tx_id, round = %round, checked, "transaction pending");
            if checked < max_rounds {
                round = self
                    .retrying("wait_for_round_after", || gateway.wait_for_round_after(round))
                    .await?;
            }
        }

        tracing::warn!(tx_id = %tx_id, rounds = max_rounds, "confirmation timed out");
        Err(WalletError::ConfirmationTimeout {
            tx_id,
            rounds: max_rounds,
        })
    }

    /// Run a gateway query, retrying transient failures with backoff.
    async fn retrying<T, F, Fut>(&self, what: &'static str, mut query: F) -> Result<T, WalletError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut attempt = 0;
        loop {
            match query().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.config.transient_retries => {
                    attempt += 1;
                    let delay = self.config.backoff(attempt);
                    tracing::warn!(query = what, attempt, error = %e, ?delay, "retrying ledger query");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Wait for `tx_id` with a custom round budget and default retry policy.
pub async fn await_confirmation<G: LedgerGateway>(
    gateway: &G,
    tx_id: TxId,
    max_rounds: u64,
) -> Result<Confirmation, WalletError> {
    ConfirmationWaiter::new(ConfirmationConfig {
        max_rounds,
        ..ConfirmationConfig::default()
    })
    .wait(gateway, tx_id)
    .await
}
