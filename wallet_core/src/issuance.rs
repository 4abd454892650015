//! Asset issuance: standard assets and fractional NFTs.

use asaflow_gateway::{GatewayError, LedgerGateway};
use asaflow_transactions::{build_asset_config, AssetDefinition, ControlAddresses};
use asaflow_types::AssetId;

use crate::account::Account;
use crate::config::DecimalsPolicy;
use crate::wallet::Wallet;
use crate::WalletError;

/// Decimals of a fractional asset with `total_units` base units.
///
/// `floor(log10(total_units))`. Under [`DecimalsPolicy::Strict`] the total must
/// be exactly `10^decimals`.
pub fn fractional_decimals(total_units: u64, policy: DecimalsPolicy) -> Result<u32, WalletError> {
    if total_units == 0 {
        return Err(WalletError::InvalidParameter(
            "total units must be at least 1".into(),
        ));
    }
    let decimals = total_units.ilog10();
    if policy == DecimalsPolicy::Strict && 10u64.pow(decimals) != total_units {
        return Err(WalletError::InvalidParameter(format!(
            "fractional total {total_units} is not a power of ten"
        )));
    }
    Ok(decimals)
}

impl<G: LedgerGateway> Wallet<G> {
    /// Mint an indivisible asset of `total_units` units (decimals 0).
    pub async fn issue_standard_asset(
        &self,
        issuer: &Account,
        name: &str,
        total_units: u64,
    ) -> Result<AssetId, WalletError> {
        self.issue(issuer, name, total_units, 0).await
    }

    /// Mint a fractional NFT whose `total_units` are `10^decimals` shares.
    pub async fn issue_fractional_asset(
        &self,
        issuer: &Account,
        name: &str,
        total_units: u64,
    ) -> Result<AssetId, WalletError> {
        let decimals = fractional_decimals(total_units, self.config().decimals_policy)?;
        self.issue(issuer, name, total_units, decimals).await
    }

    async fn issue(
        &self,
        issuer: &Account,
        name: &str,
        total_units: u64,
        decimals: u32,
    ) -> Result<AssetId, WalletError> {
        if total_units == 0 {
            return Err(WalletError::InvalidParameter(
                "total units must be at least 1".into(),
            ));
        }
        if name.trim().is_empty() {
            return Err(WalletError::InvalidParameter("asset name is empty".into()));
        }

        let params = self.params().await?;
        let available = self.spendable(issuer).await?;
        // Cheapest possible fee first, so a broke issuer fails before building.
        ensure_covers(available, params.fee_for(0))?;

        let tx = build_asset_config(
            issuer.address(),
            &params,
            asset_definition(name, total_units, decimals),
            ControlAddresses::all(issuer.address()),
        )?;
        ensure_covers(available, tx.fee())?;

        tracing::info!(
            issuer = %issuer.address(),
            name,
            total_units,
            decimals,
            "issuing asset"
        );
        let confirmation = self.sign_and_confirm(issuer, tx).await?;
        confirmation.asset_index.ok_or_else(|| {
            WalletError::Query(GatewayError::InvalidResponse(format!(
                "confirmed asset creation {} carries no asset id",
                confirmation.tx_id
            )))
        })
    }

    /// Spendable microunits; an account the ledger has never seen holds nothing.
    async fn spendable(&self, account: &Account) -> Result<u64, WalletError> {
        match self.gateway().account_info(account.address()).await {
            Ok(info) => Ok(info.spendable()),
            Err(GatewayError::AccountNotFound(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

fn asset_definition(name: &str, total_units: u64, decimals: u32) -> AssetDefinition {
    AssetDefinition {
        total: total_units,
        decimals,
        default_frozen: false,
        unit_name: name.to_uppercase(),
        asset_name: name.to_lowercase(),
        url: None,
    }
}

fn ensure_covers(available: u64, fee: u64) -> Result<(), WalletError> {
    if available < fee {
        return Err(WalletError::InsufficientFunds {
            needed: fee,
            available,
        });
    }
    Ok(())
}
