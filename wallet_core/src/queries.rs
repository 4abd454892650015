//! Read-only projections of ledger state.

use std::fmt;

use asaflow_gateway::LedgerGateway;
use asaflow_types::{Address, AssetId};

use crate::wallet::Wallet;
use crate::WalletError;

/// An account's position in one asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Holding {
    /// Opted in; may be zero.
    Held(u64),
    /// Never opted in.
    NotHeld,
}

impl Holding {
    pub fn amount(&self) -> u64 {
        match self {
            Self::Held(amount) => *amount,
            Self::NotHeld => 0,
        }
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Held(amount) => write!(f, "{amount}"),
            Self::NotHeld => f.write_str("not held"),
        }
    }
}

/// One row of a holdings report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoldingEntry {
    pub address: Address,
    pub holding: Result<Holding, WalletError>,
}

impl<G: LedgerGateway> Wallet<G> {
    /// Native balance of `address` in microunits.
    ///
    /// An unknown account is an error, never a zero balance.
    pub async fn account_balance(&self, address: &Address) -> Result<u64, WalletError> {
        Ok(self.gateway().account_info(address).await?.amount)
    }

    pub async fn asset_holding(
        &self,
        address: &Address,
        asset_id: AssetId,
    ) -> Result<Holding, WalletError> {
        let info = self.gateway().account_info(address).await?;
        Ok(info
            .holding(asset_id)
            .map_or(Holding::NotHeld, |h| Holding::Held(h.amount)))
    }

    /// Holdings of `asset_id` for each address, in the order given.
    pub async fn holdings_report(
        &self,
        asset_id: AssetId,
        addresses: &[Address],
    ) -> Vec<HoldingEntry> {
        let mut report = Vec::with_capacity(addresses.len());
        for address in addresses {
            let holding = self.asset_holding(address, asset_id).await;
            if let Ok(Holding::NotHeld) = holding {
                tracing::debug!(%address, asset_id = %asset_id, "address does not hold asset");
            }
            report.push(HoldingEntry {
                address: address.clone(),
                holding,
            });
        }
        report
    }
}
