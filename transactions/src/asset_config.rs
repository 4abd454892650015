//! Asset configuration transaction: creates a new asset.

use asaflow_types::Address;
use serde::{Deserialize, Serialize};

use crate::header::TxHeader;

/// Accounts allowed to manage an asset after creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlAddresses {
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

impl ControlAddresses {
    /// Give every control role to one account, as issuers usually do.
    pub fn all(address: &Address) -> Self {
        Self {
            manager: Some(address.clone()),
            reserve: Some(address.clone()),
            freeze: Some(address.clone()),
            clawback: Some(address.clone()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        [&self.manager, &self.reserve, &self.freeze, &self.clawback]
            .into_iter()
            .flatten()
    }
}

/// Immutable parameters of a new asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetParams {
    /// Total number of base units ever issued.
    pub total: u64,
    /// Base units per whole unit is `10^decimals`.
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: Option<String>,
    pub controls: ControlAddresses,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfigTx {
    pub header: TxHeader,
    pub params: AssetParams,
}
