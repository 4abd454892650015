//! Ledger view records and the gateway trait.

use asaflow_types::{Address, AssetId, Round, SuggestedParams, TxId};
use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// One asset held by an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub asset_id: AssetId,
    /// Base units held. Zero after opt-in and before any transfer.
    pub amount: u64,
    #[serde(default)]
    pub frozen: bool,
}

/// Ledger state of one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: Address,
    /// Native balance in microunits.
    pub amount: u64,
    /// Balance the account must keep; not spendable.
    #[serde(default)]
    pub min_balance: u64,
    #[serde(default)]
    pub assets: Vec<AssetHolding>,
    #[serde(default)]
    pub created_assets: Vec<AssetId>,
}

impl AccountInfo {
    /// Microunits available for fees and payments.
    pub fn spendable(&self) -> u64 {
        self.amount.saturating_sub(self.min_balance)
    }

    /// The holding for `asset_id`, if the account has opted in.
    pub fn holding(&self, asset_id: AssetId) -> Option<&AssetHolding> {
        self.assets.iter().find(|h| h.asset_id == asset_id)
    }
}

/// Parameters of an existing asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub id: AssetId,
    pub creator: Address,
    pub total: u64,
    pub decimals: u32,
    pub unit_name: String,
    pub asset_name: String,
}

/// What the ledger knows about a submitted transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    /// Round the transaction became final in, once it has.
    pub confirmed_round: Option<Round>,
    /// Id assigned to an asset created by this transaction.
    pub asset_index: Option<AssetId>,
    /// Set when the pool dropped the transaction after accepting it.
    #[serde(default)]
    pub pool_error: Option<String>,
}

impl TransactionStatus {
    pub fn pending() -> Self {
        Self::default()
    }
}

/// Everything the wallet core consumes from a ledger node.
///
/// Implementations must treat `submit` as all-or-nothing for a batch: either
/// every signed transaction in the bytes is accepted or none is.
#[allow(async_fn_in_trait)]
pub trait LedgerGateway {
    /// Fresh parameters for a batch of transactions.
    async fn suggested_params(&self) -> Result<SuggestedParams, GatewayError>;

    async fn account_info(&self, address: &Address) -> Result<AccountInfo, GatewayError>;

    async fn asset_info(&self, asset_id: AssetId) -> Result<AssetInfo, GatewayError>;

    /// Submit an encoded batch of signed transactions; returns the first member's id.
    async fn submit(&self, signed_bytes: &[u8]) -> Result<TxId, GatewayError>;

    async fn transaction_status(&self, tx_id: &TxId) -> Result<TransactionStatus, GatewayError>;

    async fn last_round(&self) -> Result<Round, GatewayError>;

    /// Block until the ledger has moved past `round`; returns the new last round.
    async fn wait_for_round_after(&self, round: Round) -> Result<Round, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(amount: u64, min_balance: u64) -> AccountInfo {
        AccountInfo {
            address: Address::new("ALICE"),
            amount,
            min_balance,
            assets: vec![AssetHolding {
                asset_id: AssetId::new(7),
                amount: 0,
                frozen: false,
            }],
            created_assets: vec![],
        }
    }

    #[test]
    fn spendable_excludes_min_balance() {
        assert_eq!(info(5_000, 1_000).spendable(), 4_000);
        assert_eq!(info(500, 1_000).spendable(), 0);
    }

    #[test]
    fn opted_in_with_zero_is_a_holding() {
        let info = info(0, 0);
        assert_eq!(info.holding(AssetId::new(7)).map(|h| h.amount), Some(0));
        assert!(info.holding(AssetId::new(8)).is_none());
    }

    #[test]
    fn account_info_defaults_optional_fields() {
        let json = r#"{"address":"ALICE","amount":12}"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.amount, 12);
        assert!(info.assets.is_empty());
        assert_eq!(info.min_balance, 0);
    }
}
