//! Asset transfer between accounts.

use asaflow_types::{Address, AssetId};
use serde::{Deserialize, Serialize};

use crate::header::TxHeader;

/// Moves `amount` base units of `asset_id` to `receiver`, who must have opted in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransferTx {
    pub header: TxHeader,
    pub asset_id: AssetId,
    pub receiver: Address,
    pub amount: u64,
}
