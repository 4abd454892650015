//! Asset opt-in: registers the sender as willing to hold an asset.

use asaflow_types::AssetId;
use serde::{Deserialize, Serialize};

use crate::header::TxHeader;

/// Ledger semantics are those of a zero-amount asset transfer from the sender
/// to itself; it is the only transfer allowed to move nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOptInTx {
    pub header: TxHeader,
    pub asset_id: AssetId,
}
