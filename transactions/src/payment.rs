//! Native currency payment.

use asaflow_types::Address;
use serde::{Deserialize, Serialize};

use crate::header::TxHeader;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTx {
    pub header: TxHeader,
    pub receiver: Address,
    /// Amount in microunits.
    pub amount: u64,
}
