//! Fields every transaction carries.

use asaflow_types::{Address, GroupId, Round, SuggestedParams};
use serde::{Deserialize, Serialize};

/// Common transaction header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    /// The account that must sign this transaction.
    pub sender: Address,
    /// Fee in microunits, fixed when the transaction is built.
    pub fee: u64,
    pub first_valid: Round,
    pub last_valid: Round,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
    pub note: Option<Vec<u8>>,
    /// Set by the group coordinator; identical across all members of a group.
    pub group: Option<GroupId>,
}

impl TxHeader {
    /// Header for `sender` with the validity window and network of `params`.
    ///
    /// The fee is left at zero; builders fill it in once the encoded size is known.
    pub fn new(sender: &Address, params: &SuggestedParams) -> Self {
        Self {
            sender: sender.clone(),
            fee: 0,
            first_valid: params.first_valid,
            last_valid: params.last_valid,
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash,
            note: None,
            group: None,
        }
    }
}
