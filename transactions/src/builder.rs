//! Pure transaction constructors.
//!
//! Builders perform no I/O and no signing. Each one assembles the typed record,
//! validates every field bound and fixes the fee from the suggested params.

use asaflow_types::{Address, AssetId, SuggestedParams};

use crate::asset_config::{AssetConfigTx, AssetParams, ControlAddresses};
use crate::asset_transfer::AssetTransferTx;
use crate::header::TxHeader;
use crate::opt_in::AssetOptInTx;
use crate::payment::PaymentTx;
use crate::signed::ENCODED_SIGNATURE_LEN;
use crate::{encoding, validation, Transaction, TransactionError};

/// What an issuer asks for when creating an asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDefinition {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: Option<String>,
}

/// Build an asset creation transaction.
pub fn build_asset_config(
    sender: &Address,
    params: &SuggestedParams,
    definition: AssetDefinition,
    controls: ControlAddresses,
) -> Result<Transaction, TransactionError> {
    let tx = Transaction::AssetConfig(AssetConfigTx {
        header: TxHeader::new(sender, params),
        params: AssetParams {
            total: definition.total,
            decimals: definition.decimals,
            default_frozen: definition.default_frozen,
            unit_name: definition.unit_name,
            asset_name: definition.asset_name,
            url: definition.url,
            controls,
        },
    });
    finish(tx, params)
}

/// Build an opt-in for `asset_id` (zero-amount self transfer semantics).
pub fn build_asset_opt_in(
    sender: &Address,
    params: &SuggestedParams,
    asset_id: AssetId,
) -> Result<Transaction, TransactionError> {
    let tx = Transaction::AssetOptIn(AssetOptInTx {
        header: TxHeader::new(sender, params),
        asset_id,
    });
    finish(tx, params)
}

/// Build a transfer of `amount` base units of `asset_id` from `sender` to `receiver`.
pub fn build_asset_transfer(
    sender: &Address,
    params: &SuggestedParams,
    receiver: &Address,
    amount: u64,
    asset_id: AssetId,
) -> Result<Transaction, TransactionError> {
    let tx = Transaction::AssetTransfer(AssetTransferTx {
        header: TxHeader::new(sender, params),
        asset_id,
        receiver: receiver.clone(),
        amount,
    });
    finish(tx, params)
}

/// Build a payment of `amount` microunits from `sender` to `receiver`.
pub fn build_payment(
    sender: &Address,
    params: &SuggestedParams,
    receiver: &Address,
    amount: u64,
) -> Result<Transaction, TransactionError> {
    let tx = Transaction::Payment(PaymentTx {
        header: TxHeader::new(sender, params),
        receiver: receiver.clone(),
        amount,
    });
    finish(tx, params)
}

fn finish(mut tx: Transaction, params: &SuggestedParams) -> Result<Transaction, TransactionError> {
    validation::validate_transaction(&tx)?;

    // The fee field is fixed-width, so the size measured here is final.
    let signed_len = encoding::encode(&tx)?.len() + ENCODED_SIGNATURE_LEN;
    tx.header_mut().fee = params.fee_for(signed_len);

    tracing::trace!(
        tx_type = %tx.tx_type(),
        sender = %tx.sender(),
        fee = tx.fee(),
        "built transaction"
    );
    Ok(tx)
}
