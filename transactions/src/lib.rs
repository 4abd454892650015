//! asaflow transaction types and the atomic settlement core.
//!
//! Transaction types:
//! - **AssetConfig**: create a new asset
//! - **AssetOptIn**: register an account as willing to hold an asset
//! - **AssetTransfer**: move asset units between accounts
//! - **Payment**: move native microunits between accounts
//!
//! Builders ([`builder`]) are pure constructors; [`encoding`] defines the
//! canonical byte form that ids and signatures cover; [`group`] binds an ordered
//! sequence into an atomic group and signs it.

pub mod asset_config;
pub mod asset_transfer;
pub mod builder;
pub mod encoding;
pub mod error;
pub mod group;
pub mod header;
pub mod opt_in;
pub mod payment;
pub mod signed;
pub mod validation;

pub use asset_config::{AssetConfigTx, AssetParams, ControlAddresses};
pub use asset_transfer::AssetTransferTx;
pub use builder::{
    build_asset_config, build_asset_opt_in, build_asset_transfer, build_payment, AssetDefinition,
};
pub use error::TransactionError;
pub use group::{compute_group_id, SignedGroup, TransactionGroup};
pub use header::TxHeader;
pub use opt_in::AssetOptInTx;
pub use payment::PaymentTx;
pub use signed::{sign_transaction, SignedTransaction, Signers};
pub use validation::validate_transaction;

use asaflow_types::{Address, GroupId, TxId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified transaction enum wrapping all transaction types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    AssetConfig(AssetConfigTx),
    AssetOptIn(AssetOptInTx),
    AssetTransfer(AssetTransferTx),
    Payment(PaymentTx),
}

/// Discriminant of [`Transaction`], for logging and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    AssetConfig,
    AssetOptIn,
    AssetTransfer,
    Payment,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AssetConfig => "acfg",
            Self::AssetOptIn => "optin",
            Self::AssetTransfer => "axfer",
            Self::Payment => "pay",
        })
    }
}

impl Transaction {
    pub fn header(&self) -> &TxHeader {
        match self {
            Self::AssetConfig(tx) => &tx.header,
            Self::AssetOptIn(tx) => &tx.header,
            Self::AssetTransfer(tx) => &tx.header,
            Self::Payment(tx) => &tx.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut TxHeader {
        match self {
            Self::AssetConfig(tx) => &mut tx.header,
            Self::AssetOptIn(tx) => &mut tx.header,
            Self::AssetTransfer(tx) => &mut tx.header,
            Self::Payment(tx) => &mut tx.header,
        }
    }

    /// The account that must sign this transaction.
    pub fn sender(&self) -> &Address {
        &self.header().sender
    }

    pub fn fee(&self) -> u64 {
        self.header().fee
    }

    pub fn group(&self) -> Option<&GroupId> {
        self.header().group.as_ref()
    }

    pub fn tx_type(&self) -> TxType {
        match self {
            Self::AssetConfig(_) => TxType::AssetConfig,
            Self::AssetOptIn(_) => TxType::AssetOptIn,
            Self::AssetTransfer(_) => TxType::AssetTransfer,
            Self::Payment(_) => TxType::Payment,
        }
    }

    /// Identifier of this transaction: digest of its canonical encoding.
    pub fn id(&self) -> Result<TxId, TransactionError> {
        encoding::tx_id(self)
    }
}
