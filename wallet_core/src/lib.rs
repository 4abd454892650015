//! Wallet core library for asaflow.
//!
//! Provides everything an asset workflow needs on top of a ledger gateway:
//! - Account identity (key pair, address, recovery phrase)
//! - Standard and fractional asset issuance
//! - Opt-in, single transfers and atomic swaps
//! - Fractional distribution with per-recipient outcomes
//! - Round-bounded confirmation waits
//! - Balance and asset-holding queries

pub mod account;
pub mod config;
pub mod confirmation;
pub mod distribution;
pub mod error;
pub mod issuance;
pub mod queries;
pub mod transfer;
pub mod wallet;

pub use account::{Account, IdentityProvider, PhraseIdentityProvider};
pub use config::{ConfirmationConfig, DecimalsPolicy, FeeConfig, WalletConfig};
pub use confirmation::{await_confirmation, Confirmation, ConfirmationWaiter};
pub use distribution::{
    DistributionPlan, DistributionReport, DistributionShare, RecipientOutcome,
};
pub use error::WalletError;
pub use issuance::fractional_decimals;
pub use queries::{Holding, HoldingEntry};
pub use transfer::{AtomicSwap, SwapReceipt};
pub use wallet::Wallet;
