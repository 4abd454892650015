//! Fundamental types for asaflow.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, key material, transaction and group identifiers, rounds, asset ids,
//! suggested transaction parameters and the protocol limits they are checked against.

pub mod address;
pub mod asset;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;
pub mod round;

pub use address::Address;
pub use asset::AssetId;
pub use error::TypesError;
pub use hash::{GroupId, TxId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::SuggestedParams;
pub use round::Round;
