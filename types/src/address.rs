//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// An account address: 58 characters of upper-case RFC 4648 base32.
///
/// Derived from the account's public key plus a 4-byte checksum
/// (see `asaflow_crypto::derive_address`). This type only checks the
/// textual shape; checksum verification lives in the crypto crate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Encoded length: ceil((32 + 4) * 8 / 5).
    pub const LEN: usize = 58;

    /// The base32 alphabet used by addresses.
    pub const ALPHABET: &'static [u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

    /// Wrap a raw string without any validation.
    ///
    /// Builders validate addresses before they reach the ledger, so an
    /// ill-formed value constructed here surfaces as an invalid-parameter error.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a string, rejecting anything that is not shaped like an address.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let candidate = Self(raw.trim().to_string());
        if candidate.is_well_formed() {
            Ok(candidate)
        } else {
            Err(TypesError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this address has the right length and alphabet.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN && self.0.bytes().all(|b| Self::ALPHABET.contains(&b))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
