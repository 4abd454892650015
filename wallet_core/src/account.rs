//! Account identity: a key pair, its address and its recovery phrase.

use asaflow_crypto::{
    derive_address, generate_keypair, keypair_from_phrase, keypair_from_seed, phrase_from_private,
};
use asaflow_types::{Address, KeyPair, PublicKey};

use crate::WalletError;

/// A signing account.
///
/// Immutable once created. Holds secret key material, so it is neither
/// `Clone` nor `Debug`; nothing in this crate persists it.
pub struct Account {
    keypair: KeyPair,
    address: Address,
}

impl Account {
    fn from_keypair(keypair: KeyPair) -> Self {
        let address = derive_address(&keypair.public);
        Self { keypair, address }
    }

    /// Generate a fresh account from OS randomness.
    pub fn generate() -> Self {
        Self::from_keypair(generate_keypair())
    }

    /// Recover an account from its 24-word recovery phrase.
    pub fn from_phrase(phrase: &str) -> Result<Self, WalletError> {
        Ok(Self::from_keypair(keypair_from_phrase(phrase)?))
    }

    /// Deterministic account from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_keypair(keypair_from_seed(seed))
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// The phrase that recovers this account.
    pub fn recovery_phrase(&self) -> Result<String, WalletError> {
        Ok(phrase_from_private(&self.keypair.private)?)
    }
}

/// Source of accounts.
pub trait IdentityProvider {
    fn generate(&self) -> Account;

    fn recover(&self, phrase: &str) -> Result<Account, WalletError>;
}

/// Accounts backed by OS randomness and BIP-39 recovery phrases.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhraseIdentityProvider;

impl IdentityProvider for PhraseIdentityProvider {
    fn generate(&self) -> Account {
        Account::generate()
    }

    fn recover(&self, phrase: &str) -> Result<Account, WalletError> {
        Account::from_phrase(phrase)
    }
}
