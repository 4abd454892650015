//! Recovery phrases.
//!
//! A recovery phrase is the 24-word BIP-39 encoding of the account's 32-byte
//! Ed25519 secret seed (256 bits of entropy plus an 8-bit checksum). The phrase
//! and the private key therefore encode each other: no salt, no derivation path.

use asaflow_types::{KeyPair, PrivateKey};
use bip39::Mnemonic;
use thiserror::Error;
use zeroize::Zeroizing;

/// Number of words in a recovery phrase.
pub const PHRASE_WORDS: usize = 24;

/// Errors arising from recovery phrase operations.
#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("invalid recovery phrase: {0}")]
    InvalidPhrase(String),

    #[error("recovery phrase must have {PHRASE_WORDS} words, got {0}")]
    WrongWordCount(usize),

    #[error("encoding failed: {0}")]
    Encoding(String),
}

/// Encode a private key as its recovery phrase.
pub fn phrase_from_private(private: &PrivateKey) -> Result<String, MnemonicError> {
    let mnemonic = Mnemonic::from_entropy(private.as_bytes())
        .map_err(|e| MnemonicError::Encoding(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Decode a recovery phrase back into the private key it encodes.
pub fn private_from_phrase(phrase: &str) -> Result<PrivateKey, MnemonicError> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| MnemonicError::InvalidPhrase(e.to_string()))?;
    if mnemonic.word_count() != PHRASE_WORDS {
        return Err(MnemonicError::WrongWordCount(mnemonic.word_count()));
    }

    let entropy = Zeroizing::new(mnemonic.to_entropy());
    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&entropy);
    Ok(PrivateKey(*seed))
}

/// Decode a recovery phrase into a full key pair.
pub fn keypair_from_phrase(phrase: &str) -> Result<KeyPair, MnemonicError> {
    private_from_phrase(phrase).map(crate::keypair_from_private)
}

/// Whether a phrase is a valid 24-word recovery phrase.
pub fn validate_phrase(phrase: &str) -> bool {
    private_from_phrase(phrase).is_ok()
}
