//! Cryptographic primitives for asaflow.
//!
//! - **Ed25519** for transaction signing and signature verification
//! - **SHA-512/256** with two-byte domain prefixes for transaction and group ids
//! - Address derivation: base32 of public key plus checksum
//! - Recovery phrases: BIP-39 words encoding the 32-byte secret seed

pub mod address;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod sign;

pub use address::{decode_address, derive_address, public_key_from_address, validate_address};
pub use hash::{hash_with_domain, sha512_256, sha512_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use mnemonic::{
    keypair_from_phrase, phrase_from_private, private_from_phrase, validate_phrase, MnemonicError,
};
pub use sign::{sign_message, verify_signature};
