//! Account address derivation from public keys.
//!
//! Address format: base32(public_key ‖ checksum), 58 upper-case characters, no padding.
//!
//! Checksum: last 4 bytes of SHA-512/256(public_key).
//! Base32 alphabet: RFC 4648 (`A-Z`, `2-7`).

use asaflow_types::{Address, PublicKey};

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = Address::ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const CHECKSUM_LEN: usize = 4;
/// Public key plus checksum.
const PAYLOAD_LEN: usize = 32 + CHECKSUM_LEN;

/// Encode a byte slice as unpadded base32.
fn encode_base32(bytes: &[u8]) -> String {
    let num_chars = (bytes.len() * 8).div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(Address::ALPHABET[idx] as char);
        }
    }
    // Remaining bits, padded with zeros on the right.
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(Address::ALPHABET[idx] as char);
    }

    result
}

/// Decode unpadded base32 into a fixed-size byte array.
///
/// Returns `None` on invalid characters, a short input, or non-zero padding bits.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        let val = *BASE32_DECODE.get(c as usize)?;
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos == N {
                return None;
            }
            result[pos] = (buffer >> bits_in_buffer) as u8;
            pos += 1;
        }
    }

    if pos < N || buffer & ((1 << bits_in_buffer) - 1) != 0 {
        return None;
    }
    Some(result)
}

fn checksum(public_key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
    let digest = crate::sha512_256(public_key);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[32 - CHECKSUM_LEN..]);
    out
}

/// Derive the address of a public key. Pure function of the key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..32].copy_from_slice(public_key.as_bytes());
    payload[32..].copy_from_slice(&checksum(public_key.as_bytes()));
    Address::new(encode_base32(&payload))
}

/// Extract the public key bytes from an address.
///
/// Returns `None` if the address is malformed or its checksum does not match.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    if address.len() != Address::LEN {
        return None;
    }
    let payload: [u8; PAYLOAD_LEN] = decode_base32_fixed(address)?;

    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&payload[..32]);
    if payload[32..] != checksum(&public_key) {
        return None;
    }
    Some(public_key)
}

/// Recover the public key behind an address.
pub fn public_key_from_address(address: &Address) -> Option<PublicKey> {
    decode_address(address.as_str()).map(PublicKey)
}

/// Validate that an address is well-formed and its checksum is correct.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn derive_and_validate() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert_eq!(addr.as_str().len(), Address::LEN);
        assert!(addr.is_well_formed());
        assert!(validate_address(addr.as_str()));
    }

    #[test]
    fn derive_is_deterministic() {
        let kp = keypair_from_seed(&[7u8; 32]);
        assert_eq!(derive_address(&kp.public), derive_address(&kp.public));
    }

    #[test]
    fn decode_roundtrip() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        assert_eq!(decode_address(addr.as_str()).unwrap(), kp.public.0);
        assert_eq!(public_key_from_address(&addr).unwrap(), kp.public);
    }

    #[test]
    fn zero_key_has_known_prefix() {
        // 32 zero bytes encode to 51 'A's before the checksum bits start.
        let addr = derive_address(&PublicKey([0u8; 32]));
        assert!(addr.as_str().starts_with(&"A".repeat(51)));
    }

    #[test]
    fn invalid_checksum_rejected() {
        let kp = generate_keypair();
        let addr = derive_address(&kp.public);
        let mut bad = addr.as_str().to_string();
        // Flip a character inside the checksum region.
        let c = bad.remove(54);
        bad.insert(54, if c == 'A' { 'B' } else { 'A' });
        assert!(!validate_address(&bad));
    }

    #[test]
    fn wrong_length_and_alphabet_rejected() {
        assert!(!validate_address(""));
        assert!(!validate_address("TOOSHORT"));
        let kp = generate_keypair();
        let lower = derive_address(&kp.public).as_str().to_lowercase();
        assert!(!validate_address(&lower));
    }

    #[test]
    fn base32_encode_decode_roundtrip() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x42];
        let encoded = encode_base32(&data);
        assert_eq!(encoded, "32W3532C");
        let decoded: [u8; 5] = decode_base32_fixed(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn different_keys_different_addresses() {
        let k1 = generate_keypair();
        let k2 = generate_keypair();
        assert_ne!(derive_address(&k1.public), derive_address(&k2.public));
    }
}
