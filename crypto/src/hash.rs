//! SHA-512/256 hashing for transaction and group identifiers.

use sha2::{Digest, Sha512_256};

/// Compute the SHA-512/256 digest of arbitrary data.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha512_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash `data` behind a domain-separation prefix such as `b"TX"` or `b"TG"`.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> [u8; 32] {
    sha512_256_multi(&[domain, data])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_256_deterministic() {
        assert_eq!(sha512_256(b"asset"), sha512_256(b"asset"));
    }

    #[test]
    fn sha512_256_different_inputs() {
        assert_ne!(sha512_256(b"hello"), sha512_256(b"world"));
    }

    #[test]
    fn sha512_256_known_vector() {
        // FIPS 180-4 test vector for "abc".
        let digest = sha512_256(b"abc");
        assert_eq!(digest[..4], [0x53, 0x04, 0x8e, 0x26]);
    }

    #[test]
    fn multi_equivalent_to_concatenation() {
        assert_eq!(
            sha512_256(b"helloworld"),
            sha512_256_multi(&[b"hello", b"world"])
        );
    }

    #[test]
    fn domain_separates() {
        assert_ne!(hash_with_domain(b"TX", b"data"), hash_with_domain(b"TG", b"data"));
        assert_eq!(hash_with_domain(b"TX", b"data"), sha512_256(b"TXdata"));
    }
}
