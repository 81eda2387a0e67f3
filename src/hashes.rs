//! Hash primitives shared across the crate
//!
//! SHA-256, double SHA-256, HASH160 and the BIP-340 tagged hash. All of the
//! byte-exact constructions elsewhere (txids, sighashes, base58 checksums,
//! message commitments) are built on these four functions.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA256(data)
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Compute double SHA256 (Bitcoin's standard transaction/message digest)
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute HASH160 = RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    let mut output = [0u8; 20];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// BIP-340 tagged hash computation
///
/// tagged_hash(tag, msg) = SHA256(SHA256(tag) || SHA256(tag) || msg)
///
/// This provides domain separation between different uses of the hash function.
pub fn tagged_hash(tag: &str, msg: &[u8]) -> [u8; 32] {
    let tag_hash = sha256(tag.as_bytes());

    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(msg);

    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256d_known_vector() {
        // sha256d of the empty string
        let hash = sha256d(b"");
        assert_eq!(
            hex::encode(hash),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_hash160_length_and_determinism() {
        let h1 = hash160(b"hello");
        let h2 = hash160(b"hello");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 20);
        assert_ne!(hash160(b"hello"), hash160(b"world"));
    }

    #[test]
    fn test_tagged_hash_domain_separation() {
        let msg = [0u8; 32];
        let h1 = tagged_hash("BIP0322-signed-message", &msg);
        let h2 = tagged_hash("TapSighash", &msg);
        assert_ne!(h1, h2);
    }
}
