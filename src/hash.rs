//! SHA-1 content hashing (spec §4.1). This system mirrors Git's conceptual
//! model; collision-resistance is not a security property anything here
//! relies on.

use sha1::{Digest, Sha1};

use crate::error::{Result, UgitError};

pub const HASH_LEN: usize = 20;
pub const HASH_HEX_LEN: usize = HASH_LEN * 2;

/// The 40-hex-digit object identity used throughout the store, index, and refs.
pub type Hash = [u8; HASH_LEN];

/// Number of hex characters shown in short-form output (`add`, `commit`, `branch`).
pub const SHORT_HASH_LEN: usize = 8;

#[must_use]
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

#[must_use]
pub fn short_hex(hash: &Hash) -> String {
    let full = hash_to_hex(hash);
    full[..SHORT_HASH_LEN].to_string()
}

pub fn hex_to_hash(s: &str) -> Result<Hash> {
    let bytes = hex::decode(s.trim()).map_err(|_| UgitError::UnknownObject(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_: Vec<u8>| UgitError::UnknownObject(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_of_framed_hello_blob_matches_known_sha1() {
        let framed = b"blob 5\0hello";
        let hash = hash_bytes(framed);
        assert_eq!(hash_to_hex(&hash), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn hash_is_deterministic() {
        let data = b"same content every time";
        assert_eq!(hash_bytes(data), hash_bytes(data));
    }

    #[test]
    fn hex_roundtrip() {
        let hash = hash_bytes(b"roundtrip me");
        let hex = hash_to_hex(&hash);
        assert_eq!(hex_to_hash(&hex).unwrap(), hash);
    }

    #[test]
    fn short_hex_is_prefix_of_full() {
        let hash = hash_bytes(b"abc");
        let full = hash_to_hex(&hash);
        assert_eq!(short_hex(&hash), &full[..SHORT_HASH_LEN]);
    }

    #[test]
    fn hex_to_hash_rejects_bad_input() {
        assert!(hex_to_hash("not hex").is_err());
        assert!(hex_to_hash("ab").is_err());
    }
}
