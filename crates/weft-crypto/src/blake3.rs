//! BLAKE3 hashing.

use crate::Hash;

/// Compute the BLAKE3 hash of `data`.
pub fn hash(data: &[u8]) -> Hash {
    *::blake3::hash(data).as_bytes()
}

/// Compute the BLAKE3 hash of the concatenation of `parts`.
pub fn hash_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = ::blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash(b"weft test vector"), hash(b"weft test vector"));
        assert_ne!(hash(b"input1"), hash(b"input2"));
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        assert_eq!(hash_concat(&[b"left", b"right"]), hash(b"leftright"));
    }
}
