//! # weft-crypto
//!
//! Hash primitives for the weft emulator.
//!
//! The network's Merkle trees combine hashes with a single designated hash
//! function. [`MerkleHasher`] abstracts that function so tree construction
//! and path validation can run against a substitute in tests.
//!
//! ## Modules
//!
//! - [`sha256`]: SHA-256, the network's designated hash.
//! - [`blake3`]: BLAKE3, a drop-in substitute hasher.

pub mod blake3;
pub mod sha256;

pub use weft_types::Hash;

/// The hash function used to build and check Merkle data paths.
pub trait MerkleHasher {
    /// Hash the concatenation of `parts`.
    fn digest(parts: &[&[u8]]) -> Hash;

    /// Hash a single buffer.
    fn hash(data: &[u8]) -> Hash {
        Self::digest(&[data])
    }
}

/// SHA-256 Merkle hasher (the network default).
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn digest(parts: &[&[u8]]) -> Hash {
        sha256::hash_concat(parts)
    }
}

/// BLAKE3 Merkle hasher.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn digest(parts: &[&[u8]]) -> Hash {
        blake3::hash_concat(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_concatenation() {
        assert_eq!(
            Sha256Hasher::digest(&[b"te", b"st"]),
            Sha256Hasher::hash(b"test")
        );
        assert_eq!(
            Blake3Hasher::digest(&[b"te", b"st"]),
            Blake3Hasher::hash(b"test")
        );
    }

    #[test]
    fn test_hashers_differ() {
        assert_ne!(Sha256Hasher::hash(b"test"), Blake3Hasher::hash(b"test"));
    }
}
