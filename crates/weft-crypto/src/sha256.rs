//! SHA-256 hashing.

use sha2::{Digest, Sha256};

use crate::Hash;

/// Compute the SHA-256 hash of `data`.
pub fn hash(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Compute the SHA-256 hash of the concatenation of `parts`.
pub fn hash_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
