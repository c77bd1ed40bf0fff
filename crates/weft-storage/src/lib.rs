//! # weft-storage
//!
//! Merkle-verified chunk storage for the weft emulator.
//!
//! Payloads are split into variable-size chunks whose hashes form a Merkle
//! tree; its root (the data root) identifies the payload. Each chunk is
//! uploaded with a data path proving its inclusion under that root, and is
//! admitted to the chunk store only after the path validates.
//!
//! ## Modules
//!
//! - [`chunker`]: payload splitting with final-chunk rebalancing.
//! - [`merkle`]: tree construction, data path generation and validation.
//! - [`submission`]: decode, validate and persist submitted chunks.

pub mod chunker;
pub mod merkle;
pub mod submission;

/// Error types for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Payload is empty.
    #[error("content data is empty")]
    EmptyContent,

    /// Chunk size limits are inconsistent.
    #[error("invalid chunk sizes: min {min}, max {max}")]
    InvalidChunkSizes { min: usize, max: usize },
}

/// Convenience result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
