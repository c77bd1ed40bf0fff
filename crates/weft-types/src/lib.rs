//! # weft-types
//!
//! Shared domain types used across the weft workspace: ledger entities
//! (transactions, blocks, tags), chunk envelopes, and the structured query
//! filters consumed by the planner in `weft-db`.

pub mod chunk;
pub mod encoding;
pub mod ledger;
pub mod query;

/// Common type aliases.
pub type Hash = [u8; 32];
pub type DataRoot = [u8; 32];
/// Base64url-encoded transaction identifier.
pub type TxId = String;
pub type Bytes = Vec<u8>;

/// Size of every hash in the network (SHA-256 output).
pub const HASH_SIZE: usize = 32;

/// Size of an offset note inside a data path (32-byte big-endian integer).
pub const NOTE_SIZE: usize = 32;

/// Largest chunk a client may produce: 256 KiB.
pub const MAX_CHUNK_SIZE: usize = 256 * 1024;

/// Smallest non-final chunk a client may produce: 32 KiB.
pub const MIN_CHUNK_SIZE: usize = 32 * 1024;

/// Transaction queries return this many rows when no limit is given.
pub const DEFAULT_QUERY_LIMIT: u32 = 10;
