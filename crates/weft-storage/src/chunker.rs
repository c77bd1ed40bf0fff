//! Payload chunking.
//!
//! Payloads are cut into chunks of at most `max_chunk_size` bytes. When the
//! remainder after a full chunk would be smaller than `min_chunk_size`, the
//! last two chunks are split evenly instead, so no chunk but a lone one is
//! ever below the minimum.

use weft_crypto::{Hash, MerkleHasher};
use weft_types::{MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};

use crate::{Result, StorageError};

/// One chunk of a payload: its data hash and byte range `[min, max)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkSpan {
    pub data_hash: Hash,
    pub min_byte_range: u64,
    pub max_byte_range: u64,
}

impl ChunkSpan {
    /// The chunk's bytes within `payload`.
    pub fn slice<'a>(&self, payload: &'a [u8]) -> &'a [u8] {
        &payload[self.min_byte_range as usize..self.max_byte_range as usize]
    }

    pub fn len(&self) -> u64 {
        self.max_byte_range - self.min_byte_range
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chunk size limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunker {
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_chunk_size: MAX_CHUNK_SIZE,
            min_chunk_size: MIN_CHUNK_SIZE,
        }
    }
}

impl Chunker {
    pub fn new(max_chunk_size: usize, min_chunk_size: usize) -> Result<Self> {
        if min_chunk_size == 0 || min_chunk_size > max_chunk_size {
            return Err(StorageError::InvalidChunkSizes {
                min: min_chunk_size,
                max: max_chunk_size,
            });
        }
        Ok(Self {
            max_chunk_size,
            min_chunk_size,
        })
    }

    /// Split `data` into chunk spans hashed with `H`.
    pub fn chunk_data<H: MerkleHasher>(&self, data: &[u8]) -> Result<Vec<ChunkSpan>> {
        if data.is_empty() {
            return Err(StorageError::EmptyContent);
        }

        let mut spans = Vec::with_capacity(data.len().div_ceil(self.max_chunk_size));
        let mut cursor = 0usize;

        while data.len() - cursor > self.max_chunk_size {
            let rest = data.len() - cursor;
            let mut chunk_size = self.max_chunk_size;
            if rest - self.max_chunk_size < self.min_chunk_size {
                chunk_size = rest.div_ceil(2);
            }
            spans.push(span::<H>(data, cursor, cursor + chunk_size));
            cursor += chunk_size;
        }
        spans.push(span::<H>(data, cursor, data.len()));

        Ok(spans)
    }
}

fn span<H: MerkleHasher>(data: &[u8], start: usize, end: usize) -> ChunkSpan {
    ChunkSpan {
        data_hash: H::hash(&data[start..end]),
        min_byte_range: start as u64,
        max_byte_range: end as u64,
    }
}

/// Split `data` with the network's default chunk sizes.
pub fn chunk_data<H: MerkleHasher>(data: &[u8]) -> Result<Vec<ChunkSpan>> {
    Chunker::default().chunk_data::<H>(data)
}
