//! Chunk records and their wire envelope.

use serde::{Deserialize, Serialize};

use crate::encoding::to_b64url;
use crate::DataRoot;

/// Wire shape of a chunk, used for both submission and retrieval.
///
/// Binary fields are base64url strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkEnvelope {
    pub chunk: String,
    pub data_path: String,
    pub data_root: String,
    pub offset: u64,
    pub data_size: u64,
}

impl ChunkEnvelope {
    /// The header fields echoed back on acceptance.
    pub fn header(&self) -> ChunkHeader {
        ChunkHeader {
            data_root: self.data_root.clone(),
            data_size: self.data_size,
            data_path: self.data_path.clone(),
            offset: self.offset,
        }
    }
}

/// A verified chunk as persisted by the chunk store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub data_root: DataRoot,
    /// Key of the chunk within its payload, as assigned at submission.
    pub offset: u64,
    pub data_size: u64,
    pub chunk: Vec<u8>,
    pub data_path: Vec<u8>,
}

impl Chunk {
    pub fn to_envelope(&self) -> ChunkEnvelope {
        ChunkEnvelope {
            chunk: to_b64url(&self.chunk),
            data_path: to_b64url(&self.data_path),
            data_root: to_b64url(&self.data_root),
            offset: self.offset,
            data_size: self.data_size,
        }
    }
}

/// Header fields of an accepted chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkHeader {
    pub data_root: String,
    pub data_size: u64,
    pub data_path: String,
    pub offset: u64,
}

/// Acknowledgement returned for an accepted chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkReceipt {
    /// Accepted chunk length in bytes.
    pub size: usize,
    pub header: ChunkHeader,
}
