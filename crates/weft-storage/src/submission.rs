//! Chunk submission.
//!
//! The only way into the chunk store. A submitted envelope is decoded, its
//! data path resolved against the claimed data root, and the chunk bytes
//! checked against the leaf the path ends at before anything is written.

use rusqlite::Connection;
use weft_crypto::{MerkleHasher, Sha256Hasher};
use weft_db::queries::chunks;
use weft_db::DbError;
use weft_types::chunk::{Chunk, ChunkEnvelope, ChunkReceipt};
use weft_types::encoding::from_b64url;
use weft_types::{DataRoot, HASH_SIZE};

use crate::merkle::resolve_path;

/// Why a submission was refused.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A binary field is not valid base64url or has the wrong length.
    #[error("invalid {field}: {reason}")]
    Encoding { field: &'static str, reason: String },

    /// The chunk is not proven by its data path.
    #[error("chunk validation failed: {0}")]
    Validation(&'static str),

    /// A different chunk is already stored at this offset.
    #[error("offset {offset} already holds a different chunk")]
    Conflict { offset: u64 },

    #[error("chunk store error: {0}")]
    Store(#[from] DbError),
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, SubmitError> {
    from_b64url(value).map_err(|e| SubmitError::Encoding {
        field,
        reason: e.to_string(),
    })
}

fn short(root: &[u8]) -> String {
    hex::encode(&root[..root.len().min(8)])
}

/// Validate and persist a chunk, proving it with the network hasher.
pub fn submit_chunk(
    conn: &Connection,
    envelope: &ChunkEnvelope,
    created_at: u64,
) -> Result<ChunkReceipt, SubmitError> {
    submit_chunk_with::<Sha256Hasher>(conn, envelope, created_at)
}

/// Validate and persist a chunk, proving it with `H`.
///
/// Resubmitting the stored chunk at its offset is acknowledged again. A
/// different chunk at an occupied offset is refused and the stored one kept.
pub fn submit_chunk_with<H: MerkleHasher>(
    conn: &Connection,
    envelope: &ChunkEnvelope,
    created_at: u64,
) -> Result<ChunkReceipt, SubmitError> {
    let data_root = decode_field("data_root", &envelope.data_root)?;
    let data_path = decode_field("data_path", &envelope.data_path)?;
    let chunk = decode_field("chunk", &envelope.chunk)?;

    let data_root: DataRoot = data_root
        .as_slice()
        .try_into()
        .map_err(|_| SubmitError::Encoding {
            field: "data_root",
            reason: format!("expected {HASH_SIZE} bytes, got {}", data_root.len()),
        })?;

    let Some(leaf) = resolve_path::<H>(&data_root, envelope.offset, envelope.data_size, &data_path)
    else {
        tracing::warn!(
            data_root = short(&data_root),
            offset = envelope.offset,
            data_size = envelope.data_size,
            "rejected chunk: invalid data path"
        );
        return Err(SubmitError::Validation("data path does not prove offset"));
    };

    if chunk.len() as u64 != leaf.chunk_size() {
        tracing::warn!(
            data_root = short(&data_root),
            offset = envelope.offset,
            expected = leaf.chunk_size(),
            actual = chunk.len(),
            "rejected chunk: length mismatch"
        );
        return Err(SubmitError::Validation("chunk length does not match proof"));
    }
    if H::hash(&chunk) != leaf.data_hash {
        tracing::warn!(
            data_root = short(&data_root),
            offset = envelope.offset,
            "rejected chunk: data hash mismatch"
        );
        return Err(SubmitError::Validation("chunk does not hash to proven leaf"));
    }

    let size = chunk.len();
    let record = Chunk {
        data_root,
        offset: envelope.offset,
        data_size: envelope.data_size,
        chunk,
        data_path,
    };

    match chunks::create(conn, &record, created_at) {
        Ok(true) => {
            tracing::info!(
                data_root = short(&data_root),
                offset = envelope.offset,
                size,
                "stored chunk"
            );
        }
        Ok(false) => {
            let stored = chunks::get_by_offset(conn, envelope.offset).map_err(|e| {
                tracing::error!(offset = envelope.offset, error = %e, "failed to read stored chunk");
                SubmitError::from(e)
            })?;
            let same = stored
                .as_ref()
                .is_some_and(|s| s.data_root == record.data_root && s.chunk == record.chunk);
            if !same {
                tracing::warn!(
                    data_root = short(&data_root),
                    offset = envelope.offset,
                    "rejected chunk: offset already taken"
                );
                return Err(SubmitError::Conflict {
                    offset: envelope.offset,
                });
            }
            tracing::debug!(offset = envelope.offset, "chunk resubmitted");
        }
        Err(e) => {
            tracing::error!(offset = envelope.offset, error = %e, "failed to store chunk");
            return Err(e.into());
        }
    }

    Ok(ChunkReceipt {
        size,
        header: envelope.header(),
    })
}
