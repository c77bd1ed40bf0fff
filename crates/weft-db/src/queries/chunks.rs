//! Verified chunk store.
//!
//! Only the submission path in `weft-storage` writes here, after the chunk's
//! data path has been validated. Chunks are keyed by the offset assigned at
//! submission. A second chunk for an existing offset is ignored: the first
//! write wins and chunks are never updated.

use rusqlite::{Connection, OptionalExtension};
use weft_types::chunk::Chunk;

use crate::{to_sql_int, Result};

/// Persist a chunk. Returns `false` if a chunk already exists at its offset.
pub fn create(conn: &Connection, chunk: &Chunk, created_at: u64) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO chunks
         (byte_offset, data_root, data_size, chunk, data_path, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            to_sql_int(chunk.offset, "offset")?,
            chunk.data_root.as_slice(),
            to_sql_int(chunk.data_size, "data_size")?,
            chunk.chunk,
            chunk.data_path,
            to_sql_int(created_at, "created_at")?,
        ],
    )?;
    Ok(inserted == 1)
}

/// Exact-match lookup by offset key.
pub fn get_by_offset(conn: &Connection, offset: u64) -> Result<Option<Chunk>> {
    let Ok(key) = i64::try_from(offset) else {
        return Ok(None);
    };
    let chunk = conn
        .query_row(
            "SELECT byte_offset, data_root, data_size, chunk, data_path
             FROM chunks WHERE byte_offset = ?1",
            [key],
            |row| {
                Ok(Chunk {
                    offset: row.get::<_, i64>(0)? as u64,
                    data_root: row.get::<_, [u8; 32]>(1)?,
                    data_size: row.get::<_, i64>(2)? as u64,
                    chunk: row.get(3)?,
                    data_path: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(chunk)
}

/// Number of stored chunks.
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
    Ok(count as u64)
}
