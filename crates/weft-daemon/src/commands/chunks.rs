//! Chunk upload and retrieval.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use weft_db::queries::chunks;
use weft_storage::submission;
use weft_types::chunk::ChunkEnvelope;

use super::{db_error, now_secs, to_result, Result};
use crate::rpc::RpcError;
use crate::DaemonState;

/// Validate a chunk against its data path and store it.
pub async fn post_chunk(state: &Arc<DaemonState>, params: &Value) -> Result {
    let envelope = ChunkEnvelope::deserialize(params)
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    let db = state.db.lock().await;
    let receipt = submission::submit_chunk(&db, &envelope, now_secs())?;
    to_result(receipt)
}

/// Look up the chunk stored at an exact offset. Returns `null` if absent.
pub async fn get_chunk_by_offset(state: &Arc<DaemonState>, params: &Value) -> Result {
    let offset = params
        .get("offset")
        .and_then(Value::as_u64)
        .ok_or_else(|| RpcError::invalid_params("offset required"))?;

    let db = state.db.lock().await;
    match chunks::get_by_offset(&db, offset).map_err(db_error)? {
        Some(chunk) => to_result(chunk.to_envelope()),
        None => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use weft_crypto::Sha256Hasher;
    use weft_storage::merkle::MerkleTree;
    use weft_types::encoding::{from_b64url, to_b64url};

    fn test_envelope() -> Value {
        let tree = MerkleTree::from_data::<Sha256Hasher>(b"test").expect("tree");
        let paths = tree.data_paths();
        serde_json::json!({
            "chunk": to_b64url(b"test"),
            "data_path": to_b64url(&paths[0].proof),
            "data_root": to_b64url(&tree.data_root()),
            "offset": paths[0].offset,
            "data_size": 4,
        })
    }

    #[tokio::test]
    async fn test_post_then_get() {
        let state = test_state();
        let envelope = test_envelope();

        let receipt = post_chunk(&state, &envelope).await.expect("accepted");
        assert_eq!(receipt["size"], 4);
        assert_eq!(receipt["header"]["data_root"], envelope["data_root"]);
        assert_eq!(receipt["header"]["offset"], 3);

        let stored = get_chunk_by_offset(&state, &serde_json::json!({"offset": 3}))
            .await
            .expect("get");
        let chunk = stored["chunk"].as_str().expect("chunk field");
        assert_eq!(from_b64url(chunk).expect("decode"), b"test");
    }

    #[tokio::test]
    async fn test_get_missing_is_null() {
        let state = test_state();
        let stored = get_chunk_by_offset(&state, &serde_json::json!({"offset": 99}))
            .await
            .expect("get");
        assert!(stored.is_null());
    }

    #[tokio::test]
    async fn test_post_rejections() {
        let state = test_state();

        let mut bad_offset = test_envelope();
        bad_offset["offset"] = serde_json::json!(4);
        let err = post_chunk(&state, &bad_offset).await.expect_err("rejected");
        assert_eq!(err.code, -32022);

        let mut bad_root = test_envelope();
        bad_root["data_root"] = serde_json::json!("***");
        let err = post_chunk(&state, &bad_root).await.expect_err("rejected");
        assert_eq!(err.code, -32602);

        let mut string_offset = test_envelope();
        string_offset["offset"] = serde_json::json!("3");
        let err = post_chunk(&state, &string_offset).await.expect_err("rejected");
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_post_conflicting_chunk() {
        let state = test_state();
        post_chunk(&state, &test_envelope()).await.expect("accepted");
        post_chunk(&state, &test_envelope()).await.expect("resubmit");

        let tree = MerkleTree::from_data::<Sha256Hasher>(b"wxyz").expect("tree");
        let paths = tree.data_paths();
        let other = serde_json::json!({
            "chunk": to_b64url(b"wxyz"),
            "data_path": to_b64url(&paths[0].proof),
            "data_root": to_b64url(&tree.data_root()),
            "offset": paths[0].offset,
            "data_size": 4,
        });
        let err = post_chunk(&state, &other).await.expect_err("rejected");
        assert_eq!(err.code, -32023);
    }

    #[tokio::test]
    async fn test_get_requires_offset() {
        let state = test_state();
        let err = get_chunk_by_offset(&state, &serde_json::json!({}))
            .await
            .expect_err("rejected");
        assert_eq!(err.code, -32602);
    }
}
