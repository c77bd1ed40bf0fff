//! JSON-RPC command handlers.
//!
//! Each submodule implements the commands for one method group.

pub mod chunks;
pub mod diagnostics;
pub mod query;

use serde::de::DeserializeOwned;
use serde_json::Value;
use weft_db::DbError;

use crate::rpc::RpcError;

type Result = std::result::Result<Value, RpcError>;

/// Current Unix time in seconds.
fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Deserialize a params object. Absent params mean all defaults.
fn parse_params<T: DeserializeOwned + Default>(params: &Value) -> std::result::Result<T, RpcError> {
    if params.is_null() {
        return Ok(T::default());
    }
    T::deserialize(params).map_err(|e| RpcError::invalid_params(&e.to_string()))
}

fn db_error(err: DbError) -> RpcError {
    tracing::error!(error = %err, "database error");
    RpcError::internal_error(&format!("db error: {err}"))
}

fn to_result<T: serde::Serialize>(value: T) -> Result {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&e.to_string()))
}

#[cfg(test)]
pub(crate) fn test_state() -> std::sync::Arc<crate::DaemonState> {
    let conn = weft_db::open_memory().expect("open");
    std::sync::Arc::new(crate::DaemonState {
        db: std::sync::Arc::new(tokio::sync::Mutex::new(conn)),
        config: crate::config::DaemonConfig::default(),
    })
}
