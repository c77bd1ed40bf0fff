//! Diagnostics command handlers.

use std::sync::Arc;

use weft_db::{migrations, queries::chunks};

use super::{db_error, Result};
use crate::DaemonState;

/// Daemon version, schema version and store size.
pub async fn get_info(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    let schema_version = migrations::current_version(&db).map_err(db_error)?;
    let chunk_count = chunks::count(&db).map_err(db_error)?;

    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "schema_version": schema_version,
        "chunk_count": chunk_count,
        "data_dir": state.config.data_dir(),
    }))
}
