//! Ledger queries.

use std::sync::Arc;

use serde_json::Value;
use weft_db::queries::{blocks, transactions};
use weft_types::query::{BlockQueryParams, TxQueryParams};

use super::{db_error, parse_params, to_result, Result};
use crate::DaemonState;

/// Run a transaction query. Absent params select the latest confirmed
/// transactions.
pub async fn query_transactions(state: &Arc<DaemonState>, params: &Value) -> Result {
    let params: TxQueryParams = parse_params(params)?;

    let db = state.db.lock().await;
    let query = transactions::build_query(&db, &params).map_err(db_error)?;
    let rows = query.execute(&db).map_err(db_error)?;
    to_result(rows)
}

/// Run a block query.
pub async fn query_blocks(state: &Arc<DaemonState>, params: &Value) -> Result {
    let params: BlockQueryParams = parse_params(params)?;

    let db = state.db.lock().await;
    let rows = blocks::build_query(&params)
        .and_then(|query| query.execute(&db))
        .map_err(db_error)?;
    to_result(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_state;
    use weft_types::ledger::{Block, Tag, Transaction};

    async fn seeded() -> Arc<DaemonState> {
        let state = test_state();
        {
            let db = state.db.lock().await;
            for (i, height) in [Some(1), Some(2), None].into_iter().enumerate() {
                transactions::insert(
                    &db,
                    &Transaction {
                        id: format!("tx{i}"),
                        owner_address: "owner".into(),
                        target: None,
                        height,
                        created_at: 100 + i as u64,
                        tags: vec![Tag::new("App-Name", "weft")],
                    },
                )
                .expect("insert tx");
            }
            for h in 1..=3u64 {
                blocks::insert(
                    &db,
                    &Block {
                        id: format!("b{h}"),
                        height: Some(h),
                        created_at: 100 + h,
                    },
                )
                .expect("insert block");
            }
        }
        state
    }

    fn ids(rows: &Value) -> Vec<String> {
        rows.as_array()
            .expect("array")
            .iter()
            .map(|r| r["id"].as_str().expect("id").to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_default_query_hides_pending() {
        let state = seeded().await;
        let rows = query_transactions(&state, &Value::Null).await.expect("query");
        assert_eq!(ids(&rows), vec!["tx1", "tx0"]);
    }

    #[tokio::test]
    async fn test_camel_case_params() {
        let state = seeded().await;
        let rows = query_transactions(
            &state,
            &serde_json::json!({
                "status": "any",
                "sortOrder": "HEIGHT_ASC",
                "tags": [{"name": "App-Name", "values": ["weft"]}],
            }),
        )
        .await
        .expect("query");
        assert_eq!(rows.as_array().map(Vec::len), Some(3));
        // SQLite sorts null heights first in ascending order.
        assert!(rows[0]["height"].is_null());
        assert_eq!(rows[2]["height"], 2);
    }

    #[tokio::test]
    async fn test_type_invalid_params_rejected() {
        let state = seeded().await;
        let err = query_transactions(&state, &serde_json::json!({"limit": "ten"}))
            .await
            .expect_err("rejected");
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_query_blocks() {
        let state = seeded().await;
        let rows = query_blocks(
            &state,
            &serde_json::json!({"sortOrder": "HEIGHT_DESC", "limit": 2}),
        )
        .await
        .expect("query");
        assert_eq!(ids(&rows), vec!["b3", "b2"]);
    }
}
