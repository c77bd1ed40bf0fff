//! Transaction ledger writes and the transaction query planner.
//!
//! [`build_query`] turns a [`TxQueryParams`] filter into a [`TxQuery`] plan.
//! Tag filters on indexed names become direct column predicates; all other
//! tag filters are pooled into one generic-tag subquery (see
//! [`super::tags`]) which is executed while planning, and whose result
//! constrains the plan to a set of transaction ids.

use rusqlite::types::{Type, Value};
use rusqlite::{Connection, Row};
use serde::Serialize;
use tracing::debug;
use weft_types::ledger::{Tag, Transaction};
use weft_types::query::{height_bound, SortOrder, TxQueryParams, TxStatus};
use weft_types::TxId;

use super::tags::{self, GenericTagMatch};
use crate::sql::Select;
use crate::tag_index::{self, INDEXED_TAGS};
use crate::{to_sql_int, DbError, Result};

const TX_COLUMNS: &[&str] = &[
    "transactions.id",
    "transactions.owner_address",
    "transactions.target",
    "transactions.height",
    "transactions.created_at",
    "transactions.tags_json",
];

const BLOCK_COLUMNS: &[&str] = &["blocks.id", "blocks.created_at"];

/// Insert a transaction together with its tags.
///
/// Values of indexed tags are copied into their dedicated columns; when a
/// transaction carries an indexed name more than once, the first value wins.
pub fn insert(conn: &Connection, tx: &Transaction) -> Result<()> {
    let height = tx.height.map(|h| to_sql_int(h, "height")).transpose()?;
    let created_at = to_sql_int(tx.created_at, "created_at")?;
    let tags_json = serde_json::to_string(&tx.tags)?;

    let db_tx = conn.unchecked_transaction()?;
    db_tx.execute(
        "INSERT INTO transactions (id, owner_address, target, height, created_at, tags_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            tx.id,
            tx.owner_address,
            tx.target,
            height,
            created_at,
            tags_json,
        ],
    )?;

    for indexed in INDEXED_TAGS {
        if let Some(tag) = tx.tags.iter().find(|t| t.name == indexed.name) {
            db_tx.execute(
                &format!(
                    "UPDATE transactions SET {} = ?1 WHERE id = ?2",
                    indexed.column
                ),
                rusqlite::params![tag.value, tx.id],
            )?;
        }
    }

    {
        let mut stmt = db_tx.prepare(
            "INSERT INTO tags (tx_id, name, value, created_at) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for tag in &tx.tags {
            stmt.execute(rusqlite::params![tx.id, tag.name, tag.value, created_at])?;
        }
    }

    db_tx.commit()?;
    debug!(id = %tx.id, tags = tx.tags.len(), "Inserted transaction");
    Ok(())
}

/// Assign a height to a pending transaction.
pub fn confirm(conn: &Connection, id: &str, height: u64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE transactions SET height = ?1 WHERE id = ?2",
        rusqlite::params![to_sql_int(height, "height")?, id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("transaction {id}")));
    }
    Ok(())
}

/// Look up a single transaction regardless of confirmation status.
pub fn get(conn: &Connection, id: &str) -> Result<Option<TransactionRow>> {
    let params = TxQueryParams {
        id: Some(id.to_string()),
        status: TxStatus::Any,
        limit: Some(1),
        ..Default::default()
    };
    let mut rows = build_query(conn, &params)?.execute(conn)?;
    Ok(rows.pop())
}

/// Block columns attached to a transaction row by a block join.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockRef {
    pub id: String,
    pub created_at: u64,
}

/// A transaction projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub id: TxId,
    pub owner_address: String,
    pub target: Option<String>,
    pub height: Option<u64>,
    pub created_at: u64,
    pub tags: Vec<Tag>,
    /// Present only when block columns were joined and the block exists.
    pub block: Option<BlockRef>,
}

/// An executable, not yet executed, transaction selection.
#[derive(Clone, Debug)]
pub struct TxQuery {
    select: Select,
    blocks: bool,
    subqueries: usize,
}

impl TxQuery {
    /// Statement text of the outer query.
    pub fn sql(&self) -> String {
        self.select.to_sql()
    }

    pub fn params(&self) -> &[Value] {
        self.select.params()
    }

    /// Number of generic-tag subqueries executed while planning.
    pub fn subqueries_issued(&self) -> usize {
        self.subqueries
    }

    /// Run the plan.
    pub fn execute(&self, conn: &Connection) -> Result<Vec<TransactionRow>> {
        let blocks = self.blocks;
        self.select.query_map(conn, |row| map_row(row, blocks))
    }
}

fn map_row(row: &Row<'_>, blocks: bool) -> rusqlite::Result<TransactionRow> {
    let tags_json: String = row.get(5)?;
    let tags: Vec<Tag> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let block = if blocks {
        let id: Option<String> = row.get(6)?;
        let created_at: Option<i64> = row.get(7)?;
        id.zip(created_at).map(|(id, created_at)| BlockRef {
            id,
            created_at: created_at as u64,
        })
    } else {
        None
    };

    Ok(TransactionRow {
        id: row.get(0)?,
        owner_address: row.get(1)?,
        target: row.get(2)?,
        height: row.get::<_, Option<i64>>(3)?.map(|h| h as u64),
        created_at: row.get::<_, i64>(4)? as u64,
        tags,
        block,
    })
}

/// Outer ORDER BY. Unrecognized or absent sort orders fall back to newest
/// first; every order ends on the id so pages are stable.
fn order_clause(sort: Option<SortOrder>) -> &'static str {
    match sort {
        Some(SortOrder::HeightAsc) => "transactions.height ASC, transactions.id ASC",
        Some(SortOrder::HeightDesc) => "transactions.height DESC, transactions.id ASC",
        None => "transactions.created_at DESC, transactions.id ASC",
    }
}

/// Plan a transaction query.
///
/// Never fails because of missing optional fields. The only failure is the
/// store rejecting the generic-tag subquery, which runs here.
pub fn build_query(conn: &Connection, params: &TxQueryParams) -> Result<TxQuery> {
    let limit = params.limit();
    let offset = params.offset();
    let sort = params.sort();

    let mut select = Select::from("transactions");
    select.columns(TX_COLUMNS);

    if let Some(id) = &params.id {
        select.where_eq("transactions.id", id.clone());
    }

    if let Some(ids) = &params.ids {
        select.where_in("transactions.id", ids.iter().cloned());
    }

    if params.blocks {
        select
            .columns(BLOCK_COLUMNS)
            .left_join("blocks", "transactions.height = blocks.height");
    }

    if params.status == TxStatus::Confirmed {
        select.where_not_null("transactions.height");
    }

    if let Some(to) = &params.to {
        select.where_in("transactions.target", to.iter().cloned());
    }

    if let Some(from) = &params.from {
        select.where_in("transactions.owner_address", from.iter().cloned());
    }

    let mut subqueries = 0;
    if let Some(filters) = &params.tags {
        let mut generic = GenericTagMatch::default();

        for filter in filters {
            match tag_index::column_for(&filter.name) {
                Some(column) => {
                    select.where_in(
                        &format!("transactions.{column}"),
                        filter.values.iter().cloned(),
                    );
                }
                None => generic.push(filter),
            }
        }

        if !generic.is_empty() {
            let ids = tags::resolve_tx_ids(conn, &generic, limit, offset, sort)?;
            subqueries += 1;
            select.where_in("transactions.id", ids);
        }
    }

    if let Some(min) = height_bound(params.min_height) {
        select.where_cmp("transactions.height", ">=", to_sql_int(min, "min_height")?);
    }

    if let Some(max) = height_bound(params.max_height) {
        select.where_cmp("transactions.height", "<=", to_sql_int(max, "max_height")?);
    }

    select.limit(limit).offset(offset).order_by(order_clause(sort));

    debug!(
        blocks = params.blocks,
        subqueries,
        params = select.params().len(),
        "Planned transaction query"
    );

    Ok(TxQuery {
        select,
        blocks: params.blocks,
        subqueries,
    })
}
