//! Block ledger writes and the block query planner.

use rusqlite::Connection;
use weft_types::ledger::Block;
use weft_types::query::{height_bound, BlockQueryParams, SortOrder};

use crate::sql::Select;
use crate::{to_sql_int, Result};

/// Insert a block.
pub fn insert(conn: &Connection, block: &Block) -> Result<()> {
    let height = block.height.map(|h| to_sql_int(h, "height")).transpose()?;
    conn.execute(
        "INSERT INTO blocks (id, height, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![block.id, height, to_sql_int(block.created_at, "created_at")?],
    )?;
    Ok(())
}

/// An executable, not yet executed, block selection.
#[derive(Clone, Debug)]
pub struct BlockQuery {
    select: Select,
}

impl BlockQuery {
    pub fn sql(&self) -> String {
        self.select.to_sql()
    }

    pub fn execute(&self, conn: &Connection) -> Result<Vec<Block>> {
        self.select.query_map(conn, |row| {
            Ok(Block {
                id: row.get(0)?,
                height: row.get::<_, Option<i64>>(1)?.map(|h| h as u64),
                created_at: row.get::<_, i64>(2)? as u64,
            })
        })
    }
}

fn order_clause(sort: Option<SortOrder>) -> &'static str {
    match sort {
        Some(SortOrder::HeightAsc) => "blocks.height ASC NULLS LAST, blocks.id ASC",
        Some(SortOrder::HeightDesc) => "blocks.height DESC NULLS FIRST, blocks.id ASC",
        None => "blocks.id ASC",
    }
}

/// Plan a block query.
///
/// Limit and offset are applied only when given: a missing limit means every
/// matching block is returned.
pub fn build_query(params: &BlockQueryParams) -> Result<BlockQuery> {
    let mut select = Select::from("blocks");
    select.columns(&["blocks.id", "blocks.height", "blocks.created_at"]);

    if let Some(id) = &params.id {
        select.where_eq("blocks.id", id.clone());
    }

    if let Some(ids) = &params.ids {
        select.where_in("blocks.id", ids.iter().cloned());
    }

    if let Some(before) = params.before {
        select.where_cmp("blocks.created_at", "<", to_sql_int(before, "before")?);
    }

    if let Some(min) = height_bound(params.min_height) {
        select.where_cmp("blocks.height", ">=", to_sql_int(min, "min_height")?);
    }

    if let Some(max) = height_bound(params.max_height) {
        select.where_cmp("blocks.height", "<=", to_sql_int(max, "max_height")?);
    }

    if let Some(limit) = params.limit {
        select.limit(limit);
    }

    if let Some(offset) = params.offset {
        select.offset(offset);
    }

    select.order_by(order_clause(params.sort()));

    Ok(BlockQuery { select })
}
