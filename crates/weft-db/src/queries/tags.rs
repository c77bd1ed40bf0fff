//! Generic tag subquery.
//!
//! Tags whose names are not indexed can only be matched through the `tags`
//! table. All such filters in one request are pooled: their names go into one
//! set and their values into another, and a tag row matches when its name is
//! in the first set and its value in the second. With two or more filters this
//! admits cross-matches (name A carrying a value requested for name B). That
//! over-match is the established query semantics and is pinned by tests.

use rusqlite::Connection;
use tracing::debug;
use weft_types::query::{SortOrder, TagFilter};
use weft_types::TxId;

use crate::sql::Select;
use crate::Result;

/// Pooled names and values of every non-indexed tag filter in a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenericTagMatch {
    pub names: Vec<String>,
    pub values: Vec<String>,
}

impl GenericTagMatch {
    /// Add a filter's name and all its values to the pool.
    pub fn push(&mut self, filter: &TagFilter) {
        self.names.push(filter.name.clone());
        self.values.extend(filter.values.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Tag-table counterpart of the transaction sort order.
fn order_clause(sort: Option<SortOrder>) -> &'static str {
    match sort {
        Some(SortOrder::HeightAsc) => "tags.created_at ASC, tags.id ASC",
        Some(SortOrder::HeightDesc) | None => "tags.created_at DESC, tags.id ASC",
    }
}

/// Find the ids of transactions carrying a tag that matches the pool.
///
/// The scan is bounded by the outer query's `limit`/`offset`, which apply to
/// matching tag rows. Ids are returned in tag order with duplicates removed.
pub fn resolve_tx_ids(
    conn: &Connection,
    generic: &GenericTagMatch,
    limit: u32,
    offset: u32,
    sort: Option<SortOrder>,
) -> Result<Vec<TxId>> {
    let mut select = Select::from("tags");
    select
        .columns(&["tags.tx_id"])
        .where_in("tags.name", generic.names.iter().cloned())
        .where_in("tags.value", generic.values.iter().cloned())
        .order_by(order_clause(sort))
        .limit(limit)
        .offset(offset);

    debug!(
        names = generic.names.len(),
        values = generic.values.len(),
        limit,
        offset,
        "Resolving generic tag subquery"
    );

    let rows = select.query_map(conn, |row| row.get::<_, String>(0))?;

    let mut ids: Vec<TxId> = Vec::with_capacity(rows.len());
    for id in rows {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
