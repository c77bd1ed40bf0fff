//! Minimal SELECT builder with positional parameters.
//!
//! Predicates are ANDed in the order they are added and their parameters are
//! bound in the same order. LIMIT and OFFSET are rendered as integer literals.

use rusqlite::types::Value;
use rusqlite::{Connection, Row};

use crate::Result;

/// An incrementally built SELECT statement.
#[derive(Clone, Debug)]
pub struct Select {
    columns: Vec<&'static str>,
    from: &'static str,
    joins: Vec<String>,
    predicates: Vec<String>,
    params: Vec<Value>,
    order_by: Option<&'static str>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Select {
    pub fn from(table: &'static str) -> Self {
        Self {
            columns: Vec::new(),
            from: table,
            joins: Vec::new(),
            predicates: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    pub fn columns(&mut self, columns: &[&'static str]) -> &mut Self {
        self.columns.extend_from_slice(columns);
        self
    }

    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.joins.push(format!("LEFT JOIN {table} ON {on}"));
        self
    }

    /// `column = ?`
    pub fn where_eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.where_cmp(column, "=", value)
    }

    /// `column <op> ?` for a fixed comparison operator.
    pub fn where_cmp(&mut self, column: &str, op: &'static str, value: impl Into<Value>) -> &mut Self {
        self.predicates.push(format!("{column} {op} ?"));
        self.params.push(value.into());
        self
    }

    /// `column IN (?, ?, ...)`. An empty set matches nothing.
    pub fn where_in<I, V>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let before = self.params.len();
        self.params.extend(values.into_iter().map(Into::into));
        let placeholders = vec!["?"; self.params.len() - before].join(", ");
        self.predicates.push(format!("{column} IN ({placeholders})"));
        self
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.predicates.push(format!("{column} IS NOT NULL"));
        self
    }

    pub fn order_by(&mut self, clause: &'static str) -> &mut Self {
        self.order_by = Some(clause);
        self
    }

    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u32) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Render the statement text.
    pub fn to_sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {}", self.from);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }
        sql
    }

    /// Execute the statement and map every row.
    pub fn query_map<T, F>(&self, conn: &Connection, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = conn.prepare(&self.to_sql())?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(self.params.iter()), f)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_statement() {
        let mut select = Select::from("transactions");
        select
            .columns(&["transactions.id"])
            .left_join("blocks", "transactions.height = blocks.height")
            .where_eq("transactions.id", "a".to_string())
            .where_in("transactions.target", ["b".to_string(), "c".to_string()])
            .where_cmp("transactions.height", ">=", 5i64)
            .order_by("transactions.height ASC")
            .limit(10)
            .offset(20);

        assert_eq!(
            select.to_sql(),
            "SELECT transactions.id FROM transactions \
             LEFT JOIN blocks ON transactions.height = blocks.height \
             WHERE transactions.id = ? AND transactions.target IN (?, ?) \
             AND transactions.height >= ? \
             ORDER BY transactions.height ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(select.params().len(), 4);
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .expect("seed");

        let mut select = Select::from("t");
        select.columns(&["x"]).where_in("x", Vec::<i64>::new());
        assert_eq!(select.to_sql(), "SELECT x FROM t WHERE x IN ()");

        let rows = select
            .query_map(&conn, |row| row.get::<_, i64>(0))
            .expect("query");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_offset_without_limit() {
        let mut select = Select::from("blocks");
        select.offset(3);
        assert_eq!(select.to_sql(), "SELECT * FROM blocks LIMIT -1 OFFSET 3");
    }
}
