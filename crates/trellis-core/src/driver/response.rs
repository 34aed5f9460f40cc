use crate::stmt::Value;

use indexmap::IndexMap;

/// One result row: column name → value, in projection order.
pub type Row = IndexMap<String, Value>;

/// Result of executing one statement.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub rows: Vec<Row>,

    /// Number of rows affected, which may exceed `rows.len()` for writes
    /// without a `RETURNING` clause.
    pub row_count: u64,
}

impl Response {
    pub fn empty() -> Response {
        Response::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Response {
        let row_count = rows.len() as u64;
        Response { rows, row_count }
    }
}
