use crate::{schema::FieldSchema, stmt::Value};

/// A fully built statement: SQL text plus its ordered bound parameters.
/// Immutable once built and never reused across calls.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    pub sql: String,

    /// Bound values in `$1..$n` order.
    pub params: Vec<Param>,

    pub result: ResultMeta,
}

/// One bound parameter, carrying the field schema the execution layer needs
/// to encode it correctly.
#[derive(Debug, Clone)]
pub struct Param {
    pub value: Value,
    pub schema: Option<FieldSchema>,
}

impl Param {
    pub fn new(value: Value, schema: Option<FieldSchema>) -> Param {
        Param { value, schema }
    }
}

/// What the result rows of a statement represent, for the record mapper.
#[derive(Debug, Clone, Default)]
pub struct ResultMeta {
    /// Logical table the rows belong to.
    pub table: Option<String>,

    /// Synthetic column distinguishing which branch of a combined statement
    /// produced a row (used by upsert).
    pub branch_column: Option<String>,
}
