use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub id: StmtId,

    pub table: String,

    /// Columns to insert into, matching each row's expression order.
    pub columns: Vec<String>,

    pub rows: Vec<Vec<Expr>>,

    pub on_conflict: Option<OnConflict>,

    pub returning: Option<Vec<ResultColumn>>,
}

/// `ON CONFLICT (columns) DO UPDATE SET ...`, or `DO NOTHING` when no
/// assignments are given.
#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub columns: Vec<String>,
    pub update: Vec<(String, Expr)>,
}

impl Insert {
    pub fn new(id: StmtId, table: impl Into<String>) -> Insert {
        Insert {
            id,
            table: table.into(),
            columns: vec![],
            rows: vec![],
            on_conflict: None,
            returning: None,
        }
    }

    pub fn reference(&self, column: Option<&str>) -> Expr {
        Expr::CteRef(ExprCteRef {
            stmt: self.id,
            column: column.map(str::to_string),
        })
    }
}
