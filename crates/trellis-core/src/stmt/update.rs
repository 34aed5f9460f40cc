use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub id: StmtId,

    pub table: String,

    pub assignments: Vec<(String, Expr)>,

    /// Extra source joined into the update, e.g. the main statement's CTE
    /// when updating related rows.
    pub from: Option<Source>,

    pub filter: Option<Expr>,

    pub returning: Option<Vec<ResultColumn>>,
}

impl Update {
    pub fn new(id: StmtId, table: impl Into<String>) -> Update {
        Update {
            id,
            table: table.into(),
            assignments: vec![],
            from: None,
            filter: None,
            returning: None,
        }
    }

    pub fn set(&mut self, column: impl Into<String>, expr: impl Into<Expr>) {
        self.assignments.push((column.into(), expr.into()));
    }

    pub fn reference(&self, column: Option<&str>) -> Expr {
        Expr::CteRef(ExprCteRef {
            stmt: self.id,
            column: column.map(str::to_string),
        })
    }
}
