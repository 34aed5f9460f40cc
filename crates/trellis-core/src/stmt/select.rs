use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub id: StmtId,

    pub source: Source,

    /// Projection. Serializing a select with an empty projection is a
    /// construction error caught by the builders.
    pub columns: Vec<ResultColumn>,

    pub joins: Vec<Join>,

    /// Query filter
    pub filter: Option<Expr>,

    pub order_by: Option<OrderBy>,

    pub limit: Option<Limit>,

    /// `FOR UPDATE`
    pub lock: bool,
}

impl Select {
    pub fn new(id: StmtId, source: Source) -> Select {
        Select {
            id,
            source,
            columns: vec![],
            joins: vec![],
            filter: None,
            order_by: None,
            limit: None,
            lock: false,
        }
    }

    /// AND an expression onto the existing filter.
    pub fn and(&mut self, expr: impl Into<Expr>) {
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr.into(),
        });
    }

    pub fn reference(&self, column: Option<&str>) -> Expr {
        Expr::CteRef(ExprCteRef {
            stmt: self.id,
            column: column.map(str::to_string),
        })
    }
}
