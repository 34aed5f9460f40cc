use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub exprs: Vec<OrderByExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(exprs: Vec<OrderByExpr>) -> OrderBy {
        OrderBy { exprs }
    }
}

impl OrderByExpr {
    pub fn new(expr: impl Into<Expr>, direction: Direction) -> OrderByExpr {
        OrderByExpr {
            expr: expr.into(),
            direction,
        }
    }
}
