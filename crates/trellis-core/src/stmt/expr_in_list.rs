use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,
}

impl ExprInList {
    pub fn new(expr: impl Into<Expr>, list: Vec<Expr>) -> ExprInList {
        ExprInList {
            expr: Box::new(expr.into()),
            list,
        }
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Expr {
        Expr::InList(value)
    }
}
