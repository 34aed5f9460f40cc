use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    pub function: String,
    pub args: Vec<Expr>,
}

impl From<ExprCall> for Expr {
    fn from(value: ExprCall) -> Expr {
        Expr::Call(value)
    }
}
