use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

impl ExprBinaryOp {
    pub fn new(lhs: impl Into<Expr>, op: BinaryOp, rhs: impl Into<Expr>) -> ExprBinaryOp {
        ExprBinaryOp {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        }
    }
}

impl From<ExprBinaryOp> for Expr {
    fn from(value: ExprBinaryOp) -> Expr {
        Expr::BinaryOp(value)
    }
}
