use super::*;

/// Forward reference to another statement in the same chain, resolved by
/// statement identifier during serialization.
///
/// With a column, renders as a scalar subquery against the CTE; without one,
/// renders as the bare CTE name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCteRef {
    pub stmt: StmtId,
    pub column: Option<String>,
}

impl From<ExprCteRef> for Expr {
    fn from(value: ExprCteRef) -> Expr {
        Expr::CteRef(value)
    }
}
