use super::*;

/// Reference to a bound parameter, 0-indexed against the session's parameter
/// list. Serializes as `$n` (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprParam {
    pub index: usize,
}

impl From<ExprParam> for Expr {
    fn from(value: ExprParam) -> Expr {
        Expr::Param(value)
    }
}
