use super::*;

/// A column reference, optionally qualified with a table alias or CTE name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprColumn {
    pub table: Option<String>,
    pub name: String,
}

impl ExprColumn {
    pub fn new(table: Option<String>, name: impl Into<String>) -> ExprColumn {
        ExprColumn {
            table,
            name: name.into(),
        }
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Expr {
        Expr::Column(value)
    }
}
