use super::*;

/// One projected column: an expression plus an optional output alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl ResultColumn {
    pub fn new(expr: impl Into<Expr>, alias: Option<String>) -> ResultColumn {
        ResultColumn {
            expr: expr.into(),
            alias,
        }
    }

    pub fn named(expr: impl Into<Expr>, alias: impl Into<String>) -> ResultColumn {
        ResultColumn {
            expr: expr.into(),
            alias: Some(alias.into()),
        }
    }

    /// The name under which this column appears in result rows.
    pub fn output_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias);
        }
        match &self.expr {
            Expr::Column(column) => Some(&column.name),
            _ => None,
        }
    }
}

impl From<Expr> for ResultColumn {
    fn from(expr: Expr) -> ResultColumn {
        ResultColumn { expr, alias: None }
    }
}
