use super::*;

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(ExprAnd),

    /// OR a set of expressions
    Or(ExprOr),

    /// Negate the inner expression
    Not(Box<Expr>),

    /// Binary comparison or containment
    BinaryOp(ExprBinaryOp),

    /// `IS NULL` / `IS NOT NULL`. Kept apart from binary comparison because
    /// of SQL's three-valued null semantics.
    IsNull { expr: Box<Expr>, negated: bool },

    /// `IN (...)` over an expression list
    InList(ExprInList),

    /// `BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    /// Correlated `EXISTS (...)`
    Exists { query: Box<Select>, negated: bool },

    /// Column reference, optionally qualified
    Column(ExprColumn),

    /// JSON extraction below a column
    JsonPath(ExprJsonPath),

    /// `(expr)::type`
    Cast { expr: Box<Expr>, ty: String },

    /// Function call
    Call(ExprCall),

    /// `json_build_object(...)` / `jsonb_build_object(...)`
    JsonObject(ExprJsonObject),

    /// Positional reference to a bound parameter
    Param(ExprParam),

    /// Forward reference into an earlier statement of the same chain
    CteRef(ExprCteRef),

    /// Scalar subquery
    Stmt(Box<Select>),

    /// Inline constant
    Value(Value),

    /// Trusted SQL fragment, e.g. `'[]'::json`
    Raw(String),
}

impl Expr {
    pub fn and(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (Expr::And(lhs_and), Expr::And(rhs_and)) => {
                lhs_and.operands.extend(rhs_and.operands);
                lhs
            }
            (Expr::And(lhs_and), rhs) => {
                lhs_and.operands.push(rhs);
                lhs
            }
            (_, Expr::And(mut rhs_and)) => {
                rhs_and.operands.insert(0, lhs);
                rhs_and.into()
            }
            (_, rhs) => ExprAnd::new(vec![lhs, rhs]).into(),
        }
    }

    pub fn or(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (Expr::Or(lhs_or), Expr::Or(rhs_or)) => {
                lhs_or.operands.extend(rhs_or.operands);
                lhs
            }
            (Expr::Or(lhs_or), rhs) => {
                lhs_or.operands.push(rhs);
                lhs
            }
            (_, Expr::Or(mut rhs_or)) => {
                rhs_or.operands.insert(0, lhs);
                rhs_or.into()
            }
            (_, rhs) => ExprOr::new(vec![lhs, rhs]).into(),
        }
    }

    /// Combine with AND; `None` operands contribute nothing.
    pub fn and_all(operands: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        let mut operands: Vec<Expr> = operands.into_iter().collect();
        match operands.len() {
            0 => None,
            1 => Some(operands.remove(0)),
            _ => Some(ExprAnd::new(operands).into()),
        }
    }

    pub fn or_all(operands: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        let mut operands: Vec<Expr> = operands.into_iter().collect();
        match operands.len() {
            0 => None,
            1 => Some(operands.remove(0)),
            _ => Some(ExprOr::new(operands).into()),
        }
    }

    pub fn not(expr: impl Into<Expr>) -> Expr {
        Expr::Not(Box::new(expr.into()))
    }

    pub fn eq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        ExprBinaryOp::new(lhs, BinaryOp::Eq, rhs).into()
    }

    pub fn column(name: impl Into<String>) -> Expr {
        Expr::Column(ExprColumn {
            table: None,
            name: name.into(),
        })
    }

    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Expr {
        Expr::Column(ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        })
    }

    pub fn is_null(expr: impl Into<Expr>) -> Expr {
        Expr::IsNull {
            expr: Box::new(expr.into()),
            negated: false,
        }
    }

    pub fn is_not_null(expr: impl Into<Expr>) -> Expr {
        Expr::IsNull {
            expr: Box::new(expr.into()),
            negated: true,
        }
    }

    pub fn exists(query: Select) -> Expr {
        Expr::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    pub fn not_exists(query: Select) -> Expr {
        Expr::Exists {
            query: Box::new(query),
            negated: true,
        }
    }

    pub fn cast(expr: impl Into<Expr>, ty: impl Into<String>) -> Expr {
        Expr::Cast {
            expr: Box::new(expr.into()),
            ty: ty.into(),
        }
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call(ExprCall {
            function: function.into(),
            args,
        })
    }

    pub fn lower(expr: impl Into<Expr>) -> Expr {
        Expr::call("LOWER", vec![expr.into()])
    }

    pub fn count() -> Expr {
        Expr::call("COUNT", vec![Expr::Value(Value::I64(1))])
    }

    pub fn coalesce(args: Vec<Expr>) -> Expr {
        Expr::call("COALESCE", args)
    }

    pub fn json_agg(expr: impl Into<Expr>) -> Expr {
        Expr::call("json_agg", vec![expr.into()])
    }

    pub fn to_char(expr: impl Into<Expr>, mask: &str) -> Expr {
        Expr::call(
            "to_char",
            vec![expr.into(), Expr::Value(Value::String(mask.to_string()))],
        )
    }

    pub fn raw(sql: impl Into<String>) -> Expr {
        Expr::Raw(sql.into())
    }

    pub fn null() -> Expr {
        Expr::Value(Value::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Expr::Value(_))
    }

    pub fn is_value_null(&self) -> bool {
        matches!(self, Expr::Value(Value::Null))
    }
}

impl Default for Expr {
    fn default() -> Expr {
        Expr::Value(Value::default())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Expr {
        Expr::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Expr {
        Expr::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Expr {
        Expr::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Expr {
        Expr::Value(value.into())
    }
}
