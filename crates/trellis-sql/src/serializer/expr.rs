use super::{Comma, Formatter, Ident, ToSql};

use trellis_core::stmt::{self, Expr};

use std::fmt::Write;

impl ToSql for &Expr {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Expr::And(expr) => {
                fmt!(f, "(");
                let mut s = "";
                for operand in &expr.operands {
                    fmt!(f, s, operand);
                    s = " AND ";
                }
                fmt!(f, ")");
            }
            Expr::Or(expr) => {
                fmt!(f, "(");
                let mut s = "";
                for operand in &expr.operands {
                    fmt!(f, s, operand);
                    s = " OR ";
                }
                fmt!(f, ")");
            }
            Expr::Not(expr) => {
                fmt!(f, "NOT (", &**expr, ")");
            }
            Expr::BinaryOp(expr) => {
                fmt!(f, &*expr.lhs, " ", expr.op.as_sql(), " ", &*expr.rhs);
            }
            Expr::IsNull { expr, negated } => {
                let tail = if *negated { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, &**expr, tail);
            }
            Expr::InList(expr) => {
                fmt!(f, &*expr.expr, " IN (", Comma(&expr.list), ")");
            }
            Expr::Between { expr, low, high } => {
                fmt!(f, &**expr, " BETWEEN ", &**low, " AND ", &**high);
            }
            Expr::Exists { query, negated } => {
                let head = if *negated { "NOT EXISTS (" } else { "EXISTS (" };
                fmt!(f, head, &**query, ")");
            }
            Expr::Column(expr) => expr.to_sql(f),
            Expr::JsonPath(expr) => expr.to_sql(f),
            Expr::Cast { expr, ty } => {
                fmt!(f, "(", &**expr, ")::", ty.as_str());
            }
            Expr::Call(expr) => {
                fmt!(f, expr.function.as_str(), "(", Comma(&expr.args), ")");
            }
            Expr::JsonObject(expr) => expr.to_sql(f),
            Expr::Param(expr) => {
                // Parameters are 0-indexed in the session, 1-indexed in SQL.
                write!(f.dst, "${}", expr.index + 1).unwrap();
            }
            Expr::CteRef(expr) => expr.to_sql(f),
            Expr::Stmt(query) => {
                fmt!(f, "(", &**query, ")");
            }
            Expr::Value(value) => value.to_sql(f),
            Expr::Raw(sql) => fmt!(f, sql.as_str()),
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table), ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for &stmt::ExprJsonPath {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, &*self.base);

        let last = self.path.len().saturating_sub(1);
        for (i, segment) in self.path.iter().enumerate() {
            let arrow = if i == last && self.as_text { "->>" } else { "->" };
            fmt!(f, arrow, "'", segment.replace('\'', "''"), "'");
        }
    }
}

impl ToSql for &stmt::ExprJsonObject {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let function = if self.binary {
            "jsonb_build_object"
        } else {
            "json_build_object"
        };

        fmt!(f, function, "(");
        let mut s = "";
        for (key, value) in &self.entries {
            fmt!(f, s, "'", key.replace('\'', "''"), "', ", value);
            s = ", ";
        }
        fmt!(f, ")");
    }
}

impl ToSql for &stmt::ExprCteRef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match &self.column {
            Some(column) => {
                fmt!(f, "(SELECT ", Ident(column), " FROM ", Ident(self.stmt.alias()), ")");
            }
            None => fmt!(f, Ident(self.stmt.alias())),
        }
    }
}

impl ToSql for &stmt::OrderBy {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "ORDER BY ", Comma(&self.exprs));
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let direction = match self.direction {
            stmt::Direction::Asc => "ASC",
            stmt::Direction::Desc => "DESC",
        };
        fmt!(f, &self.expr, " ", direction);
    }
}

impl ToSql for &stmt::Limit {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT ", limit);
        }
        if let Some(offset) = self.offset {
            fmt!(f, " OFFSET ", offset);
        }
    }
}

impl ToSql for &stmt::ResultColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, &self.expr);
        if let Some(alias) = &self.alias {
            fmt!(f, " AS ", Ident(alias));
        }
    }
}
