use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{ColumnDef, CreateIndex, CreateTable, DropTable};

use trellis_core::stmt;

impl ToSql for &crate::stmt::Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        use crate::stmt::Statement::*;

        match self {
            CreateIndex(stmt) => stmt.to_sql(f),
            CreateTable(stmt) => stmt.to_sql(f),
            Delete(stmt) => stmt.to_sql(f),
            DropTable(stmt) => stmt.to_sql(f),
            Insert(stmt) => stmt.to_sql(f),
            Select(stmt) => stmt.to_sql(f),
            Union(stmt) => stmt.to_sql(f),
            Update(stmt) => stmt.to_sql(f),
            With(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Select(stmt) => stmt.to_sql(f),
            stmt::Statement::Union(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
            stmt::Statement::With(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        debug_assert!(!self.columns.is_empty(), "select with no result columns");

        fmt!(f, "SELECT ", Comma(&self.columns), " FROM ", &self.source);

        for join in &self.joins {
            fmt!(f, join);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        if let Some(order_by) = &self.order_by {
            fmt!(f, " ", order_by);
        }

        if let Some(limit) = &self.limit {
            fmt!(f, limit);
        }

        if self.lock {
            fmt!(f, " FOR UPDATE");
        }
    }
}

impl ToSql for &stmt::Source {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            stmt::Source::Table { name, alias } => {
                fmt!(f, Ident(name));
                if let Some(alias) = alias {
                    fmt!(f, " AS ", Ident(alias));
                }
            }
            stmt::Source::SubQuery { query, alias } => {
                fmt!(f, "(", &**query, ") AS ", Ident(alias));
            }
            stmt::Source::Cte { stmt, alias } => {
                fmt!(f, Ident(stmt.alias()));
                if let Some(alias) = alias {
                    fmt!(f, " AS ", Ident(alias));
                }
            }
        }
    }
}

impl ToSql for &stmt::Join {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self.kind {
            stmt::JoinKind::Inner => fmt!(f, " JOIN "),
            stmt::JoinKind::NaturalFull => fmt!(f, " NATURAL FULL JOIN "),
        }

        fmt!(f, &self.source);

        if let Some(on) = &self.on {
            fmt!(f, " ON ", on);
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        debug_assert!(!self.columns.is_empty(), "insert with no columns");
        debug_assert!(!self.rows.is_empty(), "insert with no rows");

        let columns = Comma(self.columns.iter().map(Ident));

        fmt!(f, "INSERT INTO ", Ident(&self.table), " (", columns, ") VALUES ");

        let mut s = "";
        for row in &self.rows {
            fmt!(f, s, "(", Comma(row), ")");
            s = ", ";
        }

        if let Some(on_conflict) = &self.on_conflict {
            let conflict_columns = Comma(on_conflict.columns.iter().map(Ident));
            fmt!(f, " ON CONFLICT (", conflict_columns, ")");

            if on_conflict.update.is_empty() {
                fmt!(f, " DO NOTHING");
            } else {
                fmt!(f, " DO UPDATE SET ");
                let mut s = "";
                for (column, expr) in &on_conflict.update {
                    fmt!(f, s, Ident(column), " = ", expr);
                    s = ", ";
                }
            }
        }

        if let Some(returning) = &self.returning {
            fmt!(f, " RETURNING ", Comma(returning));
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        debug_assert!(!self.assignments.is_empty(), "update with no assignments");

        fmt!(f, "UPDATE ", Ident(&self.table), " SET ");

        let mut s = "";
        for (column, expr) in &self.assignments {
            fmt!(f, s, Ident(column), " = ", expr);
            s = ", ";
        }

        if let Some(from) = &self.from {
            fmt!(f, " FROM ", from);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        if let Some(returning) = &self.returning {
            fmt!(f, " RETURNING ", Comma(returning));
        }
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "DELETE FROM ", Ident(&self.table));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        if let Some(returning) = &self.returning {
            fmt!(f, " RETURNING ", Comma(returning));
        }
    }
}

impl ToSql for &stmt::Union {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let mut s = "";
        for operand in &self.operands {
            fmt!(f, s, operand);
            s = " UNION ALL ";
        }
    }
}

impl ToSql for &CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "CREATE TABLE ", Ident(&self.name), " (", Comma(&self.columns));

        if !self.primary_key.is_empty() {
            let columns = Comma(self.primary_key.iter().map(Ident));
            fmt!(f, ", PRIMARY KEY (", columns, ")");
        }

        fmt!(f, ")");
    }
}

impl ToSql for &ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.name), " ", self.ty);
        if self.not_null {
            fmt!(f, " NOT NULL");
        }
    }
}

impl ToSql for &CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let unique = if self.unique { "UNIQUE " } else { "" };
        let columns = Comma(self.columns.iter().map(Ident));

        fmt!(
            f,
            "CREATE ",
            unique,
            "INDEX ",
            Ident(&self.name),
            " ON ",
            Ident(&self.table),
            " (",
            columns,
            ")",
        );
    }
}

impl ToSql for &DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE ", if_exists, Ident(&self.name));
    }
}
