use super::{Formatter, Ident, ToSql};

use trellis_core::stmt;

impl ToSql for &stmt::With {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "WITH ");

        let mut s = "";
        for cte in &self.ctes {
            fmt!(f, s, Ident(cte.id().alias()), " AS (", cte, ")");
            s = ", ";
        }

        fmt!(f, " ", &*self.tail);
    }
}
