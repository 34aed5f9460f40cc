use super::{Formatter, ToSql};

use crate::stmt::ColumnType;

impl ToSql for ColumnType {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.as_sql());
    }
}
