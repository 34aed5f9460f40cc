use super::{Compiler, Prepared};

use crate::query::CountQuery;

use trellis_core::{
    driver::ResultMeta,
    stmt::{self, Expr, Limit, ResultColumn, Select, Source, Value},
    Result,
};

impl Compiler<'_> {
    /// `SELECT COUNT(1)`, sharing the find path's filter compiler. With
    /// skip/take the counted set is bounded first in a wrapped select.
    pub(crate) fn prepare_count(mut self, query: &CountQuery) -> Result<Prepared> {
        let table = self.table;
        let alias = self.session.table_alias();

        let mut inner = Select::new(
            self.session.stmt_id(),
            Source::aliased_table(&table.name, &alias),
        );

        if let Some(filter) = &query.filter {
            if let Some(expr) = self.compile_filter(table, &alias, filter)? {
                inner.and(expr);
            }
        }

        let meta = ResultMeta {
            table: Some(table.alias.clone()),
            branch_column: None,
        };

        let select = if query.skip.is_some() || query.take.is_some() {
            inner
                .columns
                .push(ResultColumn::new(Expr::Value(Value::I64(1)), None));
            inner.limit = Limit::new(query.take, query.skip);

            let outer_alias = self.session.table_alias();
            let mut outer = Select::new(
                self.session.stmt_id(),
                Source::subquery(inner, &outer_alias),
            );
            outer
                .columns
                .push(ResultColumn::named(Expr::count(), "count"));
            outer
        } else {
            inner
                .columns
                .push(ResultColumn::named(Expr::count(), "count"));
            inner
        };

        Ok(self.finish(stmt::Statement::Select(select), meta))
    }
}
