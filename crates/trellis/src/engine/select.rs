use super::{results::order_by, Compiler, Prepared};

use crate::query::FindQuery;

use trellis_core::{
    driver::ResultMeta,
    stmt::{self, Limit, Select, Source},
    Result,
};

impl Compiler<'_> {
    pub(crate) fn prepare_find(mut self, query: &FindQuery) -> Result<Prepared> {
        let table = self.table;

        let alias = self.session.table_alias();
        let mut select = Select::new(
            self.session.stmt_id(),
            Source::aliased_table(&table.name, &alias),
        );

        select.columns = self.compile_projection(
            table,
            &alias,
            query.select.as_ref(),
            query.include.as_ref(),
        )?;

        if let Some(filter) = &query.filter {
            if let Some(expr) = self.compile_filter(table, &alias, filter)? {
                select.and(expr);
            }
        }

        if let Some(order) = &query.order {
            select.order_by = Some(order_by(&alias, table, order)?);
        }

        select.limit = Limit::new(query.take, query.skip);
        select.lock = query.lock;

        let meta = ResultMeta {
            table: Some(table.alias.clone()),
            branch_column: None,
        };

        Ok(self.finish(stmt::Statement::Select(select), meta))
    }
}
