use super::{Compiler, Prepared};

use crate::query::DeleteQuery;

use trellis_core::{
    driver::ResultMeta,
    stmt::{self, Delete},
    Result,
};

impl Compiler<'_> {
    /// A delete is always a single statement; `RETURNING` only when a
    /// selection was requested.
    pub(crate) fn prepare_delete(mut self, query: &DeleteQuery) -> Result<Prepared> {
        let table = self.table;

        let mut delete = Delete::new(self.session.stmt_id(), &table.name);

        if let Some(filter) = &query.filter {
            delete.filter = self.compile_filter(table, &table.name, filter)?;
        }

        if query.select.is_some() {
            delete.returning = Some(self.compile_projection(
                table,
                &table.name,
                query.select.as_ref(),
                None,
            )?);
        }

        let meta = ResultMeta {
            table: Some(table.alias.clone()),
            branch_column: None,
        };

        Ok(self.finish(stmt::Statement::Delete(delete), meta))
    }
}
