use super::{relation::WritePath, Compiler, Prepared};

use crate::query::{DataValue, InsertQuery, Record, SelectTree};

use trellis_core::{
    driver::ResultMeta,
    schema::{DefaultValue, TableDef},
    stmt::{self, Expr, Insert, ResultColumn, Select, Source, Value},
    Error, Result,
};

impl Compiler<'_> {
    /// Compile an insert, expanding relation payloads into a CTE chain:
    /// pre-inserts for rows the main row's FKs point at, the main insert,
    /// post-inserts for rows pointing back at the main row, and a trailing
    /// select when the requested shape needs fresh correlated sub-selects.
    pub(crate) fn prepare_insert(mut self, query: &InsertQuery) -> Result<Prepared> {
        let table = self.table;
        let main_id = self.session.stmt_id();

        let (mut columns, mut row, relations) =
            self.build_insert_row(table, &query.data, &table.alias)?;

        let plan = self.plan_relation_writes(table, main_id, &relations, WritePath::Insert)?;
        for (column, expr) in plan.fk_columns {
            columns.push(column);
            row.push(expr);
        }

        self.check_failures()?;

        if columns.is_empty() {
            return Err(Error::construction(format!(
                "insert into `{}` with an empty record",
                table.alias
            )));
        }

        let mut insert = Insert::new(main_id, &table.name);
        insert.columns = columns;
        insert.rows = vec![row];

        let meta = ResultMeta {
            table: Some(table.alias.clone()),
            branch_column: None,
        };

        let chained = !plan.pre.is_empty() || !plan.post.is_empty();
        let nested = selection_is_nested(self.repo, table, query.select.as_ref())
            || query.include.is_some();

        if !chained && !nested {
            // Simple shape: the inserted row comes straight back through
            // `RETURNING`.
            insert.returning =
                Some(self.compile_projection(table, &table.name, query.select.as_ref(), None)?);
            return Ok(self.finish(stmt::Statement::Insert(insert), meta));
        }

        // The main insert returns every scalar column so that dependents and
        // the trailing select can read the row without touching the table
        // again; related data is read back via fresh correlated sub-selects.
        insert.returning = Some(scalar_returning(table));

        let mut statements = plan.pre;
        statements.push(insert.into());
        statements.extend(plan.post);

        let cte_alias = main_id.alias();
        let mut tail = Select::new(self.session.stmt_id(), Source::cte(main_id));
        tail.columns = self.compile_projection(
            table,
            &cte_alias,
            query.select.as_ref(),
            query.include.as_ref(),
        )?;
        statements.push(tail.into());

        let statement = stmt::Statement::chain(statements)?;
        Ok(self.finish(statement, meta))
    }

    /// Split a write payload into insert columns/values and relation writes,
    /// applying declared defaults and the validation hook.
    pub(super) fn build_insert_row(
        &mut self,
        table: &TableDef,
        record: &Record,
        path: &str,
    ) -> Result<(Vec<String>, Vec<Expr>, Vec<(String, DataValue)>)> {
        let mut columns = vec![];
        let mut row = vec![];
        let mut relations = vec![];

        for (name, value) in &record.fields {
            let repo = self.repo;
            if repo.relation(&table.alias, name).is_some() {
                relations.push((name.clone(), value.clone()));
                continue;
            }

            match value {
                DataValue::Value(value) => {
                    let schema = table.schema.field(name).ok_or_else(|| {
                        Error::construction(format!(
                            "no field schema for column `{name}` on table `{}`",
                            table.alias
                        ))
                    })?;

                    self.validate_value(&format!("{path}.{name}"), value, schema);
                    let value = self.validator.transform(value.clone(), schema);
                    columns.push(name.clone());
                    let param = self.session.bind(value, Some(schema));
                    row.push(param);
                }
                DataValue::Increment(_) | DataValue::Decrement(_) => {
                    return Err(Error::construction(format!(
                        "atomic operator on `{name}` is not valid in an insert payload"
                    )));
                }
                DataValue::One(_) | DataValue::Many(_) => {
                    return Err(Error::invalid_relation(format!(
                        "`{name}` is not a relation of table `{}`",
                        table.alias
                    )));
                }
            }
        }

        // Declared defaults fill the gaps.
        for (name, field) in &table.schema.fields {
            if record.fields.contains_key(name) {
                continue;
            }
            let Some(default) = &field.definitions.default else {
                continue;
            };
            let value = match default {
                DefaultValue::Value(json) => Value::from(json.clone()),
                DefaultValue::Uuid => Value::String(uuid::Uuid::new_v4().to_string()),
            };
            columns.push(name.clone());
            let param = self.session.bind(value, Some(field));
            row.push(param);
        }

        Ok((columns, row, relations))
    }

    /// Insert for a related row created as part of a relation write. Only
    /// one level of nesting is supported; a related record carrying its own
    /// relation writes is rejected.
    pub(super) fn build_relation_insert(
        &mut self,
        related: &TableDef,
        record: &Record,
        extra: &[(String, Expr)],
        returning: Option<Vec<String>>,
    ) -> Result<Insert> {
        let id = self.session.stmt_id();
        let (mut columns, mut row, relations) =
            self.build_insert_row(related, record, &related.alias)?;

        if !relations.is_empty() {
            return Err(Error::invalid_relation(format!(
                "relation writes inside `{}` records are only supported one level deep",
                related.alias
            )));
        }

        for (column, expr) in extra {
            if let Some(index) = columns.iter().position(|c| c == column) {
                row[index] = expr.clone();
            } else {
                columns.push(column.clone());
                row.push(expr.clone());
            }
        }

        if columns.is_empty() {
            return Err(Error::construction(format!(
                "insert into `{}` with an empty record",
                related.alias
            )));
        }

        let mut insert = Insert::new(id, &related.name);
        insert.columns = columns;
        insert.rows = vec![row];
        insert.returning = returning.map(|columns| {
            columns
                .into_iter()
                .map(|column| ResultColumn::from(Expr::column(column)))
                .collect()
        });

        Ok(insert)
    }
}

/// Every scalar column of the table as a plain `RETURNING` list.
pub(super) fn scalar_returning(table: &TableDef) -> Vec<ResultColumn> {
    table
        .schema
        .fields
        .keys()
        .map(|name| ResultColumn::from(Expr::column(name.clone())))
        .collect()
}

/// True when the selection asks for related records, which cannot be read
/// from a `RETURNING` clause.
pub(super) fn selection_is_nested(
    repo: &trellis_core::Repository,
    table: &TableDef,
    select: Option<&SelectTree>,
) -> bool {
    select.is_some_and(|tree| {
        tree.entries
            .keys()
            .any(|name| repo.relation(&table.alias, name).is_some())
    })
}
