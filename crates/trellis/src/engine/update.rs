use super::{
    insert::{scalar_returning, selection_is_nested},
    relation::WritePath,
    Compiler, Prepared,
};

use crate::query::{DataValue, UpdateQuery};

use trellis_core::{
    driver::ResultMeta,
    schema::FieldType,
    stmt::{self, BinaryOp, Expr, ExprBinaryOp, Select, Source, Update, Value},
    Error, Result,
};

impl Compiler<'_> {
    /// Compile an update. Relation-only updates substitute a select for the
    /// main statement so dependent relation statements still have rows to
    /// reference; a trailing select normalizes the result shape whenever
    /// extra statements were appended.
    pub(crate) fn prepare_update(mut self, query: &UpdateQuery) -> Result<Prepared> {
        let table = self.table;
        let main_id = self.session.stmt_id();

        let mut assignments: Vec<(String, Expr)> = vec![];
        let mut relations = vec![];

        for (name, value) in &query.data.fields {
            let repo = self.repo;
            if repo.relation(&table.alias, name).is_some() {
                relations.push((name.clone(), value.clone()));
                continue;
            }

            let schema = table.schema.field(name).ok_or_else(|| {
                Error::construction(format!(
                    "no field schema for column `{name}` on table `{}`",
                    table.alias
                ))
            })?;

            match value {
                DataValue::Value(value) => {
                    self.validate_value(&format!("{}.{name}", table.alias), value, schema);
                    let value = self.validator.transform(value.clone(), schema);
                    let param = self.session.bind(value, Some(schema));
                    assignments.push((name.clone(), param));
                }
                DataValue::Increment(by) | DataValue::Decrement(by) => {
                    if !matches!(schema.ty, FieldType::Number) {
                        return Err(Error::construction(format!(
                            "atomic operator on non-numeric field `{name}`"
                        )));
                    }
                    let op = match value {
                        DataValue::Increment(_) => BinaryOp::Add,
                        _ => BinaryOp::Sub,
                    };
                    let param = self.session.bind(Value::F64(*by), Some(schema));
                    assignments.push((
                        name.clone(),
                        ExprBinaryOp::new(Expr::column(name.clone()), op, param).into(),
                    ));
                }
                DataValue::One(_) | DataValue::Many(_) => {
                    return Err(Error::invalid_relation(format!(
                        "`{name}` is not a relation of table `{}`",
                        table.alias
                    )));
                }
            }
        }

        let plan = self.plan_relation_writes(table, main_id, &relations, WritePath::Update)?;
        assignments.extend(plan.fk_columns);

        self.check_failures()?;

        let filter = match &query.filter {
            Some(filter) => self.compile_filter(table, &table.name, filter)?,
            None => None,
        };

        let chained = !plan.pre.is_empty() || !plan.post.is_empty();
        let nested = selection_is_nested(self.repo, table, query.select.as_ref())
            || query.include.is_some();

        if assignments.is_empty() && !chained {
            return Err(Error::construction(format!(
                "update of `{}` with an empty record",
                table.alias
            )));
        }

        let meta = ResultMeta {
            table: Some(table.alias.clone()),
            branch_column: None,
        };

        // Simple shape: one statement, result straight from RETURNING.
        if !chained && !nested {
            let mut update = Update::new(main_id, &table.name);
            update.assignments = assignments;
            update.filter = filter;
            if query.select.is_some() {
                update.returning = Some(self.compile_projection(
                    table,
                    &table.name,
                    query.select.as_ref(),
                    None,
                )?);
            }
            return Ok(self.finish(stmt::Statement::Update(update), meta));
        }

        let main: stmt::Statement = if assignments.is_empty() {
            // No direct column changes: a plain select stands in so that
            // relation statements can still reference the affected rows.
            let mut select = Select::new(main_id, Source::table(&table.name));
            select.columns = scalar_returning(table);
            select.filter = filter;
            select.into()
        } else {
            let mut update = Update::new(main_id, &table.name);
            update.assignments = assignments;
            update.filter = filter;
            update.returning = Some(scalar_returning(table));
            update.into()
        };

        let mut statements = plan.pre;
        statements.push(main);
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
}
