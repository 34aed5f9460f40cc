use super::{insert::scalar_returning, Compiler, Prepared};

use crate::query::{DataValue, FieldFilter, Filter, FilterEntry, Record, UpsertQuery};

use trellis_core::{
    driver::ResultMeta,
    stmt::{
        self, Direction, Expr, Insert, Join, Limit, OnConflict, OrderBy, OrderByExpr,
        ResultColumn, Select, Source, Value,
    },
    Error, Result,
};

/// Synthetic column distinguishing the insert branch (0) from the select
/// branch (1) of a combined upsert statement.
const BRANCH_COLUMN: &str = "_branch";

impl Compiler<'_> {
    /// `INSERT ... ON CONFLICT (index columns) DO UPDATE ... RETURNING`,
    /// combined with a plain select branch through a `NATURAL FULL JOIN` and
    /// a synthetic ordering column. Which branch supplied the row tells the
    /// caller whether it was inserted or updated. Postgres-specific by
    /// design.
    pub(crate) fn prepare_upsert(mut self, query: &UpsertQuery) -> Result<Prepared> {
        let table = self.table;

        // The filter must be plain equalities exactly covering a primary or
        // unique index; anything else fails before SQL is built.
        let keys = upsert_keys(&query.filter)?;
        let fields: Vec<&str> = keys.iter().map(|(name, _)| name.as_str()).collect();
        let index = table.unique_index_covering(&fields).ok_or_else(|| {
            Error::construction(format!(
                "upsert on `{}` requires a primary or unique index covering ({})",
                table.alias,
                fields.join(", ")
            ))
        })?;
        let conflict_columns = index.columns.clone();

        // Identity fields seed the insert arm; the insert payload fills in
        // the rest.
        let mut merged = Record::new();
        for (name, value) in &keys {
            merged = merged.value(name.clone(), value.clone());
        }
        for (name, value) in &query.insert.fields {
            merged.fields.insert(name.clone(), value.clone());
        }

        let main_id = self.session.stmt_id();
        let (columns, row, relations) = self.build_insert_row(table, &merged, &table.alias)?;
        if !relations.is_empty() {
            return Err(Error::invalid_relation(format!(
                "relation writes are not supported in an upsert of `{}`",
                table.alias
            )));
        }
        self.check_failures()?;

        if columns.is_empty() {
            return Err(Error::construction(format!(
                "upsert into `{}` with an empty record",
                table.alias
            )));
        }

        let mut update = vec![];
        for (name, value) in &query.update.fields {
            let DataValue::Value(value) = value else {
                return Err(Error::construction(format!(
                    "upsert update for `{name}` only supports plain values"
                )));
            };
            let schema = table.schema.field(name).ok_or_else(|| {
                Error::construction(format!(
                    "no field schema for column `{name}` on table `{}`",
                    table.alias
                ))
            })?;
            self.validate_value(&format!("{}.{name}", table.alias), value, schema);
            let value = self.validator.transform(value.clone(), schema);
            let param = self.session.bind(value, Some(schema));
            update.push((name.clone(), param));
        }
        self.check_failures()?;

        let mut insert = Insert::new(main_id, &table.name);
        insert.columns = columns;
        insert.rows = vec![row];
        insert.on_conflict = Some(OnConflict {
            columns: conflict_columns,
            update,
        });

        let mut returning = scalar_returning(table);
        returning.push(ResultColumn::named(
            Expr::Value(Value::I64(0)),
            BRANCH_COLUMN,
        ));
        insert.returning = Some(returning);

        // The select branch mirrors the returned shape with the
        // complementary branch marker.
        let branch_alias = self.session.table_alias();
        let mut branch = Select::new(
            self.session.stmt_id(),
            Source::aliased_table(&table.name, &branch_alias),
        );
        for name in table.schema.fields.keys() {
            branch
                .columns
                .push(Expr::qualified_column(&branch_alias, name).into());
        }
        branch.columns.push(ResultColumn::named(
            Expr::Value(Value::I64(1)),
            BRANCH_COLUMN,
        ));
        if let Some(expr) = self.compile_filter(table, &branch_alias, &query.filter)? {
            branch.and(expr);
        }

        let join_alias = self.session.table_alias();
        let mut tail = Select::new(self.session.stmt_id(), Source::cte(main_id));
        for name in table.schema.fields.keys() {
            tail.columns.push(Expr::column(name.clone()).into());
        }
        tail.columns
            .push(Expr::column(BRANCH_COLUMN).into());
        tail.joins
            .push(Join::natural_full(Source::subquery(branch, &join_alias)));
        tail.order_by = Some(OrderBy::new(vec![OrderByExpr::new(
            Expr::column(BRANCH_COLUMN),
            Direction::Asc,
        )]));
        tail.limit = Limit::new(Some(1), None);

        let statement = stmt::Statement::chain(vec![insert.into(), tail.into()])?;

        let meta = ResultMeta {
            table: Some(table.alias.clone()),
            branch_column: Some(BRANCH_COLUMN.to_string()),
        };

        Ok(self.finish(statement, meta))
    }
}

/// Extract the (field, value) equality pairs of an upsert filter.
fn upsert_keys(filter: &Filter) -> Result<Vec<(String, Value)>> {
    let mut keys = vec![];

    for entry in &filter.entries {
        let FilterEntry::Field(name, field_filter) = entry else {
            return Err(Error::construction(
                "upsert filter must be plain equalities on index fields",
            ));
        };

        let value = match field_filter {
            FieldFilter::Value(value) if !value.is_null() => value.clone(),
            FieldFilter::Ops(ops) => match &ops.equal {
                Some(value) => value.clone(),
                None => {
                    return Err(Error::construction(
                        "upsert filter must be plain equalities on index fields",
                    ));
                }
            },
            _ => {
                return Err(Error::construction(
                    "upsert filter must be plain equalities on index fields",
                ));
            }
        };

        keys.push((name.clone(), value));
    }

    if keys.is_empty() {
        return Err(Error::construction("upsert filter must not be empty"));
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OperatorSet;

    #[test]
    fn upsert_keys_accepts_plain_and_operator_equalities() {
        let filter = Filter::field("id", "a").with("region", OperatorSet::new().equal("eu"));

        let keys = upsert_keys(&filter).unwrap();
        assert_eq!(
            keys,
            vec![
                ("id".to_string(), Value::String("a".into())),
                ("region".to_string(), Value::String("eu".into())),
            ]
        );
    }

    #[test]
    fn upsert_keys_rejects_ranges_and_logic() {
        assert!(upsert_keys(&Filter::field("id", OperatorSet::new().gt(1))).is_err());
        assert!(upsert_keys(&Filter::not(Filter::field("id", "a"))).is_err());
        assert!(upsert_keys(&Filter::new()).is_err());
    }
}
