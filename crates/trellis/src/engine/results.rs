use super::Compiler;

use crate::query::{Include, IncludeOptions, SelectNode, SelectTree};

use trellis_core::{
    schema::{FieldSchema, FieldType, RelationEdge, TableDef},
    stmt::{
        Expr, ExprJsonObject, ExprJsonPath, Limit, OrderBy, OrderByExpr, ResultColumn, Select,
        Source,
    },
    Error, Result,
};

impl Compiler<'_> {
    /// Compile a selection tree (plus relation includes) into the result
    /// column list of a select or `RETURNING` clause.
    pub(super) fn compile_projection(
        &mut self,
        table: &TableDef,
        qualifier: &str,
        select: Option<&SelectTree>,
        include: Option<&Include>,
    ) -> Result<Vec<ResultColumn>> {
        let mut columns = vec![];

        match select {
            Some(tree) => {
                for (name, node) in &tree.entries {
                    let repo = self.repo;
                    if let Some(edge) = repo.relation(&table.alias, name) {
                        let options = include.and_then(|i| i.relations.get(name));
                        let nested = match node {
                            SelectNode::Nested(tree) => Some(tree),
                            SelectNode::Field => None,
                        };
                        columns.push(self.relation_column(qualifier, edge, nested, options)?);
                        continue;
                    }

                    let field = table.schema.field(name).ok_or_else(|| {
                        Error::construction(format!(
                            "no field schema for selected column `{name}` on `{}`",
                            table.alias
                        ))
                    })?;

                    match node {
                        SelectNode::Field => {
                            columns.push(scalar_column(qualifier, name, field));
                        }
                        SelectNode::Nested(tree) => {
                            // Selecting into a JSON column rebuilds the
                            // requested slice as a fresh JSON object.
                            let expr = object_projection(qualifier, name, field, tree)?;
                            columns.push(ResultColumn::named(expr, name.clone()));
                        }
                    }
                }
            }
            None => {
                for (name, field) in &table.schema.fields {
                    columns.push(scalar_column(qualifier, name, field));
                }
            }
        }

        // Included relations not named in the selection are appended.
        if let Some(include) = include {
            for (alias, options) in &include.relations {
                if select.is_some_and(|tree| tree.entries.contains_key(alias)) {
                    continue;
                }
                let repo = self.repo;
                let edge = repo.relation(&table.alias, alias).ok_or_else(|| {
                    Error::invalid_relation(format!(
                        "unknown relation `{alias}` on table `{}`",
                        table.alias
                    ))
                })?;
                columns.push(self.relation_column(qualifier, edge, None, Some(options))?);
            }
        }

        if columns.is_empty() {
            return Err(Error::construction(format!(
                "selection for `{}` produced zero result columns",
                table.alias
            )));
        }

        Ok(columns)
    }

    /// A related record (or set) as a correlated sub-select column.
    fn relation_column(
        &mut self,
        qualifier: &str,
        edge: &RelationEdge,
        nested: Option<&SelectTree>,
        options: Option<&IncludeOptions>,
    ) -> Result<ResultColumn> {
        let repo = self.repo;
        let related = repo.table(&edge.source_table)?;

        let selection = nested.or_else(|| options.and_then(|o| o.select.as_ref()));

        if !edge.is_to_many() {
            // Single cardinality: a scalar JSON object, one row expected.
            let alias = self.session.table_alias();
            let entries = self.object_entries(related, &alias, selection)?;

            let mut select = Select::new(
                self.session.stmt_id(),
                Source::aliased_table(&related.name, &alias),
            );
            select
                .columns
                .push(ResultColumn::new(ExprJsonObject::new(entries), None));
            select.and(join_condition(&alias, qualifier, edge));

            if let Some(options) = options {
                if let Some(filter) = &options.filter {
                    if let Some(expr) = self.compile_filter(related, &alias, filter)? {
                        select.and(expr);
                    }
                }
            }

            return Ok(ResultColumn::named(
                Expr::Stmt(Box::new(select)),
                edge.target_alias.clone(),
            ));
        }

        // Many cardinality: aggregate into a JSON array; an empty related
        // set must serialize to `[]`, never null.
        let paginated = options.is_some_and(|o| o.paginates());

        let aggregate = if paginated {
            // Pagination and ordering must apply before aggregation, so the
            // correlated select is wrapped one level deeper.
            let options = options.unwrap();
            let inner_alias = self.session.table_alias();
            let outer_alias = self.session.table_alias();

            let mut inner = Select::new(
                self.session.stmt_id(),
                Source::aliased_table(&related.name, &inner_alias),
            );
            for name in self.selected_field_names(related, selection)? {
                inner
                    .columns
                    .push(Expr::qualified_column(&inner_alias, &name).into());
            }
            inner.and(join_condition(&inner_alias, qualifier, edge));

            if let Some(filter) = &options.filter {
                if let Some(expr) = self.compile_filter(related, &inner_alias, filter)? {
                    inner.and(expr);
                }
            }
            if let Some(order) = &options.order {
                inner.order_by = Some(order_by(&inner_alias, related, order)?);
            }
            inner.limit = Limit::new(options.take, options.skip);

            let entries = self.object_entries(related, &outer_alias, selection)?;
            let mut outer = Select::new(
                self.session.stmt_id(),
                Source::subquery(inner, &outer_alias),
            );
            outer.columns.push(ResultColumn::new(
                Expr::json_agg(ExprJsonObject::new(entries)),
                None,
            ));
            outer
        } else {
            let alias = self.session.table_alias();
            let entries = self.object_entries(related, &alias, selection)?;

            let mut select = Select::new(
                self.session.stmt_id(),
                Source::aliased_table(&related.name, &alias),
            );
            select.columns.push(ResultColumn::new(
                Expr::json_agg(ExprJsonObject::new(entries)),
                None,
            ));
            select.and(join_condition(&alias, qualifier, edge));

            if let Some(options) = options {
                if let Some(filter) = &options.filter {
                    if let Some(expr) = self.compile_filter(related, &alias, filter)? {
                        select.and(expr);
                    }
                }
            }
            select
        };

        let expr = Expr::coalesce(vec![
            Expr::Stmt(Box::new(aggregate)),
            Expr::raw("'[]'::json"),
        ]);

        Ok(ResultColumn::named(expr, edge.target_alias.clone()))
    }

    /// Key/value entries of the JSON object built for one related record.
    fn object_entries(
        &mut self,
        related: &TableDef,
        qualifier: &str,
        selection: Option<&SelectTree>,
    ) -> Result<Vec<(String, Expr)>> {
        let mut entries = vec![];

        match selection {
            Some(tree) => {
                for (name, node) in &tree.entries {
                    let repo = self.repo;
                    if let Some(edge) = repo.relation(&related.alias, name) {
                        let nested = match node {
                            SelectNode::Nested(tree) => Some(tree),
                            SelectNode::Field => None,
                        };
                        let column = self.relation_column(qualifier, edge, nested, None)?;
                        entries.push((name.clone(), column.expr));
                        continue;
                    }

                    let field = related.schema.field(name).ok_or_else(|| {
                        Error::construction(format!(
                            "no field schema for selected column `{name}` on `{}`",
                            related.alias
                        ))
                    })?;
                    match node {
                        SelectNode::Field => {
                            entries.push((name.clone(), field_expr(qualifier, name, field)));
                        }
                        SelectNode::Nested(tree) => {
                            entries
                                .push((name.clone(), object_projection(qualifier, name, field, tree)?));
                        }
                    }
                }
            }
            None => {
                for (name, field) in &related.schema.fields {
                    entries.push((name.clone(), field_expr(qualifier, name, field)));
                }
            }
        }

        if entries.is_empty() {
            return Err(Error::construction(format!(
                "selection for `{}` produced zero result columns",
                related.alias
            )));
        }

        Ok(entries)
    }

    /// Plain column names a paginating wrapper has to carry through. When
    /// the selection descends into further relations, every column is
    /// carried so their correlation columns stay reachable.
    fn selected_field_names(
        &self,
        related: &TableDef,
        selection: Option<&SelectTree>,
    ) -> Result<Vec<String>> {
        let Some(tree) = selection else {
            return Ok(related.schema.fields.keys().cloned().collect());
        };

        let mut names = vec![];
        for name in tree.entries.keys() {
            if self.repo.relation(&related.alias, name).is_some() {
                return Ok(related.schema.fields.keys().cloned().collect());
            }
            if related.schema.field(name).is_none() {
                return Err(Error::construction(format!(
                    "no field schema for selected column `{name}` on `{}`",
                    related.alias
                )));
            }
            names.push(name.clone());
        }
        Ok(names)
    }
}

/// A scalar result column; temporally formatted strings render through
/// `to_char` so output is deterministic regardless of client locale.
fn scalar_column(qualifier: &str, name: &str, field: &FieldSchema) -> ResultColumn {
    match field.date_mask() {
        Some(mask) => ResultColumn::named(
            Expr::to_char(Expr::qualified_column(qualifier, name), mask),
            name,
        ),
        None => Expr::qualified_column(qualifier, name).into(),
    }
}

fn field_expr(qualifier: &str, name: &str, field: &FieldSchema) -> Expr {
    match field.date_mask() {
        Some(mask) => Expr::to_char(Expr::qualified_column(qualifier, name), mask),
        None => Expr::qualified_column(qualifier, name),
    }
}

/// Rebuild the selected slice of a JSON column as a fresh object.
fn object_projection(
    qualifier: &str,
    column: &str,
    field: &FieldSchema,
    tree: &SelectTree,
) -> Result<Expr> {
    fn walk(base: &Expr, field: &FieldSchema, path: &[String], tree: &SelectTree) -> Result<Expr> {
        let mut entries = vec![];

        for (name, node) in &tree.entries {
            let child = field.ty.property(name).ok_or_else(|| {
                Error::construction(format!("no field schema for nested selection `{name}`"))
            })?;

            let mut child_path = path.to_vec();
            child_path.push(name.clone());

            let value = match node {
                SelectNode::Field => {
                    ExprJsonPath::new(base.clone(), child_path, false).into()
                }
                SelectNode::Nested(tree) => walk(base, child, &child_path, tree)?,
            };
            entries.push((name.clone(), value));
        }

        if entries.is_empty() {
            return Err(Error::construction("empty nested selection"));
        }

        Ok(ExprJsonObject::new(entries).into())
    }

    if !matches!(field.ty, FieldType::Object(_) | FieldType::Union(_)) {
        return Err(Error::construction(format!(
            "field `{column}` does not support nested selection"
        )));
    }

    let base = Expr::qualified_column(qualifier, column);
    walk(&base, field, &[], tree)
}

fn join_condition(inner: &str, outer: &str, edge: &RelationEdge) -> Expr {
    Expr::eq(
        Expr::qualified_column(inner, &edge.source_column),
        Expr::qualified_column(outer, &edge.target_column),
    )
}

/// Compile an order map against a table's columns.
pub(super) fn order_by(
    qualifier: &str,
    table: &TableDef,
    order: &crate::query::Order,
) -> Result<OrderBy> {
    let mut exprs = vec![];
    for (path, direction) in &order.fields {
        if table.schema.resolve(path).is_none() {
            return Err(Error::construction(format!(
                "no field schema for order column `{path}` on `{}`",
                table.alias
            )));
        }
        // Ordering by a nested JSON path is allowed; reuse the plain column
        // for the common case.
        let expr = match path.split_once('.') {
            None => Expr::qualified_column(qualifier, path),
            Some((column, rest)) => ExprJsonPath::new(
                Expr::qualified_column(qualifier, column),
                rest.split('.').map(str::to_string).collect(),
                true,
            )
            .into(),
        };
        exprs.push(OrderByExpr::new(expr, *direction));
    }
    Ok(OrderBy::new(exprs))
}
