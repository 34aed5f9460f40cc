use super::Compiler;

use crate::query::{FieldFilter, Filter, FilterEntry, OperatorSet};

use trellis_core::{
    schema::{FieldSchema, FieldType, Format, RelationEdge, ResolvedField, TableDef},
    stmt::{
        BinaryOp, Expr, ExprBinaryOp, ExprColumn, ExprInList, ExprJsonPath, ResultColumn, Select,
        Source, Value,
    },
    Error, Result,
};

impl Compiler<'_> {
    /// Compile a filter tree into a boolean expression. `None` means the
    /// filter contributed nothing (empty tree, empty combinators).
    pub(super) fn compile_filter(
        &mut self,
        table: &TableDef,
        qualifier: &str,
        filter: &Filter,
    ) -> Result<Option<Expr>> {
        self.compile_filter_prefixed(table, qualifier, None, filter)
    }

    fn compile_filter_prefixed(
        &mut self,
        table: &TableDef,
        qualifier: &str,
        prefix: Option<&str>,
        filter: &Filter,
    ) -> Result<Option<Expr>> {
        let mut operands = vec![];

        for entry in &filter.entries {
            match entry {
                FilterEntry::And(filters) => {
                    let mut inner = vec![];
                    for filter in filters {
                        if let Some(expr) =
                            self.compile_filter_prefixed(table, qualifier, prefix, filter)?
                        {
                            inner.push(expr);
                        }
                    }
                    if let Some(expr) = Expr::and_all(inner) {
                        operands.push(expr);
                    }
                }
                FilterEntry::Or(filters) => {
                    let mut inner = vec![];
                    for filter in filters {
                        if let Some(expr) =
                            self.compile_filter_prefixed(table, qualifier, prefix, filter)?
                        {
                            inner.push(expr);
                        }
                    }
                    if let Some(expr) = Expr::or_all(inner) {
                        operands.push(expr);
                    }
                }
                FilterEntry::Not(filter) => {
                    if let Some(expr) =
                        self.compile_filter_prefixed(table, qualifier, prefix, filter)?
                    {
                        operands.push(Expr::not(expr));
                    }
                }
                FilterEntry::Field(path, field_filter) => {
                    let full_path = match prefix {
                        Some(prefix) => format!("{prefix}.{path}"),
                        None => path.clone(),
                    };
                    operands.push(self.compile_field_filter(
                        table,
                        qualifier,
                        &full_path,
                        field_filter,
                    )?);
                }
            }
        }

        Ok(Expr::and_all(operands))
    }

    fn compile_field_filter(
        &mut self,
        table: &TableDef,
        qualifier: &str,
        path: &str,
        filter: &FieldFilter,
    ) -> Result<Expr> {
        // A bare key naming a relation alias filters the related table.
        if !path.contains('.') {
            let repo = self.repo;
            if let Some(edge) = repo.relation(&table.alias, path) {
                return self.compile_relation_filter(qualifier, edge, filter);
            }
        }

        let resolved = table.schema.resolve(path).ok_or_else(|| {
            Error::construction(format!(
                "no field schema for `{path}` on table `{}`",
                table.alias
            ))
        })?;

        match filter {
            FieldFilter::Value(value) => self.compile_equality(&resolved, qualifier, value, false),
            FieldFilter::Ops(ops) => self.compile_ops(&resolved, qualifier, ops),
            FieldFilter::SubSelect(select) => Ok(Expr::exists((**select).clone())),
            FieldFilter::Reference(reference) => Ok(ExprBinaryOp::new(
                comparison_expr(qualifier, &resolved),
                BinaryOp::Eq,
                Expr::Column(ExprColumn::new(
                    reference.table.clone(),
                    reference.column.clone(),
                )),
            )
            .into()),
            FieldFilter::Nested(nested) => {
                if matches!(resolved.schema.ty, FieldType::Object(_) | FieldType::Union(_)) {
                    let compiled =
                        self.compile_filter_prefixed(table, qualifier, Some(path), nested)?;
                    compiled.ok_or_else(|| {
                        Error::construction(format!("empty nested filter on `{path}`"))
                    })
                } else {
                    Err(Error::construction(format!(
                        "field `{path}` does not support nested filtering"
                    )))
                }
            }
        }
    }

    /// `key: null` compiles to `IS NULL`; containers compare by containment;
    /// everything else is plain (possibly case-folded) equality.
    fn compile_equality(
        &mut self,
        resolved: &ResolvedField<'_>,
        qualifier: &str,
        value: &Value,
        insensitive: bool,
    ) -> Result<Expr> {
        let column = comparison_expr(qualifier, resolved);

        if value.is_null() {
            return Ok(Expr::is_null(column));
        }

        if resolved.schema.is_container() {
            let param = self.bind_value(value.clone(), resolved.schema);
            return Ok(ExprBinaryOp::new(column, BinaryOp::Contains, Expr::cast(param, "jsonb")).into());
        }

        let param = self.bind_value(value.clone(), resolved.schema);
        if insensitive && resolved.schema.is_string_like() {
            Ok(ExprBinaryOp::new(Expr::lower(column), BinaryOp::Eq, Expr::lower(param)).into())
        } else {
            Ok(ExprBinaryOp::new(column, BinaryOp::Eq, param).into())
        }
    }

    fn compile_ops(
        &mut self,
        resolved: &ResolvedField<'_>,
        qualifier: &str,
        ops: &OperatorSet,
    ) -> Result<Expr> {
        let mut operands = vec![];
        let insensitive = ops.insensitive;

        if let Some(value) = &ops.equal {
            operands.push(self.compile_equality(resolved, qualifier, value, insensitive)?);
        }

        if let Some(value) = &ops.not {
            let column = comparison_expr(qualifier, resolved);
            operands.push(if value.is_null() {
                Expr::is_not_null(column)
            } else if resolved.schema.is_container() {
                let param = self.bind_value(value.clone(), resolved.schema);
                Expr::not(ExprBinaryOp::new(
                    column,
                    BinaryOp::Contains,
                    Expr::cast(param, "jsonb"),
                ))
            } else {
                let param = self.bind_value(value.clone(), resolved.schema);
                ExprBinaryOp::new(column, BinaryOp::Ne, param).into()
            });
        }

        for (value, op, container_op) in [
            (&ops.gt, BinaryOp::Gt, BinaryOp::Contains),
            (&ops.gte, BinaryOp::Ge, BinaryOp::Contains),
            (&ops.lt, BinaryOp::Lt, BinaryOp::ContainedBy),
            (&ops.lte, BinaryOp::Le, BinaryOp::ContainedBy),
        ] {
            if let Some(value) = value {
                let column = comparison_expr(qualifier, resolved);
                let expr = if resolved.schema.is_container() {
                    let param = self.bind_value(value.clone(), resolved.schema);
                    ExprBinaryOp::new(column, container_op, Expr::cast(param, "jsonb"))
                } else {
                    let param = self.bind_value(value.clone(), resolved.schema);
                    ExprBinaryOp::new(column, op, param)
                };
                operands.push(expr.into());
            }
        }

        if let Some(values) = &ops.is_in {
            // `IN ()` is invalid SQL and semantically "no match".
            if values.is_empty() {
                operands.push(Expr::Value(Value::Bool(false)));
            } else {
                let column = comparison_expr(qualifier, resolved);
                let list = values
                    .iter()
                    .map(|value| self.bind_value(value.clone(), resolved.schema))
                    .collect();
                operands.push(ExprInList::new(column, list).into());
            }
        }

        if let Some((low, high)) = &ops.is_between {
            let column = comparison_expr(qualifier, resolved);
            let low = self.bind_value(low.clone(), resolved.schema);
            let high = self.bind_value(high.clone(), resolved.schema);
            operands.push(Expr::Between {
                expr: Box::new(column),
                low: Box::new(low),
                high: Box::new(high),
            });
        }

        if let Some(null) = ops.is_null {
            let column = comparison_expr(qualifier, resolved);
            operands.push(if null {
                Expr::is_null(column)
            } else {
                Expr::is_not_null(column)
            });
        }

        if let Some(missing) = ops.is_missing {
            // For JSON paths a key can be absent entirely; `->` extraction
            // yields NULL for both absent and null-valued keys.
            let column = if resolved.is_json() {
                let base = Expr::qualified_column(qualifier, resolved.column);
                ExprJsonPath::new(
                    base,
                    resolved.json_path.iter().map(|s| s.to_string()).collect(),
                    false,
                )
                .into()
            } else {
                Expr::qualified_column(qualifier, resolved.column)
            };
            operands.push(if missing {
                Expr::is_null(column)
            } else {
                Expr::is_not_null(column)
            });
        }

        if let Some(prefix) = &ops.starts_with {
            if !resolved.schema.is_string_like() {
                return Err(Error::construction(format!(
                    "startsWith is not supported on `{}` fields",
                    type_label(resolved.schema)
                )));
            }
            let column = comparison_expr(qualifier, resolved);
            let param = self.bind_value(Value::String(format!("{prefix}%")), resolved.schema);
            let op = if insensitive { BinaryOp::ILike } else { BinaryOp::Like };
            operands.push(ExprBinaryOp::new(column, op, param).into());
        }

        if let Some(value) = &ops.contains {
            let column = comparison_expr(qualifier, resolved);
            if resolved.schema.is_container() {
                let param = self.bind_value(value.clone(), resolved.schema);
                operands.push(
                    ExprBinaryOp::new(column, BinaryOp::Contains, Expr::cast(param, "jsonb"))
                        .into(),
                );
            } else if resolved.schema.is_string_like() {
                let needle = value.as_str().ok_or_else(|| {
                    Error::construction("contains on a string field expects a string value")
                })?;
                let param =
                    self.bind_value(Value::String(format!("%{needle}%")), resolved.schema);
                let op = if insensitive { BinaryOp::ILike } else { BinaryOp::Like };
                operands.push(ExprBinaryOp::new(column, op, param).into());
            } else {
                return Err(Error::construction(format!(
                    "contains is not supported on `{}` fields",
                    type_label(resolved.schema)
                )));
            }
        }

        Expr::and_all(operands)
            .ok_or_else(|| Error::construction("operator object with no recognized operator"))
    }

    /// Filter through a relation alias: correlated EXISTS against the
    /// related table. A null filter means "no related row references this
    /// row".
    fn compile_relation_filter(
        &mut self,
        qualifier: &str,
        edge: &RelationEdge,
        filter: &FieldFilter,
    ) -> Result<Expr> {
        let repo = self.repo;
        let related = repo.table(&edge.source_table)?;

        let alias = self.session.table_alias();
        let id = self.session.stmt_id();

        let mut select = Select::new(id, Source::aliased_table(&related.name, &alias));
        select
            .columns
            .push(ResultColumn::new(Expr::Value(Value::I64(1)), None));
        select.and(Expr::eq(
            Expr::qualified_column(&alias, &edge.source_column),
            Expr::qualified_column(qualifier, &edge.target_column),
        ));

        match filter {
            FieldFilter::Nested(nested) => {
                if let Some(expr) = self.compile_filter(related, &alias, nested)? {
                    select.and(expr);
                }
                Ok(Expr::exists(select))
            }
            FieldFilter::Value(Value::Null) => Ok(Expr::not_exists(select)),
            _ => Err(Error::invalid_relation(format!(
                "relation `{}` expects a nested filter or null",
                edge.target_alias
            ))),
        }
    }

    pub(super) fn bind_value(&mut self, value: Value, schema: &FieldSchema) -> Expr {
        self.session.bind(value, Some(schema))
    }
}

/// The expression a field compares through: a plain column, or a JSON
/// extraction cast to the leaf's declared type (JSON values extract as text
/// by default, so boolean/number leaves need explicit casts).
fn comparison_expr(qualifier: &str, resolved: &ResolvedField<'_>) -> Expr {
    let column = Expr::qualified_column(qualifier, resolved.column);

    if !resolved.is_json() {
        return column;
    }

    let path: Vec<String> = resolved.json_path.iter().map(|s| s.to_string()).collect();

    if resolved.schema.is_container() {
        return ExprJsonPath::new(column, path, false).into();
    }

    let extracted: Expr = ExprJsonPath::new(column, path, true).into();
    match json_cast(resolved.schema) {
        Some(ty) => Expr::cast(extracted, ty),
        None => extracted,
    }
}

fn json_cast(schema: &FieldSchema) -> Option<&'static str> {
    match &schema.ty {
        FieldType::Bool => Some("boolean"),
        FieldType::Number => match schema.format {
            Some(Format::Integer) => Some("bigint"),
            _ => Some("double precision"),
        },
        _ => None,
    }
}

fn type_label(schema: &FieldSchema) -> &'static str {
    match &schema.ty {
        FieldType::Bool => "boolean",
        FieldType::Number => "number",
        FieldType::String => "string",
        FieldType::Object(_) => "object",
        FieldType::Array(_) => "array",
        FieldType::Tuple(_) => "tuple",
        FieldType::Union(_) => "union",
        FieldType::Enum(_) => "enum",
        FieldType::Reference(_) => "reference",
    }
}
