use super::Compiler;

use crate::query::{DataValue, Record, RelationWrite};

use trellis_core::{
    schema::{Cardinality, RelationEdge, Side, TableDef},
    stmt::{self, Expr, ExprCteRef, Select, Source, StmtId, Update, Value},
    Error, Result,
};

/// Whether relation writes are planned for an insert or an update of the
/// main row. The ownership rule is identical; what differs is which
/// secondary statements are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WritePath {
    Insert,
    Update,
}

/// The statements a set of relation writes expands into, positioned around
/// the main statement.
#[derive(Debug, Default)]
pub(super) struct RelationPlan {
    /// Related rows that must exist before the main row (the main row holds
    /// the FK and the key comes out of these statements).
    pub pre: Vec<stmt::Statement>,

    /// Extra column/value pairs for the main row (FK columns). On the
    /// update path these become assignments.
    pub fk_columns: Vec<(String, Expr)>,

    /// Statements referencing the main row, run after it.
    pub post: Vec<stmt::Statement>,

    /// Columns of the main row that post statements reference; they must be
    /// part of the main statement's `RETURNING`.
    pub referenced: Vec<String>,
}

/// One classified relation write.
enum WriteKind<'a> {
    /// Key of an existing related row.
    Connect(&'a Record),

    /// Connect directly by the related key value.
    ConnectValue(&'a Value),

    /// Full payload for a new (insert path) or updated (update path)
    /// related row.
    Payload(&'a Record),

    Disconnect,
}

impl Compiler<'_> {
    /// Expand every relation field of a write payload into the plan. Fails
    /// before any SQL is emitted when a shape or alias is wrong.
    pub(super) fn plan_relation_writes(
        &mut self,
        table: &TableDef,
        main_id: StmtId,
        writes: &[(String, DataValue)],
        path: WritePath,
    ) -> Result<RelationPlan> {
        let mut plan = RelationPlan::default();

        for (alias, value) in writes {
            let repo = self.repo;
            let edge = repo.relation(&table.alias, alias).ok_or_else(|| {
                Error::invalid_relation(format!(
                    "unresolved relation alias `{alias}` on table `{}`",
                    table.alias
                ))
            })?;

            let related = repo.table(&edge.source_table)?;

            match (value, edge.cardinality()) {
                (DataValue::One(write), Cardinality::One) => {
                    let kind = classify(related, edge, write)?;
                    self.plan_one(edge, main_id, kind, path, &mut plan)?;
                }
                (DataValue::Many(writes), Cardinality::Many) => {
                    for write in writes {
                        let kind = classify(related, edge, write)?;
                        self.plan_one(edge, main_id, kind, path, &mut plan)?;
                    }
                }
                (DataValue::Value(Value::Null), _) => {
                    self.plan_one(edge, main_id, WriteKind::Disconnect, path, &mut plan)?;
                }
                (DataValue::Value(value), Cardinality::One) => {
                    self.plan_one(edge, main_id, WriteKind::ConnectValue(value), path, &mut plan)?;
                }
                (DataValue::One(_) | DataValue::Value(_), Cardinality::Many) => {
                    return Err(Error::invalid_relation(format!(
                        "relation `{alias}` expects a list of records"
                    )));
                }
                (DataValue::Many(_), Cardinality::One) => {
                    return Err(Error::invalid_relation(format!(
                        "relation `{alias}` expects a single record"
                    )));
                }
                (DataValue::Increment(_) | DataValue::Decrement(_), _) => {
                    return Err(Error::invalid_relation(format!(
                        "relation `{alias}` cannot take an atomic operator"
                    )));
                }
            }
        }

        Ok(plan)
    }

    fn plan_one(
        &mut self,
        edge: &RelationEdge,
        main_id: StmtId,
        kind: WriteKind<'_>,
        path: WritePath,
        plan: &mut RelationPlan,
    ) -> Result<()> {
        let repo = self.repo;
        let related = repo.table(&edge.source_table)?;
        let holder = edge.key_holder();

        match (kind, holder) {
            (WriteKind::ConnectValue(value), Side::Target) => {
                // The main row stores the FK directly.
                let schema = related.schema.field(&edge.source_column);
                let param = self.session.bind(value.clone(), schema);
                self.push_fk(edge, param, path, plan);
            }
            (WriteKind::Connect(record), Side::Target) => {
                // When the join column value is given directly, store it;
                // connecting by another unique key goes through a scalar
                // sub-select against the related table.
                if let Some(DataValue::Value(value)) = record.fields.get(&edge.source_column) {
                    let schema = related.schema.field(&edge.source_column);
                    let param = self.session.bind(value.clone(), schema);
                    self.push_fk(edge, param, path, plan);
                } else {
                    let mut select =
                        Select::new(self.session.stmt_id(), Source::table(&related.name));
                    select
                        .columns
                        .push(Expr::column(&edge.source_column).into());
                    select.filter = self.record_key_filter(related, record)?;
                    self.push_fk(edge, Expr::Stmt(Box::new(select)), path, plan);
                }
            }
            (WriteKind::ConnectValue(value), Side::Source) => {
                // Point the existing related row, identified by its primary
                // key, at the main row.
                let key = related
                    .primary_index()
                    .and_then(|index| index.columns.first())
                    .ok_or_else(|| {
                        Error::invalid_relation(format!(
                            "connecting `{}` by value requires a primary index on `{}`",
                            edge.target_alias, related.alias
                        ))
                    })?
                    .clone();

                let mut update = Update::new(self.session.stmt_id(), &related.name);
                update.set(&edge.source_column, main_ref(main_id, edge));
                let schema = related.schema.field(&key);
                let param = self.session.bind(value.clone(), schema);
                update.filter = Some(Expr::eq(Expr::column(&key), param));
                plan.referenced.push(edge.target_column.clone());
                plan.post.push(update.into());
            }
            (WriteKind::Connect(record), Side::Source) => {
                let mut update = Update::new(self.session.stmt_id(), &related.name);
                update.set(&edge.source_column, main_ref(main_id, edge));
                update.filter = self.record_key_filter(related, record)?;
                plan.referenced.push(edge.target_column.clone());
                plan.post.push(update.into());
            }
            (WriteKind::Payload(record), Side::Target) => match path {
                WritePath::Insert => {
                    // The related row must exist first; its key is threaded
                    // back through the CTE chain.
                    let insert = self.build_relation_insert(
                        related,
                        record,
                        &[],
                        Some(vec![edge.source_column.clone()]),
                    )?;
                    let fk = Expr::CteRef(ExprCteRef {
                        stmt: insert.id,
                        column: Some(edge.source_column.clone()),
                    });
                    plan.pre.push(insert.into());
                    self.push_fk(edge, fk, path, plan);
                }
                WritePath::Update => {
                    // Nested field update of the connected related row.
                    let update =
                        self.build_nested_update(related, record, edge, main_id)?;
                    plan.referenced.push(edge.target_column.clone());
                    plan.post.push(update.into());
                }
            },
            (WriteKind::Payload(record), Side::Source) => match path {
                WritePath::Insert => {
                    // The related row holds the FK, so it is created after
                    // the main row, referencing the just-inserted key.
                    let extra = vec![(edge.source_column.clone(), main_ref(main_id, edge))];
                    let insert = self.build_relation_insert(related, record, &extra, None)?;
                    plan.referenced.push(edge.target_column.clone());
                    plan.post.push(insert.into());
                }
                WritePath::Update => {
                    let update =
                        self.build_nested_update(related, record, edge, main_id)?;
                    plan.referenced.push(edge.target_column.clone());
                    plan.post.push(update.into());
                }
            },
            (WriteKind::Disconnect, _) if path == WritePath::Insert => {
                return Err(Error::invalid_relation(format!(
                    "relation `{}` cannot be disconnected during insert",
                    edge.target_alias
                )));
            }
            (WriteKind::Disconnect, Side::Target) => {
                plan.fk_columns
                    .push((edge.target_column.clone(), Expr::null()));
            }
            (WriteKind::Disconnect, Side::Source) => {
                // Clear every related row pointing at the affected rows.
                let mut update = Update::new(self.session.stmt_id(), &related.name);
                update.set(&edge.source_column, Expr::null());
                update.from = Some(Source::cte(main_id));
                update.filter = Some(Expr::eq(
                    Expr::qualified_column(&related.name, &edge.source_column),
                    Expr::qualified_column(main_id.alias(), &edge.target_column),
                ));
                plan.referenced.push(edge.target_column.clone());
                plan.post.push(update.into());
            }
        }

        Ok(())
    }

    /// On the update path, connecting through a unique FK clears any row
    /// currently holding the value first (disconnect-then-reconnect), so
    /// the unique index is never violated mid-statement.
    fn push_fk(&mut self, edge: &RelationEdge, value: Expr, path: WritePath, plan: &mut RelationPlan) {
        use trellis_core::schema::IndexKind;

        if path == WritePath::Update && edge.target_index == Some(IndexKind::Unique) {
            if let Expr::Param(param) = &value {
                let table = self.table;
                let mut clear = Update::new(self.session.stmt_id(), &table.name);
                clear.set(&edge.target_column, Expr::null());
                clear.filter = Some(Expr::eq(
                    Expr::column(&edge.target_column),
                    Expr::Param(*param),
                ));
                plan.pre.push(clear.into());
            }
        }

        plan.fk_columns.push((edge.target_column.clone(), value));
    }

    /// Equality filter over a connect record's key fields.
    fn record_key_filter(&mut self, related: &TableDef, record: &Record) -> Result<Option<Expr>> {
        let mut operands = vec![];
        for (name, value) in &record.fields {
            let DataValue::Value(value) = value else {
                return Err(Error::invalid_relation(format!(
                    "connect record for `{}` must contain plain values",
                    related.alias
                )));
            };
            let schema = related.schema.field(name).ok_or_else(|| {
                Error::construction(format!(
                    "no field schema for `{name}` on table `{}`",
                    related.alias
                ))
            })?;
            let param = self.session.bind(value.clone(), Some(schema));
            operands.push(Expr::eq(Expr::column(name), param));
        }
        Ok(Expr::and_all(operands))
    }

    /// `UPDATE related SET ... FROM <main CTE> WHERE fk = main.key`
    fn build_nested_update(
        &mut self,
        related: &TableDef,
        record: &Record,
        edge: &RelationEdge,
        main_id: StmtId,
    ) -> Result<Update> {
        let mut update = Update::new(self.session.stmt_id(), &related.name);

        for (name, value) in &record.fields {
            let DataValue::Value(value) = value else {
                return Err(Error::invalid_relation(format!(
                    "nested update for `{}` only supports plain values",
                    edge.target_alias
                )));
            };
            let schema = related.schema.field(name).ok_or_else(|| {
                Error::construction(format!(
                    "no field schema for `{name}` on table `{}`",
                    related.alias
                ))
            })?;
            self.validate_value(&format!("{}.{name}", edge.target_alias), value, schema);
            let value = self.validator.transform(value.clone(), schema);
            let param = self.session.bind(value, Some(schema));
            update.set(name, param);
        }

        if update.assignments.is_empty() {
            return Err(Error::invalid_relation(format!(
                "nested update for `{}` has no assignments",
                edge.target_alias
            )));
        }

        update.from = Some(Source::cte(main_id));
        update.filter = Some(Expr::eq(
            Expr::qualified_column(&related.name, &edge.source_column),
            Expr::qualified_column(main_id.alias(), &edge.target_column),
        ));

        Ok(update)
    }
}

fn main_ref(main_id: StmtId, edge: &RelationEdge) -> Expr {
    Expr::CteRef(ExprCteRef {
        stmt: main_id,
        column: Some(edge.target_column.clone()),
    })
}

/// Connect vs. create: a record carrying only key fields (the join column or
/// columns of a unique index) is a connect; anything else is a payload. An
/// explicit connect carrying non-key fields mixes the two shapes and is
/// rejected.
fn classify<'a>(
    related: &TableDef,
    edge: &RelationEdge,
    write: &'a RelationWrite,
) -> Result<WriteKind<'a>> {
    let is_key_column = |name: &str| {
        name == edge.source_column
            || related
                .indexes
                .iter()
                .any(|index| index.is_unique() && index.columns.iter().any(|c| c == name))
    };

    match write {
        RelationWrite::Connect(record) => {
            if record.fields.is_empty() {
                return Err(Error::invalid_relation(format!(
                    "connect for relation `{}` is missing the key value",
                    edge.target_alias
                )));
            }
            if let Some(name) = record.fields.keys().find(|name| !is_key_column(name.as_str())) {
                return Err(Error::invalid_relation(format!(
                    "relation `{}` mixes connect and create shapes (`{name}` is not a key field)",
                    edge.target_alias
                )));
            }
            Ok(WriteKind::Connect(record))
        }
        RelationWrite::Create(record) => {
            if record.is_empty() {
                return Err(Error::invalid_relation(format!(
                    "empty record for relation `{}`",
                    edge.target_alias
                )));
            }
            Ok(WriteKind::Payload(record))
        }
        RelationWrite::Record(record) => {
            if record.is_empty() {
                return Err(Error::invalid_relation(format!(
                    "empty record for relation `{}`",
                    edge.target_alias
                )));
            }
            if record.fields.keys().all(|name| is_key_column(name)) {
                Ok(WriteKind::Connect(record))
            } else {
                Ok(WriteKind::Payload(record))
            }
        }
        RelationWrite::Disconnect => Ok(WriteKind::Disconnect),
    }
}

