#![allow(dead_code)]

use trellis::driver::{Driver, PreparedStatement, Response, Row, TransactionId};
use trellis::schema::{
    FieldSchema, Index, IndexKind, RelationEdge, Repository, TableDef, TableSchema,
};
use trellis::stmt::Value;
use trellis::Result;

use trellis_core::async_trait;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Everything the driver was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin(u64),
    Execute {
        sql: String,
        params: Vec<Value>,
        tx: Option<u64>,
    },
    Commit(u64),
    Rollback(u64),
}

/// Test driver: records every call and answers with canned responses.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    events: Mutex<Vec<Event>>,
    responses: Mutex<VecDeque<Response>>,
    fail_on_execute: Mutex<Option<usize>>,
    next_tx: AtomicU64,
}

impl RecordingDriver {
    pub fn new() -> RecordingDriver {
        RecordingDriver::default()
    }

    /// Queue a response served by the next unanswered `execute`.
    pub fn respond_with(&self, rows: Vec<Row>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::from_rows(rows));
    }

    /// Make the nth (1-based) `execute` call fail.
    pub fn fail_on_execute(&self, nth: usize) {
        *self.fail_on_execute.lock().unwrap() = Some(nth);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn sql_log(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Execute { sql, .. } => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn params_log(&self) -> Vec<Vec<Value>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Execute { params, .. } => Some(params),
                _ => None,
            })
            .collect()
    }

    pub fn begin_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Begin(_)))
            .count()
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn execute(
        &self,
        statement: &PreparedStatement,
        transaction: Option<TransactionId>,
    ) -> Result<Response> {
        let executed = {
            let mut events = self.events.lock().unwrap();
            events.push(Event::Execute {
                sql: statement.sql.clone(),
                params: statement.params.iter().map(|p| p.value.clone()).collect(),
                tx: transaction.map(|id| id.0),
            });
            events
                .iter()
                .filter(|event| matches!(event, Event::Execute { .. }))
                .count()
        };

        if *self.fail_on_execute.lock().unwrap() == Some(executed) {
            return Err(anyhow::anyhow!("injected failure on statement {executed}").into());
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn begin(&self) -> Result<TransactionId> {
        let id = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.lock().unwrap().push(Event::Begin(id));
        Ok(TransactionId(id))
    }

    async fn commit(&self, id: TransactionId) -> Result<()> {
        self.events.lock().unwrap().push(Event::Commit(id.0));
        Ok(())
    }

    async fn rollback(&self, id: TransactionId) -> Result<()> {
        self.events.lock().unwrap().push(Event::Rollback(id.0));
        Ok(())
    }
}

/// Driver handle that stays inspectable after the client takes ownership.
#[derive(Debug)]
pub struct SharedDriver(pub std::sync::Arc<RecordingDriver>);

#[async_trait]
impl Driver for SharedDriver {
    async fn execute(
        &self,
        statement: &PreparedStatement,
        transaction: Option<TransactionId>,
    ) -> Result<Response> {
        self.0.execute(statement, transaction).await
    }

    async fn begin(&self) -> Result<TransactionId> {
        self.0.begin().await
    }

    async fn commit(&self, id: TransactionId) -> Result<()> {
        self.0.commit(id).await
    }

    async fn rollback(&self, id: TransactionId) -> Result<()> {
        self.0.rollback(id).await
    }
}

/// A client over the fixture repository plus the inspectable driver handle.
pub fn client() -> (trellis::Client, std::sync::Arc<RecordingDriver>) {
    let driver = std::sync::Arc::new(RecordingDriver::new());
    let client = trellis::Client::new(repo(), SharedDriver(driver.clone()));
    (client, driver)
}

pub fn row(values: Vec<(&str, Value)>) -> Row {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Fixture repository:
///
/// - `table_a`: primary `id_a`; holds `relation_1_id`, a secondary-indexed
///   FK to `table_b.id_b` (to-one, `table_a` is the key holder); exposes
///   `items`, a to-many relation from `table_c.a_id`.
/// - `table_b`: primary `id_b`.
/// - `table_c`: primary `id_c`, secondary `a_id` pointing at `table_a.id_a`.
/// - `table_d`: primary `id_d`, unique `b_id` pointing at `table_b.id_b`.
pub fn repo() -> Repository {
    let table_a = TableDef::new(
        "table_a",
        "table_a",
        TableSchema::new([
            ("id_a", FieldSchema::string()),
            ("name", FieldSchema::string().nullable()),
            ("value", FieldSchema::integer()),
            (
                "payload",
                FieldSchema::object([
                    ("city", FieldSchema::string()),
                    ("zip", FieldSchema::integer()),
                    ("active", FieldSchema::bool()),
                ])
                .nullable(),
            ),
            ("tags", FieldSchema::array(FieldSchema::string()).nullable()),
            ("relation_1_id", FieldSchema::string().nullable()),
        ]),
    )
    .with_index(Index::primary("table_a_pkey", ["id_a"]))
    .with_index(Index::new(
        "table_a_relation_1",
        ["relation_1_id"],
        IndexKind::Secondary,
    ))
    .with_relation(RelationEdge {
        source_table: "table_b".into(),
        source_column: "id_b".into(),
        source_index: Some(IndexKind::Primary),
        target_table: "table_a".into(),
        target_column: "relation_1_id".into(),
        target_index: Some(IndexKind::Secondary),
        target_alias: "relation_1".into(),
    })
    .with_relation(RelationEdge {
        source_table: "table_c".into(),
        source_column: "a_id".into(),
        source_index: Some(IndexKind::Secondary),
        target_table: "table_a".into(),
        target_column: "id_a".into(),
        target_index: Some(IndexKind::Primary),
        target_alias: "items".into(),
    });

    let table_b = TableDef::new(
        "table_b",
        "table_b",
        TableSchema::new([
            ("id_b", FieldSchema::string()),
            ("value", FieldSchema::string().nullable()),
        ]),
    )
    .with_index(Index::primary("table_b_pkey", ["id_b"]));

    let table_c = TableDef::new(
        "table_c",
        "table_c",
        TableSchema::new([
            ("id_c", FieldSchema::string()),
            ("a_id", FieldSchema::string().nullable()),
            ("label", FieldSchema::string().nullable()),
        ]),
    )
    .with_index(Index::primary("table_c_pkey", ["id_c"]))
    .with_index(Index::new("table_c_a_id", ["a_id"], IndexKind::Secondary));

    let table_d = TableDef::new(
        "table_d",
        "table_d",
        TableSchema::new([
            ("id_d", FieldSchema::string()),
            ("b_id", FieldSchema::string().nullable()),
        ]),
    )
    .with_index(Index::primary("table_d_pkey", ["id_d"]))
    .with_index(Index::unique("table_d_b_id_key", ["b_id"]))
    .with_relation(RelationEdge {
        source_table: "table_b".into(),
        source_column: "id_b".into(),
        source_index: Some(IndexKind::Primary),
        target_table: "table_d".into(),
        target_column: "b_id".into(),
        target_index: Some(IndexKind::Unique),
        target_alias: "partner".into(),
    });

    Repository::builder()
        .table(table_a)
        .table(table_b)
        .table(table_c)
        .table(table_d)
        .build()
        .unwrap()
}
