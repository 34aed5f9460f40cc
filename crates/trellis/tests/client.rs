mod support;

use support::{client, row, Event};

use trellis::query::{
    DeleteQuery, FieldFilter, Filter, FindQuery, InsertQuery, Record, RelationWrite, UpdateQuery,
    UpsertQuery, Value,
};
use trellis::schema::FieldSchema;
use trellis::{Error, Validator};

use trellis_core::ValidationFailure;

use pretty_assertions::assert_eq;

#[tokio::test]
async fn insert_then_find_round_trips_the_record() {
    let (client, driver) = client();

    driver.respond_with(vec![row(vec![
        ("id_a", Value::String("foo".into())),
        ("value", Value::I64(1)),
    ])]);
    driver.respond_with(vec![row(vec![
        ("id_a", Value::String("foo".into())),
        ("value", Value::I64(1)),
    ])]);

    let table = client.table("table_a").unwrap();

    let inserted = table
        .insert_one(InsertQuery::new(
            Record::new().value("id_a", "foo").value("value", 1i64),
        ))
        .await
        .unwrap();
    assert_eq!(inserted, serde_json::json!({"id_a": "foo", "value": 1}));

    let found = table
        .find_one(FindQuery::new().filter(Filter::field("id_a", "foo")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, inserted);

    let sql = driver.sql_log();
    assert!(sql[0].starts_with("INSERT INTO \"table_a\""), "{}", sql[0]);
    assert!(sql[1].starts_with("SELECT"), "{}", sql[1]);
    assert!(sql[1].contains("LIMIT 1"), "{}", sql[1]);
}

#[tokio::test]
async fn nested_insert_creates_the_related_row_first_and_threads_the_key() {
    let (client, driver) = client();
    driver.respond_with(vec![row(vec![
        ("id_a", Value::String("x".into())),
        ("relation_1_id", Value::String("y".into())),
    ])]);

    client
        .table("table_a")
        .unwrap()
        .insert_one(InsertQuery::new(Record::new().value("id_a", "x").relation(
            "relation_1",
            Record::new().value("id_b", "y").value("value", "bar"),
        )))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];

    // The related row is inserted first (as a CTE) because table_a holds the
    // FK; the main insert references its key through the chain.
    let related = sql.find("INSERT INTO \"table_b\"").expect(sql);
    let main = sql.find("INSERT INTO \"table_a\"").expect(sql);
    assert!(sql.starts_with("WITH"), "{sql}");
    assert!(related < main, "{sql}");
    assert!(
        sql.contains("(SELECT \"id_b\" FROM \"q1\")"),
        "{sql}"
    );

    assert_eq!(
        driver.params_log()[0],
        vec![
            Value::String("x".into()),
            Value::String("y".into()),
            Value::String("bar".into()),
        ]
    );
}

#[tokio::test]
async fn to_many_create_inserts_after_the_main_row() {
    let (client, driver) = client();
    driver.respond_with(vec![row(vec![("id_a", Value::String("x".into()))])]);

    client
        .table("table_a")
        .unwrap()
        .insert_one(InsertQuery::new(Record::new().value("id_a", "x").relations(
            "items",
            [RelationWrite::Create(
                Record::new().value("id_c", "c1").value("label", "first"),
            )],
        )))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    let main = sql.find("INSERT INTO \"table_a\"").expect(sql);
    let related = sql.find("INSERT INTO \"table_c\"").expect(sql);
    assert!(main < related, "{sql}");
    // The post-insert points back at the just-inserted main row.
    assert!(sql.contains("(SELECT \"id_a\" FROM \"q0\")"), "{sql}");
}

#[tokio::test]
async fn relation_shape_mismatches_fail_before_any_sql() {
    let (client, driver) = client();
    let table = client.table("table_a").unwrap();

    // Single record where the to-many relation expects a list.
    let err = table
        .insert_one(InsertQuery::new(Record::new().value("id_a", "x").relation(
            "items",
            Record::new().value("id_c", "c1"),
        )))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRelation(_)), "{err:?}");

    // Unresolved alias.
    let err = table
        .insert_one(InsertQuery::new(
            Record::new()
                .value("id_a", "x")
                .relation("no_such_relation", Record::new().value("id_b", "y")),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRelation(_)), "{err:?}");

    // Explicit connect carrying non-key fields mixes connect and create.
    let err = table
        .insert_one(InsertQuery::new(Record::new().value("id_a", "x").relation_write(
            "relation_1",
            RelationWrite::Connect(Record::new().value("id_b", "y").value("value", "bar")),
        )))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRelation(_)), "{err:?}");

    assert!(driver.sql_log().is_empty());
}

#[tokio::test]
async fn update_through_unique_fk_disconnects_before_reconnecting() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_d")
        .unwrap()
        .update_many(
            UpdateQuery::new(Record::new().relation_write(
                "partner",
                RelationWrite::Connect(Record::new().value("id_b", "b1")),
            ))
            .filter(Filter::field("id_d", "d1")),
        )
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    let clear = sql
        .find("UPDATE \"table_d\" SET \"b_id\" = NULL WHERE \"b_id\" = $1")
        .expect(sql);
    // The reconnect references the same bound value and runs second.
    let connect = sql.find("SET \"b_id\" = $1 WHERE \"table_d\".\"id_d\" = $2").expect(sql);
    assert!(sql.starts_with("WITH"), "{sql}");
    assert!(clear < connect, "{sql}");
}

#[tokio::test]
async fn relation_only_update_substitutes_a_select_for_the_main_statement() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .update_many(
            UpdateQuery::new(Record::new().relations(
                "items",
                [RelationWrite::Create(Record::new().value("label", "renamed"))],
            ))
            .filter(Filter::field("id_a", "x")),
        )
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.starts_with("WITH \"q0\" AS (SELECT"), "{sql}");
    assert!(
        sql.contains("UPDATE \"table_c\" SET \"label\" = $"),
        "{sql}"
    );
    assert!(
        sql.contains("FROM \"q0\" WHERE \"table_c\".\"a_id\" = \"q0\".\"id_a\""),
        "{sql}"
    );
}

#[tokio::test]
async fn disconnecting_clears_the_fk() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .update_many(
            UpdateQuery::new(Record::new().relation_write("relation_1", RelationWrite::Disconnect))
                .filter(Filter::field("id_a", "x")),
        )
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.contains("\"relation_1_id\" = NULL"), "{sql}");
}

#[tokio::test]
async fn upsert_requires_a_covering_unique_index() {
    let (client, driver) = client();
    driver.respond_with(vec![row(vec![("id_b", Value::String("k".into()))])]);

    let table = client.table("table_b").unwrap();

    // `id_b` is the primary index: accepted.
    table
        .upsert_one(UpsertQuery::new(
            Filter::field("id_b", "k"),
            Record::new().value("value", "v1"),
            Record::new().value("value", "v2"),
        ))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(
        sql.contains("ON CONFLICT (\"id_b\") DO UPDATE SET \"value\" = $"),
        "{sql}"
    );
    assert!(sql.contains("NATURAL FULL JOIN"), "{sql}");
    assert!(sql.contains("\"_branch\""), "{sql}");

    // `value` matches no unique index: rejected before the driver.
    let err = table
        .upsert_one(UpsertQuery::new(
            Filter::field("value", "v"),
            Record::new(),
            Record::new(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Construction(_)), "{err:?}");
    assert_eq!(driver.sql_log().len(), 1);
}

#[tokio::test]
async fn upsert_result_drops_the_branch_marker() {
    let (client, driver) = client();
    driver.respond_with(vec![row(vec![
        ("id_b", Value::String("k".into())),
        ("value", Value::String("v1".into())),
        ("_branch", Value::I64(0)),
    ])]);

    let upserted = client
        .table("table_b")
        .unwrap()
        .upsert_one(UpsertQuery::new(
            Filter::field("id_b", "k"),
            Record::new().value("value", "v1"),
            Record::new().value("value", "v1"),
        ))
        .await
        .unwrap();

    assert_eq!(upserted, serde_json::json!({"id_b": "k", "value": "v1"}));
}

#[tokio::test]
async fn static_batch_rolls_back_when_any_statement_fails() {
    let (client, driver) = client();
    driver.fail_on_execute(3);

    let mut batch = client.batch();
    batch
        .insert_one(
            "table_b",
            InsertQuery::new(Record::new().value("id_b", "b1")),
        )
        .unwrap();
    batch
        .update_many(
            "table_a",
            UpdateQuery::new(Record::new().value("name", "renamed"))
                .filter(Filter::field("id_a", "x")),
        )
        .unwrap();
    batch
        .delete_many(
            "table_c",
            DeleteQuery::new().filter(Filter::field("id_c", "c1")),
        )
        .unwrap();

    let err = batch.execute().await.unwrap_err();
    assert!(matches!(err, Error::Driver(_)), "{err:?}");

    let events = driver.events();
    assert!(matches!(events[0], Event::Begin(_)), "{events:?}");
    assert!(
        matches!(events.last(), Some(Event::Rollback(_))),
        "{events:?}"
    );
    assert!(
        !events.iter().any(|event| matches!(event, Event::Commit(_))),
        "{events:?}"
    );

    // All three statements went to the same transaction.
    let tx_ids: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::Execute { tx, .. } => Some(*tx),
            _ => None,
        })
        .collect();
    assert_eq!(tx_ids.len(), 3);
    assert!(tx_ids.iter().all(|tx| tx.is_some()), "{events:?}");
}

#[tokio::test]
async fn nested_interactive_transactions_reuse_the_outer_transaction() {
    let (client, driver) = client();
    driver.respond_with(vec![row(vec![("count", Value::I64(0))])]);
    driver.respond_with(vec![row(vec![("count", Value::I64(0))])]);

    client
        .transaction(|tx| async move {
            tx.table("table_a")?
                .count(trellis::query::CountQuery::new())
                .await?;

            tx.transaction(|inner| async move {
                inner
                    .table("table_b")?
                    .count(trellis::query::CountQuery::new())
                    .await?;
                Ok(())
            })
            .await
        })
        .await
        .unwrap();

    assert_eq!(driver.begin_count(), 1);

    let events = driver.events();
    assert!(
        matches!(events.last(), Some(Event::Commit(_))),
        "{events:?}"
    );

    // Both statements carried the same transaction id.
    let tx_ids: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::Execute { tx, .. } => *tx,
            _ => None,
        })
        .collect();
    assert_eq!(tx_ids, vec![tx_ids[0], tx_ids[0]]);
}

#[tokio::test]
async fn failed_interactive_transaction_rolls_back() {
    let (client, driver) = client();
    driver.fail_on_execute(1);

    let err = client
        .transaction(|tx| async move {
            tx.table("table_a")?
                .count(trellis::query::CountQuery::new())
                .await?;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Driver(_)), "{err:?}");
    let events = driver.events();
    assert!(
        matches!(events.last(), Some(Event::Rollback(_))),
        "{events:?}"
    );
}

#[derive(Debug)]
struct MaxLenValidator(usize);

impl Validator for MaxLenValidator {
    fn validate(&self, path: &str, value: &Value, _schema: &FieldSchema) -> Vec<ValidationFailure> {
        match value {
            Value::String(s) if s.len() > self.0 => vec![ValidationFailure::new(
                path,
                format!("longer than {} characters", self.0),
            )],
            _ => vec![],
        }
    }

    fn transform(&self, value: Value, _schema: &FieldSchema) -> Value {
        value
    }
}

#[tokio::test]
async fn validation_failures_are_collected_not_short_circuited() {
    let (client, driver) = client();
    let client = client.with_validator(MaxLenValidator(3));

    let err = client
        .table("table_a")
        .unwrap()
        .insert_one(InsertQuery::new(
            Record::new()
                .value("id_a", "way-too-long")
                .value("name", "also-too-long"),
        ))
        .await
        .unwrap_err();

    match err {
        Error::MalformedRequest { failures } => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].path, "table_a.id_a");
            assert_eq!(failures[1].path, "table_a.name");
        }
        other => panic!("expected MalformedRequest, got {other:?}"),
    }

    assert!(driver.sql_log().is_empty());
}

#[tokio::test]
async fn relation_filter_value_rejects_non_filter_shapes() {
    let (client, driver) = client();

    let err = client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().filter(Filter::field(
            "relation_1",
            FieldFilter::Value(Value::I64(1)),
        )))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidRelation(_)), "{err:?}");
    assert!(driver.sql_log().is_empty());
}
