mod support;

use support::client;

use trellis::query::{
    FieldFilter, Filter, FindQuery, Include, IncludeOptions, InsertQuery, OperatorSet, Order,
    Record, SelectTree, UpdateQuery, Value,
};
use trellis::Error;

use pretty_assertions::assert_eq;

#[tokio::test]
async fn compiling_the_same_filter_twice_is_deterministic() {
    let (client, driver) = client();
    driver.respond_with(vec![]);
    driver.respond_with(vec![]);

    let query = || {
        FindQuery::new().filter(
            Filter::field("name", OperatorSet::new().starts_with("jo"))
                .with("value", OperatorSet::new().gte(10).lt(20)),
        )
    };

    let table = client.table("table_a").unwrap();
    table.find_many(query()).await.unwrap();
    table.find_many(query()).await.unwrap();

    let sql = driver.sql_log();
    let params = driver.params_log();
    assert_eq!(sql[0], sql[1]);
    assert_eq!(params[0], params[1]);
    assert_eq!(
        params[0],
        vec![
            Value::String("jo%".into()),
            Value::I64(10),
            Value::I64(20)
        ]
    );
}

#[tokio::test]
async fn empty_is_in_compiles_to_false_not_in_list() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().filter(Filter::field(
            "name",
            OperatorSet::new().is_in(Vec::<Value>::new()),
        )))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.contains("FALSE"), "{sql}");
    assert!(!sql.contains(" IN ("), "{sql}");
    assert!(driver.params_log()[0].is_empty());
}

#[tokio::test]
async fn json_path_filters_cast_by_leaf_type() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(
            FindQuery::new().filter(
                Filter::field("payload.zip", OperatorSet::new().gt(1000))
                    .with("payload.active", true),
            ),
        )
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(
        sql.contains("(\"t0\".\"payload\"->>'zip')::bigint > $1"),
        "{sql}"
    );
    assert!(
        sql.contains("(\"t0\".\"payload\"->>'active')::boolean = $2"),
        "{sql}"
    );
}

#[tokio::test]
async fn insensitive_equality_folds_both_sides() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().filter(Filter::field(
            "name",
            OperatorSet::new().equal("Jo").insensitive(),
        )))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.contains("LOWER(\"t0\".\"name\") = LOWER($1)"), "{sql}");
}

#[tokio::test]
async fn container_equality_uses_containment() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().filter(Filter::field(
            "tags",
            FieldFilter::Value(Value::Json(serde_json::json!(["a"]))),
        )))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.contains("\"t0\".\"tags\" @> ($1)::jsonb"), "{sql}");
}

#[tokio::test]
async fn relation_filter_compiles_to_correlated_exists() {
    let (client, driver) = client();
    driver.respond_with(vec![]);
    driver.respond_with(vec![]);

    let table = client.table("table_a").unwrap();

    table
        .find_many(FindQuery::new().filter(Filter::field(
            "relation_1",
            FieldFilter::Nested(Filter::field("value", "bar")),
        )))
        .await
        .unwrap();

    table
        .find_many(FindQuery::new().filter(Filter::field(
            "relation_1",
            FieldFilter::Value(Value::Null),
        )))
        .await
        .unwrap();

    let sql = driver.sql_log();
    assert!(
        sql[0].contains(
            "EXISTS (SELECT 1 FROM \"table_b\" AS \"t1\" WHERE (\"t1\".\"id_b\" = \"t0\".\"relation_1_id\" AND \"t1\".\"value\" = $1))"
        ),
        "{}",
        sql[0]
    );
    assert!(sql[1].contains("NOT EXISTS (SELECT 1 FROM \"table_b\""), "{}", sql[1]);
}

#[tokio::test]
async fn to_many_selection_aggregates_with_empty_array_fallback() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().include(Include::new().all("items")))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.contains("COALESCE((SELECT json_agg(json_build_object("), "{sql}");
    assert!(sql.contains("'[]'::json) AS \"items\""), "{sql}");
}

#[tokio::test]
async fn paginated_include_wraps_before_aggregation() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().include(Include::new().relation(
            "items",
            IncludeOptions::new().order(Order::new().desc("label")).skip(2).take(3),
        )))
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    // LIMIT/OFFSET apply inside the wrapped select, before json_agg.
    assert!(sql.contains("FROM (SELECT"), "{sql}");
    assert!(sql.contains("LIMIT 3 OFFSET 2"), "{sql}");
    assert!(sql.contains("ORDER BY \"t1\".\"label\" DESC"), "{sql}");
    let agg = sql.find("json_agg").unwrap();
    let limit = sql.find("LIMIT 3").unwrap();
    assert!(limit > agg, "pagination must be inside the aggregate: {sql}");
}

#[tokio::test]
async fn to_one_selection_is_a_scalar_object_column() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    client
        .table("table_a")
        .unwrap()
        .find_many(
            FindQuery::new().select(
                SelectTree::new()
                    .field("id_a")
                    .nested("relation_1", SelectTree::fields(["id_b", "value"])),
            ),
        )
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(
        sql.contains("(SELECT json_build_object('id_b', \"t1\".\"id_b\", 'value', \"t1\".\"value\") FROM \"table_b\" AS \"t1\""),
        "{sql}"
    );
    assert!(!sql.contains("json_agg"), "{sql}");
}

#[tokio::test]
async fn selecting_unknown_columns_fails_before_the_driver() {
    let (client, driver) = client();

    let err = client
        .table("table_a")
        .unwrap()
        .find_many(FindQuery::new().select(SelectTree::fields(["nope"])))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Construction(_)), "{err:?}");
    assert!(driver.sql_log().is_empty());
}

#[tokio::test]
async fn count_uses_the_find_filter_compiler() {
    let (client, driver) = client();
    driver.respond_with(vec![support::row(vec![("count", Value::I64(7))])]);

    let count = client
        .table("table_a")
        .unwrap()
        .count(trellis::query::CountQuery::new().filter(Filter::field("value", 1i64)))
        .await
        .unwrap();

    assert_eq!(count, 7);
    let sql = &driver.sql_log()[0];
    assert!(sql.contains("SELECT COUNT(1) AS \"count\" FROM \"table_a\""), "{sql}");
    assert!(sql.contains("\"t0\".\"value\" = $1"), "{sql}");
}

#[tokio::test]
async fn atomic_increment_requires_a_numeric_field() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    let table = client.table("table_a").unwrap();

    let err = table
        .update_many(
            UpdateQuery::new(Record::new().increment("name", 1.0))
                .filter(Filter::field("id_a", "x")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Construction(_)), "{err:?}");

    table
        .update_many(
            UpdateQuery::new(Record::new().increment("value", 2.0))
                .filter(Filter::field("id_a", "x")),
        )
        .await
        .unwrap();

    let sql = &driver.sql_log()[0];
    assert!(sql.contains("\"value\" = \"value\" + $1"), "{sql}");
}

#[tokio::test]
async fn plain_insert_returns_through_returning() {
    let (client, driver) = client();
    driver.respond_with(vec![]);

    // An insert that came back without rows is a driver anomaly, not a
    // silent success.
    client
        .table("table_b")
        .unwrap()
        .insert_one(InsertQuery::new(Record::new().value("id_b", "k")))
        .await
        .unwrap_err();

    let sql = &driver.sql_log()[0];
    assert!(
        sql.starts_with("INSERT INTO \"table_b\" (\"id_b\") VALUES ($1) RETURNING"),
        "{sql}"
    );
    assert!(!sql.contains("WITH"), "{sql}");
}
