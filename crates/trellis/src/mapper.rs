use trellis_core::{
    driver::{ResultMeta, Row},
    schema::{FieldSchema, FieldType, Format, Repository, TableDef},
    stmt::Value,
};

/// Rebuild nested application records from flat result rows.
///
/// Scalar columns coerce through the field schema (drivers hand numerics and
/// JSON back in assorted shapes); relation columns arrive as JSON documents
/// produced by the correlated sub-selects and are parsed back into nested
/// structures. Synthetic columns named in the result metadata are dropped.
pub(crate) fn map_rows(
    repo: &Repository,
    table: &TableDef,
    meta: &ResultMeta,
    rows: Vec<Row>,
) -> Vec<serde_json::Value> {
    rows.into_iter()
        .map(|row| map_row(repo, table, meta, row))
        .collect()
}

pub(crate) fn map_row(
    repo: &Repository,
    table: &TableDef,
    meta: &ResultMeta,
    row: Row,
) -> serde_json::Value {
    let mut object = serde_json::Map::new();

    for (name, value) in row {
        if meta.branch_column.as_deref() == Some(name.as_str()) {
            continue;
        }

        let coerced = if let Some(field) = table.schema.field(&name) {
            coerce(value, field)
        } else if repo.relation(&table.alias, &name).is_some() {
            parse_json(value)
        } else {
            value.into_json()
        };

        object.insert(name, coerced);
    }

    serde_json::Value::Object(object)
}

fn coerce(value: Value, field: &FieldSchema) -> serde_json::Value {
    if value.is_null() {
        return serde_json::Value::Null;
    }

    match &field.ty {
        FieldType::Object(_) | FieldType::Array(_) | FieldType::Tuple(_) | FieldType::Union(_) => {
            parse_json(value)
        }
        FieldType::Number => match (field.format, value) {
            (Some(Format::Integer), Value::F64(n)) => (n as i64).into(),
            (Some(Format::Integer), Value::String(s)) => match s.parse::<i64>() {
                Ok(n) => n.into(),
                Err(_) => serde_json::Value::String(s),
            },
            (_, Value::String(s)) => match s.parse::<f64>() {
                Ok(n) => serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
                Err(_) => serde_json::Value::String(s),
            },
            (_, value) => value.into_json(),
        },
        FieldType::Bool => match value {
            Value::String(s) => {
                serde_json::Value::Bool(matches!(s.as_str(), "t" | "true" | "TRUE"))
            }
            value => value.into_json(),
        },
        _ => value.into_json(),
    }
}

fn parse_json(value: Value) -> serde_json::Value {
    match value {
        Value::Json(value) => value,
        Value::String(text) => {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        }
        value => value.into_json(),
    }
}
