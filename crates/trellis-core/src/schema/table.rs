use super::FieldSchema;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered field map describing the shape of one table's records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: IndexMap<String, FieldSchema>,
}

/// Result of resolving a dotted path against a table schema.
///
/// The first segment is always a physical column; any remaining segments
/// descend into a JSON-typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField<'a> {
    /// Physical column holding the value.
    pub column: &'a str,

    /// Path below the column, for JSON extraction. Empty for plain columns.
    pub json_path: Vec<&'a str>,

    /// Schema of the addressed leaf.
    pub schema: &'a FieldSchema,
}

impl TableSchema {
    pub fn new<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldSchema)>) -> TableSchema {
        TableSchema {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Resolve a dotted path, descending through object fields and through
    /// one level of union per step. Returns `None` when any segment is
    /// unknown.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<ResolvedField<'a>> {
        let mut segments = path.split('.');
        let column = segments.next()?;
        let mut schema = self.fields.get(column)?;
        let mut json_path = Vec::new();

        for segment in segments {
            schema = schema.ty.property(segment)?;
            json_path.push(segment);
        }

        Some(ResolvedField {
            column,
            json_path,
            schema,
        })
    }
}

impl ResolvedField<'_> {
    pub fn is_json(&self) -> bool {
        !self.json_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    use pretty_assertions::assert_eq;

    fn address() -> FieldSchema {
        FieldSchema::object([
            ("city", FieldSchema::string()),
            ("zip", FieldSchema::integer()),
        ])
    }

    #[test]
    fn resolve_plain_column() {
        let schema = TableSchema::new([("name", FieldSchema::string())]);

        let resolved = schema.resolve("name").unwrap();
        assert_eq!(resolved.column, "name");
        assert!(resolved.json_path.is_empty());
    }

    #[test]
    fn resolve_nested_object_path() {
        let schema = TableSchema::new([("address", address())]);

        let resolved = schema.resolve("address.zip").unwrap();
        assert_eq!(resolved.column, "address");
        assert_eq!(resolved.json_path, vec!["zip"]);
        assert!(matches!(resolved.schema.ty, FieldType::Number));
    }

    #[test]
    fn resolve_through_union_requires_all_branches() {
        let both = FieldSchema::union([
            FieldSchema::object([("kind", FieldSchema::string())]),
            FieldSchema::object([("kind", FieldSchema::string()), ("extra", FieldSchema::bool())]),
        ]);
        let schema = TableSchema::new([("payload", both)]);

        // `kind` exists in every branch, `extra` only in one.
        assert!(schema.resolve("payload.kind").is_some());
        assert!(schema.resolve("payload.extra").is_none());
    }

    #[test]
    fn resolve_unknown_segment() {
        let schema = TableSchema::new([("address", address())]);
        assert!(schema.resolve("address.country").is_none());
        assert!(schema.resolve("missing").is_none());
    }
}
