use trellis_core::stmt::Value;

use indexmap::IndexMap;

/// A write payload: ordered field name → data value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub fields: IndexMap<String, DataValue>,
}

/// The value written to one field. Plain values cover scalar and JSON
/// columns; relation variants cover writes through relation aliases.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Value(Value),

    /// Atomic `column = column + n`; numbers only.
    Increment(f64),

    /// Atomic `column = column - n`; numbers only.
    Decrement(f64),

    /// Write a single related record (to-one relations).
    One(RelationWrite),

    /// Write a set of related records (to-many relations).
    Many(Vec<RelationWrite>),
}

/// How one related record is written.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationWrite {
    /// Classified by content: a record carrying only the related key
    /// connects, anything else creates.
    Record(Record),

    /// Connect to an existing row; the record must carry only the related
    /// table's key fields.
    Connect(Record),

    /// Create the related row from this record.
    Create(Record),

    /// Clear the link. Only meaningful on the update path.
    Disconnect,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Record {
        self.fields
            .insert(field.into(), DataValue::Value(value.into()));
        self
    }

    pub fn increment(mut self, field: impl Into<String>, by: f64) -> Record {
        self.fields.insert(field.into(), DataValue::Increment(by));
        self
    }

    pub fn decrement(mut self, field: impl Into<String>, by: f64) -> Record {
        self.fields.insert(field.into(), DataValue::Decrement(by));
        self
    }

    /// Write a to-one relation; connect-vs-create is decided by the
    /// relation resolver.
    pub fn relation(mut self, alias: impl Into<String>, record: Record) -> Record {
        self.fields
            .insert(alias.into(), DataValue::One(RelationWrite::Record(record)));
        self
    }

    pub fn relation_write(mut self, alias: impl Into<String>, write: RelationWrite) -> Record {
        self.fields.insert(alias.into(), DataValue::One(write));
        self
    }

    pub fn relations(
        mut self,
        alias: impl Into<String>,
        writes: impl IntoIterator<Item = RelationWrite>,
    ) -> Record {
        self.fields.insert(
            alias.into(),
            DataValue::Many(writes.into_iter().collect()),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Record {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), DataValue::Value(v.into())))
                .collect(),
        }
    }
}
