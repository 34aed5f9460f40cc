use trellis_core::stmt::{Select, Value};

/// A structured filter tree, compiled into the `WHERE` clause.
///
/// A filter is an ordered list of entries combined with AND: reserved
/// logical combinators plus field conditions keyed by (possibly dotted)
/// field path or relation alias.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    pub entries: Vec<FilterEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Filter),
    Field(String, FieldFilter),
}

/// The condition applied to one field. Modeled as a closed union so the
/// compiler can match exhaustively instead of probing value shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    /// Direct equality; `Value::Null` compiles to `IS NULL`.
    Value(Value),

    /// Operator map; multiple set operators combine with AND.
    Ops(Box<OperatorSet>),

    /// A sub-select; compiles to `EXISTS (...)`.
    SubSelect(Box<Select>),

    /// Raw column reference; compiles to column equality.
    Reference(ColumnRef),

    /// A nested filter: descends into an object-typed column. When the key
    /// is a relation alias, filters the related table through a correlated
    /// `EXISTS` instead.
    Nested(Filter),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

/// Recognized filter operators.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperatorSet {
    pub equal: Option<Value>,
    pub not: Option<Value>,
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
    pub is_in: Option<Vec<Value>>,
    pub is_between: Option<(Value, Value)>,
    pub is_missing: Option<bool>,
    pub is_null: Option<bool>,
    pub starts_with: Option<String>,
    pub contains: Option<Value>,

    /// Case-insensitive matching, honored only where the field schema
    /// allows it (string-typed fields).
    pub insensitive: bool,
}

impl Filter {
    pub fn new() -> Filter {
        Filter::default()
    }

    /// Single field condition.
    pub fn field(path: impl Into<String>, filter: impl Into<FieldFilter>) -> Filter {
        Filter {
            entries: vec![FilterEntry::Field(path.into(), filter.into())],
        }
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
        Filter {
            entries: vec![FilterEntry::And(filters.into_iter().collect())],
        }
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
        Filter {
            entries: vec![FilterEntry::Or(filters.into_iter().collect())],
        }
    }

    pub fn not(filter: Filter) -> Filter {
        Filter {
            entries: vec![FilterEntry::Not(filter)],
        }
    }

    /// Append another field condition.
    pub fn with(mut self, path: impl Into<String>, filter: impl Into<FieldFilter>) -> Filter {
        self.entries
            .push(FilterEntry::Field(path.into(), filter.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OperatorSet {
    pub fn new() -> OperatorSet {
        OperatorSet::default()
    }

    pub fn equal(mut self, value: impl Into<Value>) -> OperatorSet {
        self.equal = Some(value.into());
        self
    }

    pub fn not(mut self, value: impl Into<Value>) -> OperatorSet {
        self.not = Some(value.into());
        self
    }

    pub fn gt(mut self, value: impl Into<Value>) -> OperatorSet {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<Value>) -> OperatorSet {
        self.gte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<Value>) -> OperatorSet {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Value>) -> OperatorSet {
        self.lte = Some(value.into());
        self
    }

    pub fn is_in(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> OperatorSet {
        self.is_in = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_between(mut self, low: impl Into<Value>, high: impl Into<Value>) -> OperatorSet {
        self.is_between = Some((low.into(), high.into()));
        self
    }

    pub fn is_null(mut self, null: bool) -> OperatorSet {
        self.is_null = Some(null);
        self
    }

    pub fn is_missing(mut self, missing: bool) -> OperatorSet {
        self.is_missing = Some(missing);
        self
    }

    pub fn starts_with(mut self, prefix: impl Into<String>) -> OperatorSet {
        self.starts_with = Some(prefix.into());
        self
    }

    pub fn contains(mut self, value: impl Into<Value>) -> OperatorSet {
        self.contains = Some(value.into());
        self
    }

    pub fn insensitive(mut self) -> OperatorSet {
        self.insensitive = true;
        self
    }
}

impl From<OperatorSet> for FieldFilter {
    fn from(value: OperatorSet) -> FieldFilter {
        FieldFilter::Ops(Box::new(value))
    }
}

impl From<Value> for FieldFilter {
    fn from(value: Value) -> FieldFilter {
        FieldFilter::Value(value)
    }
}

impl From<&str> for FieldFilter {
    fn from(value: &str) -> FieldFilter {
        FieldFilter::Value(value.into())
    }
}

impl From<i64> for FieldFilter {
    fn from(value: i64) -> FieldFilter {
        FieldFilter::Value(value.into())
    }
}

impl From<bool> for FieldFilter {
    fn from(value: bool) -> FieldFilter {
        FieldFilter::Value(value.into())
    }
}

impl From<Filter> for FieldFilter {
    fn from(value: Filter) -> FieldFilter {
        FieldFilter::Nested(value)
    }
}
