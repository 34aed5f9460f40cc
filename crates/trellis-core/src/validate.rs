use crate::{schema::FieldSchema, stmt::Value, ValidationFailure};

/// Hook invoked on every scalar payload value before it is bound.
///
/// The default implementation accepts and passes values through unchanged;
/// a real validation library is wired in by implementing this trait.
pub trait Validator: Send + Sync + 'static {
    /// Check a value against its field schema. Failures are collected by the
    /// caller across the whole payload, so return everything wrong with this
    /// value, not just the first problem.
    fn validate(&self, path: &str, value: &Value, schema: &FieldSchema) -> Vec<ValidationFailure>;

    /// Coerce a value before binding, e.g. trimming or normalizing formats.
    fn transform(&self, value: Value, schema: &FieldSchema) -> Value;
}

/// Accepts everything, transforms nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _path: &str, _value: &Value, _schema: &FieldSchema) -> Vec<ValidationFailure> {
        vec![]
    }

    fn transform(&self, value: Value, _schema: &FieldSchema) -> Value {
        value
    }
}
