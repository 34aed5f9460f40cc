use super::{quote_literal, Formatter, ToSql};

use trellis_core::stmt::Value;

use std::fmt::Write;

/// Inline literal rendering. Almost every value travels as a bound
/// parameter; this path exists for the few constants embedded directly in
/// the SQL text (boolean short-circuits, `to_char` masks, synthetic branch
/// markers).
impl ToSql for &Value {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Value::Null => fmt!(f, "NULL"),
            Value::Bool(true) => fmt!(f, "TRUE"),
            Value::Bool(false) => fmt!(f, "FALSE"),
            Value::I64(value) => write!(f.dst, "{value}").unwrap(),
            Value::F64(value) => write!(f.dst, "{value}").unwrap(),
            Value::String(value) => fmt!(f, quote_literal(value)),
            Value::Json(value) => {
                fmt!(f, quote_literal(&value.to_string()), "::jsonb");
            }
        }
    }
}
