#[macro_use]
mod fmt;
use fmt::ToSql;

mod cte;

mod delim;
use delim::Comma;

mod ident;
pub use ident::{quote_ident, quote_literal};
use ident::Ident;

// Fragment serializers
mod expr;
mod statement;
mod ty;
mod value;

use crate::stmt::Statement;

/// Serialize a statement to Postgres SQL text.
///
/// Parameters are already bound as positional references inside the AST, so
/// serialization is a single pure pass; `$n` placeholders line up with the
/// builder session's parameter list by construction.
#[derive(Debug, Default)]
pub struct Serializer {
    _private: (),
}

struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,
}

impl Serializer {
    pub fn new() -> Serializer {
        Serializer::default()
    }

    pub fn serialize(&self, stmt: &Statement) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter { dst: &mut ret };
        stmt.to_sql(&mut fmt);

        ret
    }

    /// SQL for a transaction control operation.
    pub fn serialize_begin(&self) -> String {
        "BEGIN".to_string()
    }

    pub fn serialize_commit(&self) -> String {
        "COMMIT".to_string()
    }

    pub fn serialize_rollback(&self) -> String {
        "ROLLBACK".to_string()
    }
}
