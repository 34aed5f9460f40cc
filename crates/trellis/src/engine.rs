mod condition;
mod count;
mod delete;
mod insert;
mod relation;
mod results;
mod select;
mod session;
mod update;
mod upsert;

pub(crate) use session::BuilderSession;

use trellis_core::{
    driver::{Param, ResultMeta},
    schema::{FieldSchema, Repository, TableDef},
    stmt::{self, Value},
    Error, Result, ValidationFailure, Validator,
};

/// Compiles one logical operation into a statement (possibly a CTE chain)
/// plus its ordered parameters.
///
/// One compiler instance per client call: the session's alias and parameter
/// counters are shared by every statement the call produces, which is what
/// keeps aliases and `$n` positions collision-free across the chain.
pub(crate) struct Compiler<'a> {
    pub(crate) repo: &'a Repository,
    pub(crate) table: &'a TableDef,
    pub(crate) validator: &'a dyn Validator,
    pub(crate) session: BuilderSession,

    /// Validation failures collected across the whole payload; surfaced
    /// together instead of short-circuiting at the first one.
    failures: Vec<ValidationFailure>,
}

/// A compiled operation, ready to serialize and hand to the driver.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub statement: trellis_sql::Statement,
    pub params: Vec<Param>,
    pub meta: ResultMeta,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(
        repo: &'a Repository,
        table: &'a TableDef,
        validator: &'a dyn Validator,
    ) -> Compiler<'a> {
        Compiler {
            repo,
            table,
            validator,
            session: BuilderSession::new(),
            failures: vec![],
        }
    }

    /// Run the validation hook on one payload value, collecting failures.
    pub(crate) fn validate_value(&mut self, path: &str, value: &Value, schema: &FieldSchema) {
        let failures = self.validator.validate(path, value, schema);
        self.failures.extend(failures);
    }

    /// Abort with every collected validation failure, if any.
    pub(crate) fn check_failures(&mut self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(Error::MalformedRequest {
            failures: std::mem::take(&mut self.failures),
        })
    }

    fn finish(self, statement: stmt::Statement, meta: ResultMeta) -> Prepared {
        debug_assert!(self.failures.is_empty());

        Prepared {
            statement: statement.into(),
            params: self.session.into_params(),
            meta,
        }
    }
}
