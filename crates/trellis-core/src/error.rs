use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compiling or executing a query.
///
/// Everything except `Driver` is raised before any SQL reaches the wire.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A statement could not be built: missing table name, empty record,
    /// zero result columns, no statements to chain, missing index for an
    /// upsert, unknown field, or an operator the field type does not support.
    #[error("invalid statement: {0}")]
    Construction(String),

    /// A relation payload had the wrong shape or referenced an alias that is
    /// not present in the relation repository.
    #[error("invalid relation field: {0}")]
    InvalidRelation(String),

    /// The request payload failed schema validation. Failures are collected
    /// across the whole payload, not short-circuited at the first one.
    #[error("malformed request: {}", FailureList(.failures))]
    MalformedRequest { failures: Vec<ValidationFailure> },

    /// An error reported by the driver while executing a statement. Passed
    /// through unchanged after any active transaction has been rolled back.
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

impl Error {
    pub fn construction(msg: impl Into<String>) -> Error {
        Error::Construction(msg.into())
    }

    pub fn invalid_relation(msg: impl Into<String>) -> Error {
        Error::InvalidRelation(msg.into())
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, Error::Construction(_))
    }
}

/// A single validation failure, tagged with the dotted path of the offending
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub path: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> ValidationFailure {
        ValidationFailure {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

struct FailureList<'a>(&'a [ValidationFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = "";
        for failure in self.0 {
            write!(f, "{s}{failure}")?;
            s = "; ";
        }
        Ok(())
    }
}
