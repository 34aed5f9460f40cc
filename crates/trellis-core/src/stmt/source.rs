use super::*;

/// The `FROM` part of a select or the `FROM`/`USING` part of a write.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table { name: String, alias: Option<String> },
    SubQuery { query: Box<Select>, alias: String },
    Cte { stmt: StmtId, alias: Option<String> },
}

impl Source {
    pub fn table(name: impl Into<String>) -> Source {
        Source::Table {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased_table(name: impl Into<String>, alias: impl Into<String>) -> Source {
        Source::Table {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn subquery(query: Select, alias: impl Into<String>) -> Source {
        Source::SubQuery {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    pub fn cte(stmt: StmtId) -> Source {
        Source::Cte { stmt, alias: None }
    }

    /// Name by which columns of this source are qualified.
    pub fn qualifier(&self) -> Option<String> {
        match self {
            Source::Table { name, alias } => Some(alias.clone().unwrap_or_else(|| name.clone())),
            Source::SubQuery { alias, .. } => Some(alias.clone()),
            Source::Cte { stmt, alias } => {
                Some(alias.clone().unwrap_or_else(|| stmt.alias()))
            }
        }
    }
}
