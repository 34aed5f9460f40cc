use serde::{Deserialize, Serialize};

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name, unique within the table.
    pub name: String,

    /// Indexed columns, in index order.
    pub columns: Vec<String>,

    pub kind: IndexKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Primary,
    Secondary,
    Unique,
    /// Informational only; rows expire via the backend, not via this core.
    Ttl,
}

impl Index {
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
        kind: IndexKind,
    ) -> Index {
        Index {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    pub fn primary(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Index {
        Index::new(name, columns, IndexKind::Primary)
    }

    pub fn unique(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Index {
        Index::new(name, columns, IndexKind::Unique)
    }

    /// Unique indexes (primary or declared unique) can anchor upsert conflict
    /// targets and single-cardinality relations.
    pub fn is_unique(&self) -> bool {
        matches!(self.kind, IndexKind::Primary | IndexKind::Unique)
    }

    /// True when the index columns are exactly the given field set.
    pub fn covers(&self, fields: &[&str]) -> bool {
        if self.columns.len() != fields.len() {
            return false;
        }
        let have: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        fields.iter().all(|f| have.contains(f))
    }
}
