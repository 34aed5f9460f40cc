use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,

    pub source: Source,

    /// Join condition; `None` for natural joins.
    pub on: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    /// `NATURAL FULL JOIN`, used by the upsert branch combination.
    NaturalFull,
}

impl Join {
    pub fn inner(source: Source, on: impl Into<Expr>) -> Join {
        Join {
            kind: JoinKind::Inner,
            source,
            on: Some(on.into()),
        }
    }

    pub fn natural_full(source: Source) -> Join {
        Join {
            kind: JoinKind::NaturalFull,
            source,
            on: None,
        }
    }
}
