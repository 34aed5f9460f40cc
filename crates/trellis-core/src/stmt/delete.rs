use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub id: StmtId,

    pub table: String,

    pub filter: Option<Expr>,

    pub returning: Option<Vec<ResultColumn>>,
}

impl Delete {
    pub fn new(id: StmtId, table: impl Into<String>) -> Delete {
        Delete {
            id,
            table: table.into(),
            filter: None,
            returning: None,
        }
    }
}
