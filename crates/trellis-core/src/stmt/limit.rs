/// `LIMIT` / `OFFSET` pair; either half may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Option<Limit> {
        if limit.is_none() && offset.is_none() {
            None
        } else {
            Some(Limit { limit, offset })
        }
    }
}
