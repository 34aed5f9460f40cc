use super::{Filter, Include, Order, Record, SelectTree};

/// Read request: selection, relation includes, filter, order, pagination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FindQuery {
    pub select: Option<SelectTree>,
    pub include: Option<Include>,
    pub filter: Option<Filter>,
    pub order: Option<Order>,
    pub skip: Option<u64>,
    pub take: Option<u64>,

    /// `FOR UPDATE`
    pub lock: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsertQuery {
    pub data: Record,
    pub select: Option<SelectTree>,
    pub include: Option<Include>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateQuery {
    pub filter: Option<Filter>,
    pub data: Record,
    pub select: Option<SelectTree>,
    pub include: Option<Include>,
}

/// Insert-or-update. The filter must exactly cover a primary or unique
/// index; `insert` is the payload for the insert arm, `update` the
/// assignments applied on conflict.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpsertQuery {
    pub filter: Filter,
    pub insert: Record,
    pub update: Record,
    pub select: Option<SelectTree>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteQuery {
    pub filter: Option<Filter>,
    pub select: Option<SelectTree>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountQuery {
    pub filter: Option<Filter>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

impl FindQuery {
    pub fn new() -> FindQuery {
        FindQuery::default()
    }

    pub fn filter(mut self, filter: Filter) -> FindQuery {
        self.filter = Some(filter);
        self
    }

    pub fn select(mut self, select: SelectTree) -> FindQuery {
        self.select = Some(select);
        self
    }

    pub fn include(mut self, include: Include) -> FindQuery {
        self.include = Some(include);
        self
    }

    pub fn order(mut self, order: Order) -> FindQuery {
        self.order = Some(order);
        self
    }

    pub fn skip(mut self, skip: u64) -> FindQuery {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> FindQuery {
        self.take = Some(take);
        self
    }

    pub fn lock(mut self) -> FindQuery {
        self.lock = true;
        self
    }
}

impl InsertQuery {
    pub fn new(data: Record) -> InsertQuery {
        InsertQuery {
            data,
            ..InsertQuery::default()
        }
    }

    pub fn select(mut self, select: SelectTree) -> InsertQuery {
        self.select = Some(select);
        self
    }

    pub fn include(mut self, include: Include) -> InsertQuery {
        self.include = Some(include);
        self
    }
}

impl UpdateQuery {
    pub fn new(data: Record) -> UpdateQuery {
        UpdateQuery {
            data,
            ..UpdateQuery::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> UpdateQuery {
        self.filter = Some(filter);
        self
    }

    pub fn select(mut self, select: SelectTree) -> UpdateQuery {
        self.select = Some(select);
        self
    }
}

impl UpsertQuery {
    pub fn new(filter: Filter, insert: Record, update: Record) -> UpsertQuery {
        UpsertQuery {
            filter,
            insert,
            update,
            select: None,
        }
    }
}

impl DeleteQuery {
    pub fn new() -> DeleteQuery {
        DeleteQuery::default()
    }

    pub fn filter(mut self, filter: Filter) -> DeleteQuery {
        self.filter = Some(filter);
        self
    }
}

impl CountQuery {
    pub fn new() -> CountQuery {
        CountQuery::default()
    }

    pub fn filter(mut self, filter: Filter) -> CountQuery {
        self.filter = Some(filter);
        self
    }
}
