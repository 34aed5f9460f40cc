use super::{Filter, Order, SelectTree};

use indexmap::IndexMap;

/// Per-relation read options applied when a related set is selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Include {
    pub relations: IndexMap<String, IncludeOptions>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncludeOptions {
    pub filter: Option<Filter>,
    pub order: Option<Order>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    pub select: Option<SelectTree>,
}

impl Include {
    pub fn new() -> Include {
        Include::default()
    }

    pub fn relation(mut self, alias: impl Into<String>, options: IncludeOptions) -> Include {
        self.relations.insert(alias.into(), options);
        self
    }

    /// Include a relation with default options.
    pub fn all(mut self, alias: impl Into<String>) -> Include {
        self.relations
            .insert(alias.into(), IncludeOptions::default());
        self
    }
}

impl IncludeOptions {
    pub fn new() -> IncludeOptions {
        IncludeOptions::default()
    }

    pub fn filter(mut self, filter: Filter) -> IncludeOptions {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: Order) -> IncludeOptions {
        self.order = Some(order);
        self
    }

    pub fn skip(mut self, skip: u64) -> IncludeOptions {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> IncludeOptions {
        self.take = Some(take);
        self
    }

    pub fn select(mut self, select: SelectTree) -> IncludeOptions {
        self.select = Some(select);
        self
    }

    pub(crate) fn paginates(&self) -> bool {
        self.order.is_some() || self.skip.is_some() || self.take.is_some()
    }
}
