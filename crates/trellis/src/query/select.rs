use indexmap::IndexMap;

/// A selection tree: which fields (and related records) come back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectTree {
    pub entries: IndexMap<String, SelectNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectNode {
    /// Select the field as-is.
    Field,

    /// Select into a nested structure: sub-fields of an object column, or
    /// the selection applied to a related table.
    Nested(SelectTree),
}

impl SelectTree {
    pub fn new() -> SelectTree {
        SelectTree::default()
    }

    pub fn fields(names: impl IntoIterator<Item = impl Into<String>>) -> SelectTree {
        SelectTree {
            entries: names
                .into_iter()
                .map(|name| (name.into(), SelectNode::Field))
                .collect(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> SelectTree {
        self.entries.insert(name.into(), SelectNode::Field);
        self
    }

    pub fn nested(mut self, name: impl Into<String>, tree: SelectTree) -> SelectTree {
        self.entries.insert(name.into(), SelectNode::Nested(tree));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
