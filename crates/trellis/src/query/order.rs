use trellis_core::stmt::Direction;

/// Ordered list of (field path, direction) pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Order {
    pub fields: Vec<(String, Direction)>,
}

impl Order {
    pub fn new() -> Order {
        Order::default()
    }

    pub fn asc(mut self, field: impl Into<String>) -> Order {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    pub fn desc(mut self, field: impl Into<String>) -> Order {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    pub fn by(field: impl Into<String>, direction: Direction) -> Order {
        Order {
            fields: vec![(field.into(), direction)],
        }
    }
}
