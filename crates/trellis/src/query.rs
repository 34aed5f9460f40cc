mod filter;
pub use filter::{ColumnRef, FieldFilter, Filter, FilterEntry, OperatorSet};

mod include;
pub use include::{Include, IncludeOptions};

mod order;
pub use order::Order;

mod record;
pub use record::{DataValue, Record, RelationWrite};

mod request;
pub use request::{CountQuery, DeleteQuery, FindQuery, InsertQuery, UpdateQuery, UpsertQuery};

mod select;
pub use select::{SelectNode, SelectTree};

pub use trellis_core::stmt::{Direction, Value};
