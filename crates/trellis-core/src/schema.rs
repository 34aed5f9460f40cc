mod field;
pub use field::{DefaultValue, Definitions, FieldSchema, FieldType, Format};

mod index;
pub use index::{Index, IndexKind};

mod relation;
pub use relation::{fk_holder, Cardinality, RelationEdge, Side};

mod repository;
pub use repository::{Repository, RepositoryBuilder, TableDef};

mod table;
pub use table::{ResolvedField, TableSchema};
