mod column_def;
pub use column_def::{ColumnDef, ColumnType};

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod drop_table;
pub use drop_table::DropTable;

use trellis_core::{
    schema::{Index, TableDef},
    stmt,
};

/// A serializable statement: DML produced by the query compiler, or DDL
/// produced from table metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    Delete(stmt::Delete),
    DropTable(DropTable),
    Insert(stmt::Insert),
    Select(stmt::Select),
    Union(stmt::Union),
    Update(stmt::Update),
    With(stmt::With),
}

impl Statement {
    pub fn create_table(table: &TableDef) -> Statement {
        Statement::CreateTable(CreateTable::from_table(table))
    }

    pub fn create_index(table: &TableDef, index: &Index) -> Statement {
        Statement::CreateIndex(CreateIndex::from_index(table, index))
    }

    pub fn drop_table(name: impl Into<String>) -> Statement {
        Statement::DropTable(DropTable {
            name: name.into(),
            if_exists: false,
        })
    }

    pub fn drop_table_if_exists(name: impl Into<String>) -> Statement {
        Statement::DropTable(DropTable {
            name: name.into(),
            if_exists: true,
        })
    }
}

impl From<stmt::Statement> for Statement {
    fn from(value: stmt::Statement) -> Statement {
        match value {
            stmt::Statement::Delete(stmt) => Statement::Delete(stmt),
            stmt::Statement::Insert(stmt) => Statement::Insert(stmt),
            stmt::Statement::Select(stmt) => Statement::Select(stmt),
            stmt::Statement::Union(stmt) => Statement::Union(stmt),
            stmt::Statement::Update(stmt) => Statement::Update(stmt),
            stmt::Statement::With(stmt) => Statement::With(stmt),
        }
    }
}

impl From<stmt::Select> for Statement {
    fn from(value: stmt::Select) -> Statement {
        Statement::Select(value)
    }
}

impl From<stmt::Insert> for Statement {
    fn from(value: stmt::Insert) -> Statement {
        Statement::Insert(value)
    }
}
