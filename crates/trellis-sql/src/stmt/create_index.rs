use trellis_core::schema::{Index, TableDef};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl CreateIndex {
    pub fn from_index(table: &TableDef, index: &Index) -> CreateIndex {
        CreateIndex {
            name: index.name.clone(),
            table: table.name.clone(),
            columns: index.columns.clone(),
            unique: index.is_unique(),
        }
    }
}
