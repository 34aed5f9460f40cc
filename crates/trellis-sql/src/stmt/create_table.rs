use super::ColumnDef;

use trellis_core::schema::TableDef;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,

    /// Primary key columns, empty when the table declares none.
    pub primary_key: Vec<String>,
}

impl CreateTable {
    pub fn from_table(table: &TableDef) -> CreateTable {
        CreateTable {
            name: table.name.clone(),
            columns: table
                .schema
                .fields
                .iter()
                .map(|(name, field)| ColumnDef::from_field(name, field))
                .collect(),
            primary_key: table
                .primary_index()
                .map(|index| index.columns.clone())
                .unwrap_or_default(),
        }
    }
}
