use trellis_core::schema::{FieldSchema, FieldType, Format};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
    pub not_null: bool,
}

/// Postgres storage types a field schema can lower to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    BigInt,
    DoublePrecision,
    Numeric,
    Text,
    Uuid,
    Date,
    Time,
    Timestamptz,
    Jsonb,
}

impl ColumnDef {
    pub fn from_field(name: &str, field: &FieldSchema) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            ty: ColumnType::from_field(field),
            not_null: !field.nullable && !field.optional,
        }
    }
}

impl ColumnType {
    pub fn from_field(field: &FieldSchema) -> ColumnType {
        match &field.ty {
            FieldType::Bool => ColumnType::Boolean,
            FieldType::Number => match field.format {
                Some(Format::Integer) => ColumnType::BigInt,
                Some(Format::Decimal) => ColumnType::Numeric,
                _ => ColumnType::DoublePrecision,
            },
            FieldType::String => match field.format {
                Some(Format::Uuid) => ColumnType::Uuid,
                Some(Format::Date) => ColumnType::Date,
                Some(Format::Time) => ColumnType::Time,
                Some(Format::DateTime) => ColumnType::Timestamptz,
                _ => ColumnType::Text,
            },
            FieldType::Enum(_) | FieldType::Reference(_) => ColumnType::Text,
            FieldType::Object(_)
            | FieldType::Array(_)
            | FieldType::Tuple(_)
            | FieldType::Union(_) => ColumnType::Jsonb,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::BigInt => "BIGINT",
            ColumnType::DoublePrecision => "DOUBLE PRECISION",
            ColumnType::Numeric => "NUMERIC",
            ColumnType::Text => "TEXT",
            ColumnType::Uuid => "UUID",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::Timestamptz => "TIMESTAMPTZ",
            ColumnType::Jsonb => "JSONB",
        }
    }
}
