use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema for a single field of a table (or of a nested object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub ty: FieldType,

    /// The field may be absent from a payload entirely.
    #[serde(default)]
    pub optional: bool,

    /// The column accepts SQL NULL.
    #[serde(default)]
    pub nullable: bool,

    /// Refines the wire representation of the type, e.g. `uuid` or
    /// `date-time` for strings, `integer` or `decimal` for numbers.
    #[serde(default)]
    pub format: Option<Format>,

    #[serde(default)]
    pub definitions: Definitions,
}

/// The closed set of field types. Object/array/tuple/union recurse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Number,
    String,
    Object(IndexMap<String, FieldSchema>),
    Array(Box<FieldSchema>),
    Tuple(Vec<FieldSchema>),
    Union(Vec<FieldSchema>),
    Enum(Vec<String>),
    /// Reference to another table's record, stored as that table's key.
    Reference(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Uuid,
    Date,
    DateTime,
    Time,
    Integer,
    Decimal,
}

/// Extra constraints and annotations attached to a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub extensible: bool,
    #[serde(default)]
    pub encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Value(serde_json::Value),
    /// Populate with a fresh v4 UUID on insert.
    Uuid,
}

impl FieldSchema {
    pub fn new(ty: FieldType) -> FieldSchema {
        FieldSchema {
            ty,
            optional: false,
            nullable: false,
            format: None,
            definitions: Definitions::default(),
        }
    }

    pub fn bool() -> FieldSchema {
        FieldSchema::new(FieldType::Bool)
    }

    pub fn number() -> FieldSchema {
        FieldSchema::new(FieldType::Number)
    }

    pub fn integer() -> FieldSchema {
        FieldSchema::new(FieldType::Number).with_format(Format::Integer)
    }

    pub fn string() -> FieldSchema {
        FieldSchema::new(FieldType::String)
    }

    pub fn uuid() -> FieldSchema {
        FieldSchema::new(FieldType::String).with_format(Format::Uuid)
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldSchema)>) -> FieldSchema {
        FieldSchema::new(FieldType::Object(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn array(item: FieldSchema) -> FieldSchema {
        FieldSchema::new(FieldType::Array(Box::new(item)))
    }

    pub fn union(variants: impl IntoIterator<Item = FieldSchema>) -> FieldSchema {
        FieldSchema::new(FieldType::Union(variants.into_iter().collect()))
    }

    pub fn with_format(mut self, format: Format) -> FieldSchema {
        self.format = Some(format);
        self
    }

    pub fn nullable(mut self) -> FieldSchema {
        self.nullable = true;
        self
    }

    pub fn optional(mut self) -> FieldSchema {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> FieldSchema {
        self.definitions.default = Some(default);
        self
    }

    /// Containers are stored in JSON columns and compared with containment
    /// operators rather than scalar equality.
    pub fn is_container(&self) -> bool {
        matches!(
            self.ty,
            FieldType::Object(_) | FieldType::Array(_) | FieldType::Tuple(_)
        )
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self.ty, FieldType::String | FieldType::Enum(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.ty, FieldType::Number)
    }

    /// The `to_char` mask for temporally formatted string fields, if any.
    pub fn date_mask(&self) -> Option<&'static str> {
        match self.format {
            Some(Format::Date) => Some("YYYY-MM-DD"),
            Some(Format::DateTime) => Some("YYYY-MM-DD\"T\"HH24:MI:SS.MS\"Z\""),
            Some(Format::Time) => Some("HH24:MI:SS"),
            _ => None,
        }
    }
}

impl FieldType {
    /// Look up a property one level down. Objects resolve directly; unions
    /// resolve only when the property exists in every branch (taking the
    /// first branch's schema), otherwise the property is treated as absent.
    pub fn property(&self, name: &str) -> Option<&FieldSchema> {
        match self {
            FieldType::Object(fields) => fields.get(name),
            FieldType::Union(variants) => {
                let mut found = None;
                for variant in variants {
                    match variant.ty.property(name) {
                        Some(schema) => {
                            found.get_or_insert(schema);
                        }
                        None => return None,
                    }
                }
                found
            }
            _ => None,
        }
    }
}
