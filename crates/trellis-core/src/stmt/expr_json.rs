use super::*;

/// JSON extraction below a column: `base -> 'a' -> 'b'`, with the final step
/// rendered as `->>` when the value is needed as text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprJsonPath {
    pub base: Box<Expr>,
    pub path: Vec<String>,
    pub as_text: bool,
}

impl ExprJsonPath {
    pub fn new(base: impl Into<Expr>, path: Vec<String>, as_text: bool) -> ExprJsonPath {
        ExprJsonPath {
            base: Box::new(base.into()),
            path,
            as_text,
        }
    }
}

impl From<ExprJsonPath> for Expr {
    fn from(value: ExprJsonPath) -> Expr {
        Expr::JsonPath(value)
    }
}

/// `json_build_object('k1', v1, ...)`, or the `jsonb` variant when binary
/// JSON comparison is required downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprJsonObject {
    pub entries: Vec<(String, Expr)>,
    pub binary: bool,
}

impl ExprJsonObject {
    pub fn new(entries: Vec<(String, Expr)>) -> ExprJsonObject {
        ExprJsonObject {
            entries,
            binary: false,
        }
    }
}

impl From<ExprJsonObject> for Expr {
    fn from(value: ExprJsonObject) -> Expr {
        Expr::JsonObject(value)
    }
}
