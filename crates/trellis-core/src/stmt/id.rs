use std::fmt;

/// Stable identifier assigned to a statement when it is created.
///
/// CTE aliases (`q0`, `q1`, ...) derive from it, which is what lets a later
/// statement hold a reference to an earlier one before either is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StmtId(pub u32);

impl StmtId {
    pub fn alias(&self) -> String {
        format!("q{}", self.0)
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}
