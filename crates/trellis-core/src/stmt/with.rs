use super::*;

/// `WITH q0 AS (...), q1 AS (...) <tail>`: an ordered chain of statements
/// serialized as one. References between members flow forward only; the
/// build order is significant and preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    /// Intermediate statements, aliased by their identifiers.
    pub ctes: Vec<Statement>,

    /// Drives the final result; never aliased.
    pub tail: Box<Statement>,
}
