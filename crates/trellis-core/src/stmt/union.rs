use super::*;

use crate::{Error, Result};

/// Statements concatenated with `UNION ALL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub operands: Vec<Statement>,
}

impl Union {
    pub fn new(operands: Vec<Statement>) -> Result<Union> {
        if operands.is_empty() {
            return Err(Error::construction("no statements to union"));
        }
        Ok(Union { operands })
    }
}
