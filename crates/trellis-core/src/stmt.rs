mod delete;
pub use delete::Delete;

mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_call;
pub use expr_call::ExprCall;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_cte_ref;
pub use expr_cte_ref::ExprCteRef;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_json;
pub use expr_json::{ExprJsonObject, ExprJsonPath};

mod expr_or;
pub use expr_or::ExprOr;

mod expr_param;
pub use expr_param::ExprParam;

mod id;
pub use id::StmtId;

mod insert;
pub use insert::{Insert, OnConflict};

mod join;
pub use join::{Join, JoinKind};

mod limit;
pub use limit::Limit;

mod op;
pub use op::BinaryOp;

mod order_by;
pub use order_by::{OrderBy, OrderByExpr};

mod result_column;
pub use result_column::ResultColumn;

mod select;
pub use select::Select;

mod source;
pub use source::Source;

mod union;
pub use union::Union;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

mod with;
pub use with::With;

use crate::{Error, Result};

/// A single SQL statement, or a composition of statements that serializes to
/// one (CTE chain, union).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Union(Union),
    Update(Update),
    With(With),
}

impl Statement {
    /// Identifier assigned at construction time. Compositions answer with
    /// the identifier of the statement that drives their result.
    pub fn id(&self) -> StmtId {
        match self {
            Statement::Delete(stmt) => stmt.id,
            Statement::Insert(stmt) => stmt.id,
            Statement::Select(stmt) => stmt.id,
            Statement::Union(stmt) => stmt.operands[0].id(),
            Statement::Update(stmt) => stmt.id,
            Statement::With(stmt) => stmt.tail.id(),
        }
    }

    /// Compose an ordered statement list into one statement. All but the
    /// last become CTEs named after their identifiers; the last statement
    /// drives the result and is never aliased.
    pub fn chain(mut statements: Vec<Statement>) -> Result<Statement> {
        match statements.len() {
            0 => Err(Error::construction("no statements to chain")),
            1 => Ok(statements.remove(0)),
            _ => {
                let tail = statements.pop().unwrap();
                Ok(Statement::With(With {
                    ctes: statements,
                    tail: Box::new(tail),
                }))
            }
        }
    }

    /// Forward reference to this statement's output, usable by dependent
    /// statements before this one is serialized.
    pub fn reference(&self, column: Option<&str>) -> Expr {
        Expr::CteRef(ExprCteRef {
            stmt: self.id(),
            column: column.map(str::to_string),
        })
    }
}

impl From<Select> for Statement {
    fn from(src: Select) -> Statement {
        Statement::Select(src)
    }
}

impl From<Insert> for Statement {
    fn from(src: Insert) -> Statement {
        Statement::Insert(src)
    }
}

impl From<Update> for Statement {
    fn from(src: Update) -> Statement {
        Statement::Update(src)
    }
}

impl From<Delete> for Statement {
    fn from(src: Delete) -> Statement {
        Statement::Delete(src)
    }
}

impl From<With> for Statement {
    fn from(src: With) -> Statement {
        Statement::With(src)
    }
}

impl From<Union> for Statement {
    fn from(src: Union) -> Statement {
        Statement::Union(src)
    }
}
