mod response;
pub use response::{Response, Row};

mod statement;
pub use statement::{Param, PreparedStatement, ResultMeta};

use crate::{async_trait, schema::FieldSchema, stmt::Value, Result};

use std::fmt::Debug;

/// Identifier of an open driver-level transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(pub u64);

/// The execution boundary. This core only decides *what* to execute and in
/// what order; connections, pooling, retries and timeouts all live behind
/// this trait.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute a single statement, inside the given transaction if any.
    async fn execute(
        &self,
        statement: &PreparedStatement,
        transaction: Option<TransactionId>,
    ) -> Result<Response>;

    /// Execute a batch of statements in order on one connection.
    async fn execute_batch(
        &self,
        batch: &[PreparedStatement],
        transaction: Option<TransactionId>,
    ) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(batch.len());
        for statement in batch {
            responses.push(self.execute(statement, transaction).await?);
        }
        Ok(responses)
    }

    /// Execute a batch atomically: begin, run every statement, commit. Any
    /// failure rolls the transaction back and surfaces the error unchanged.
    async fn execute_in_transaction(
        &self,
        batch: &[PreparedStatement],
    ) -> Result<Vec<Response>> {
        let id = self.begin().await?;
        match self.execute_batch(batch, Some(id)).await {
            Ok(responses) => {
                self.commit(id).await?;
                Ok(responses)
            }
            Err(err) => {
                self.rollback(id).await?;
                Err(err)
            }
        }
    }

    async fn begin(&self) -> Result<TransactionId>;

    async fn commit(&self, id: TransactionId) -> Result<()>;

    async fn rollback(&self, id: TransactionId) -> Result<()>;

    /// Encode one bound value before execution. The default is a pass-through;
    /// drivers override this to apply backend-specific casts.
    fn prepare_variable(
        &self,
        _name: &str,
        value: Value,
        _schema: Option<&FieldSchema>,
    ) -> Result<Value> {
        Ok(value)
    }
}
