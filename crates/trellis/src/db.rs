use crate::{engine::Prepared, table::Table, transaction::Batch};

use trellis_core::{
    driver::{Param, PreparedStatement, Response, ResultMeta, TransactionId},
    schema::{IndexKind, Repository},
    AcceptAll, Driver, Result, Validator,
};
use trellis_sql::{Serializer, Statement};

use std::future::Future;
use std::sync::Arc;

/// Handle to a configured database: the table repository, the driver, and
/// the validation hook. Cloning is cheap; a clone carrying a transaction id
/// is a transaction-scoped client.
#[derive(Clone)]
pub struct Client {
    driver: Arc<dyn Driver>,
    repo: Arc<Repository>,
    validator: Arc<dyn Validator>,

    /// Set on transaction-scoped clients; every statement issued through
    /// this handle reuses the id.
    tx: Option<TransactionId>,
}

impl Client {
    pub fn new(repo: Repository, driver: impl Driver) -> Client {
        Client {
            driver: Arc::new(driver),
            repo: Arc::new(repo),
            validator: Arc::new(AcceptAll),
            tx: None,
        }
    }

    pub fn with_validator(mut self, validator: impl Validator) -> Client {
        self.validator = Arc::new(validator);
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub(crate) fn validator(&self) -> &dyn Validator {
        &*self.validator
    }

    pub(crate) fn driver(&self) -> &dyn Driver {
        &*self.driver
    }

    pub(crate) fn transaction_id(&self) -> Option<TransactionId> {
        self.tx
    }

    /// Per-table operation handle.
    pub fn table(&self, alias: &str) -> Result<Table<'_>> {
        let def = self.repo.table(alias)?;
        Ok(Table::new(self, def))
    }

    /// Run a callback with a transaction-scoped client. The transaction
    /// commits when the callback resolves and rolls back when it errors.
    /// Nesting reuses the already-open transaction instead of opening a new
    /// one.
    pub async fn transaction<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.tx.is_some() {
            return f(self.clone()).await;
        }

        let id = self.driver.begin().await?;

        let mut scoped = self.clone();
        scoped.tx = Some(id);

        match f(scoped).await {
            Ok(value) => {
                self.driver.commit(id).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.driver.rollback(id).await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Start a static batch: operations are compiled as they are queued and
    /// later executed together inside one driver-level transaction.
    pub fn batch(&self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Create every repository table and its secondary/unique indexes.
    pub async fn create_tables(&self) -> Result<()> {
        let serializer = Serializer::new();
        let mut batch = vec![];

        for table in self.repo.tables() {
            batch.push(ddl(serializer.serialize(&Statement::create_table(table))));

            for index in &table.indexes {
                // The primary key is part of CREATE TABLE; TTL indexes are
                // informational.
                if matches!(index.kind, IndexKind::Primary | IndexKind::Ttl) {
                    continue;
                }
                batch.push(ddl(
                    serializer.serialize(&Statement::create_index(table, index)),
                ));
            }
        }

        self.driver.execute_batch(&batch, self.tx).await?;
        Ok(())
    }

    /// Serialize a compiled operation and run the driver's parameter
    /// encoding hook over its bound values.
    pub(crate) fn prepare(&self, prepared: Prepared) -> Result<PreparedStatement> {
        let sql = Serializer::new().serialize(&prepared.statement);

        let mut params = Vec::with_capacity(prepared.params.len());
        for (index, param) in prepared.params.into_iter().enumerate() {
            let value = self.driver.prepare_variable(
                &format!("p{index}"),
                param.value,
                param.schema.as_ref(),
            )?;
            params.push(Param {
                value,
                schema: param.schema,
            });
        }

        Ok(PreparedStatement {
            sql,
            params,
            result: prepared.meta,
        })
    }

    pub(crate) async fn execute(&self, statement: &PreparedStatement) -> Result<Response> {
        tracing::debug!(
            sql = %statement.sql,
            params = statement.params.len(),
            "executing statement"
        );

        match self.driver.execute(statement, self.tx).await {
            Ok(response) => Ok(response),
            Err(err) => {
                tracing::error!(
                    sql = %statement.sql,
                    params = ?statement.params,
                    error = %err,
                    "statement failed"
                );
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("driver", &self.driver)
            .field("tx", &self.tx)
            .finish_non_exhaustive()
    }
}

fn ddl(sql: String) -> PreparedStatement {
    PreparedStatement {
        sql,
        params: vec![],
        result: ResultMeta::default(),
    }
}
