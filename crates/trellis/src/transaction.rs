use crate::{
    db::Client,
    engine::Compiler,
    query::{DeleteQuery, InsertQuery, UpdateQuery, UpsertQuery},
};

use trellis_core::{driver::PreparedStatement, Result};

/// A static transaction: every operation is compiled up front as it is
/// queued, then the whole batch executes inside one driver-level
/// transaction. Any failure rolls back everything.
#[derive(Debug)]
pub struct Batch<'a> {
    client: &'a Client,
    statements: Vec<PreparedStatement>,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(client: &'a Client) -> Batch<'a> {
        Batch {
            client,
            statements: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn insert_one(&mut self, table: &str, query: InsertQuery) -> Result<&mut Self> {
        let prepared = self.compiler(table)?.prepare_insert(&query)?;
        self.statements.push(self.client.prepare(prepared)?);
        Ok(self)
    }

    pub fn update_many(&mut self, table: &str, query: UpdateQuery) -> Result<&mut Self> {
        let prepared = self.compiler(table)?.prepare_update(&query)?;
        self.statements.push(self.client.prepare(prepared)?);
        Ok(self)
    }

    pub fn delete_many(&mut self, table: &str, query: DeleteQuery) -> Result<&mut Self> {
        let prepared = self.compiler(table)?.prepare_delete(&query)?;
        self.statements.push(self.client.prepare(prepared)?);
        Ok(self)
    }

    pub fn upsert_one(&mut self, table: &str, query: UpsertQuery) -> Result<&mut Self> {
        let prepared = self.compiler(table)?.prepare_upsert(&query)?;
        self.statements.push(self.client.prepare(prepared)?);
        Ok(self)
    }

    /// Execute the batch atomically. The driver begins a transaction, runs
    /// every statement in queue order, and commits; the first failure rolls
    /// the whole transaction back and surfaces the error unchanged.
    pub async fn execute(self) -> Result<Vec<trellis_core::driver::Response>> {
        tracing::debug!(statements = self.statements.len(), "executing batch");
        self.client
            .driver()
            .execute_in_transaction(&self.statements)
            .await
    }

    fn compiler(&self, table: &str) -> Result<Compiler<'a>> {
        let def = self.client.repository().table(table)?;
        Ok(Compiler::new(
            self.client.repository(),
            def,
            self.client.validator(),
        ))
    }
}
