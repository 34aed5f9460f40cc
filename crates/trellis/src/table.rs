use crate::{
    db::Client,
    engine::Compiler,
    mapper,
    query::{CountQuery, DeleteQuery, FindQuery, InsertQuery, UpdateQuery, UpsertQuery},
};

use trellis_core::{schema::TableDef, stmt::Value, Error, Result};

/// Per-table CRUD facade. Obtained from [`Client::table`]; borrows the
/// client, so transaction scoping carries over.
#[derive(Debug)]
pub struct Table<'a> {
    client: &'a Client,
    def: &'a TableDef,
}

impl<'a> Table<'a> {
    pub(crate) fn new(client: &'a Client, def: &'a TableDef) -> Table<'a> {
        Table { client, def }
    }

    pub fn name(&self) -> &str {
        &self.def.alias
    }

    fn compiler(&self) -> Compiler<'a> {
        Compiler::new(self.client.repository(), self.def, self.client.validator())
    }

    /// Insert one record, returning it in the requested shape.
    pub async fn insert_one(&self, query: InsertQuery) -> Result<serde_json::Value> {
        let prepared = self.compiler().prepare_insert(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;

        let mut rows = mapper::map_rows(
            self.client.repository(),
            self.def,
            &statement.result,
            response.rows,
        );
        if rows.is_empty() {
            return Err(Error::Driver(anyhow::anyhow!(
                "insert into `{}` returned no rows",
                self.def.alias
            )));
        }
        Ok(rows.remove(0))
    }

    pub async fn find_one(&self, mut query: FindQuery) -> Result<Option<serde_json::Value>> {
        query.take = Some(1);
        let mut rows = self.find_many(query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    pub async fn find_many(&self, query: FindQuery) -> Result<Vec<serde_json::Value>> {
        let prepared = self.compiler().prepare_find(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;

        Ok(mapper::map_rows(
            self.client.repository(),
            self.def,
            &statement.result,
            response.rows,
        ))
    }

    /// Update matching rows and return the first updated record, if any.
    pub async fn update_one(&self, query: UpdateQuery) -> Result<Option<serde_json::Value>> {
        let prepared = self.compiler().prepare_update(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;

        let mut rows = mapper::map_rows(
            self.client.repository(),
            self.def,
            &statement.result,
            response.rows,
        );
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// Update matching rows, returning how many were affected.
    pub async fn update_many(&self, query: UpdateQuery) -> Result<u64> {
        let prepared = self.compiler().prepare_update(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;
        Ok(response.row_count)
    }

    pub async fn delete_one(&self, query: DeleteQuery) -> Result<u64> {
        self.delete_many(query).await
    }

    pub async fn delete_many(&self, query: DeleteQuery) -> Result<u64> {
        let prepared = self.compiler().prepare_delete(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;
        Ok(response.row_count)
    }

    /// Insert-or-update through the declared unique index.
    pub async fn upsert_one(&self, query: UpsertQuery) -> Result<serde_json::Value> {
        let prepared = self.compiler().prepare_upsert(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;

        let mut rows = mapper::map_rows(
            self.client.repository(),
            self.def,
            &statement.result,
            response.rows,
        );
        if rows.is_empty() {
            return Err(Error::Driver(anyhow::anyhow!(
                "upsert into `{}` returned no rows",
                self.def.alias
            )));
        }
        Ok(rows.remove(0))
    }

    pub async fn count(&self, query: CountQuery) -> Result<u64> {
        let prepared = self.compiler().prepare_count(&query)?;
        let statement = self.client.prepare(prepared)?;
        let response = self.client.execute(&statement).await?;

        let count = response
            .rows
            .first()
            .and_then(|row| row.get("count"))
            .cloned()
            .unwrap_or(Value::I64(0));

        match count {
            Value::I64(n) => Ok(n.max(0) as u64),
            Value::String(s) => Ok(s.parse().unwrap_or(0)),
            _ => Ok(0),
        }
    }
}
