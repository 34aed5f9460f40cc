use super::{Index, IndexKind, RelationEdge, TableSchema};
use crate::{Error, Result};

use indexmap::IndexMap;

use std::collections::{HashMap, HashSet};

/// Everything known about one table: physical name, record schema, indexes
/// and locally declared relation edges.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    /// Logical name used by clients.
    pub alias: String,

    /// Physical table name.
    pub name: String,

    pub schema: TableSchema,

    pub indexes: Vec<Index>,

    /// Relations declared by this table, keyed by their exposed alias.
    pub relations: IndexMap<String, RelationEdge>,
}

impl TableDef {
    pub fn new(alias: impl Into<String>, name: impl Into<String>, schema: TableSchema) -> TableDef {
        TableDef {
            alias: alias.into(),
            name: name.into(),
            schema,
            indexes: vec![],
            relations: IndexMap::new(),
        }
    }

    pub fn with_index(mut self, index: Index) -> TableDef {
        self.indexes.push(index);
        self
    }

    pub fn with_relation(mut self, edge: RelationEdge) -> TableDef {
        self.relations.insert(edge.target_alias.clone(), edge);
        self
    }

    pub fn primary_index(&self) -> Option<&Index> {
        self.indexes
            .iter()
            .find(|index| index.kind == IndexKind::Primary)
    }

    /// The primary or unique index whose columns are exactly `fields`.
    pub fn unique_index_covering(&self, fields: &[&str]) -> Option<&Index> {
        self.indexes
            .iter()
            .filter(|index| index.is_unique())
            .find(|index| index.covers(fields))
    }

}

/// The read-only table repository shared by every client call.
///
/// Built once at client construction; the flat relation map is the transitive
/// expansion of each table's local declarations, keyed by `"table.alias"`.
#[derive(Debug, Default)]
pub struct Repository {
    tables: IndexMap<String, TableDef>,
    relations: HashMap<String, RelationEdge>,
}

impl Repository {
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::default()
    }

    pub fn table(&self, alias: &str) -> Result<&TableDef> {
        self.tables
            .get(alias)
            .ok_or_else(|| Error::construction(format!("unknown table `{alias}`")))
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    /// Look up a relation edge by declaring table and exposed alias.
    pub fn relation(&self, table: &str, alias: &str) -> Option<&RelationEdge> {
        self.relations.get(&format!("{table}.{alias}"))
    }

    pub fn relations(&self) -> &HashMap<String, RelationEdge> {
        &self.relations
    }
}

#[derive(Debug, Default)]
pub struct RepositoryBuilder {
    tables: IndexMap<String, TableDef>,
}

impl RepositoryBuilder {
    pub fn table(mut self, def: TableDef) -> RepositoryBuilder {
        self.tables.insert(def.alias.clone(), def);
        self
    }

    /// Verify every edge endpoint and expand the relation graph into the
    /// flat map. Expansion walks transitively from each table; a
    /// `(table, alias)` pair already visited is not re-expanded, which keeps
    /// cyclic graphs (a → b → a) from looping.
    pub fn build(self) -> Result<Repository> {
        let mut relations = HashMap::new();

        for def in self.tables.values() {
            let mut visited: HashSet<(String, String)> = HashSet::new();
            let mut pending: Vec<&TableDef> = vec![def];

            while let Some(table) = pending.pop() {
                for edge in table.relations.values() {
                    let key = (table.alias.clone(), edge.target_alias.clone());
                    if !visited.insert(key) {
                        continue;
                    }

                    self.verify_edge(table, edge)?;
                    relations.entry(edge.key()).or_insert_with(|| edge.clone());

                    if let Some(related) = self.tables.get(&edge.source_table) {
                        pending.push(related);
                    }
                }
            }
        }

        Ok(Repository {
            tables: self.tables,
            relations,
        })
    }

    fn verify_edge(&self, table: &TableDef, edge: &RelationEdge) -> Result<()> {
        if edge.target_table != table.alias {
            return Err(Error::construction(format!(
                "relation `{}` declared on `{}` names `{}` as its target table",
                edge.target_alias, table.alias, edge.target_table
            )));
        }
        if table.schema.field(&edge.target_column).is_none() {
            return Err(Error::construction(format!(
                "relation `{}`: `{}` has no column `{}`",
                edge.target_alias, table.alias, edge.target_column
            )));
        }

        let source = self.tables.get(&edge.source_table).ok_or_else(|| {
            Error::construction(format!(
                "relation `{}` references unknown table `{}`",
                edge.target_alias, edge.source_table
            ))
        })?;
        if source.schema.field(&edge.source_column).is_none() {
            return Err(Error::construction(format!(
                "relation `{}`: `{}` has no column `{}`",
                edge.target_alias, edge.source_table, edge.source_column
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, IndexKind, TableSchema};

    fn edge(from: &str, from_col: &str, to: &str, to_col: &str, alias: &str) -> RelationEdge {
        RelationEdge {
            source_table: from.to_string(),
            source_column: from_col.to_string(),
            source_index: Some(IndexKind::Primary),
            target_table: to.to_string(),
            target_column: to_col.to_string(),
            target_index: None,
            target_alias: alias.to_string(),
        }
    }

    #[test]
    fn cyclic_relation_graphs_build_once_per_edge() {
        // a -> b and b -> a; expansion must terminate and register both.
        let a = TableDef::new(
            "a",
            "a",
            TableSchema::new([("id", FieldSchema::string()), ("b_id", FieldSchema::string())]),
        )
        .with_relation(edge("b", "id", "a", "b_id", "b"));

        let b = TableDef::new(
            "b",
            "b",
            TableSchema::new([("id", FieldSchema::string()), ("a_id", FieldSchema::string())]),
        )
        .with_relation(edge("a", "id", "b", "a_id", "a"));

        let repo = Repository::builder().table(a).table(b).build().unwrap();

        assert_eq!(repo.relations().len(), 2);
        assert!(repo.relation("a", "b").is_some());
        assert!(repo.relation("b", "a").is_some());
        assert!(repo.relation("a", "missing").is_none());
    }

    #[test]
    fn edges_referencing_unknown_tables_or_columns_are_rejected() {
        let a = TableDef::new(
            "a",
            "a",
            TableSchema::new([("id", FieldSchema::string()), ("b_id", FieldSchema::string())]),
        )
        .with_relation(edge("nope", "id", "a", "b_id", "b"));

        assert!(Repository::builder().table(a).build().is_err());

        let a = TableDef::new(
            "a",
            "a",
            TableSchema::new([("id", FieldSchema::string())]),
        )
        .with_relation(edge("a", "id", "a", "missing_col", "self_ref"));

        assert!(Repository::builder().table(a).build().is_err());
    }
}
