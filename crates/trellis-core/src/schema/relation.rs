use super::IndexKind;

use serde::{Deserialize, Serialize};

/// A directed relation edge, declared by and keyed under the owning table.
///
/// An edge stored under `"x.alias"` says: table `x`'s column `target_column`
/// is linked to `source_table`'s column `source_column`, and the related
/// record is exposed on `x` under `target_alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// The related table (the far side of the edge).
    pub source_table: String,

    /// Join column on the related table.
    pub source_column: String,

    /// Kind of the index covering `source_column`, if any.
    pub source_index: Option<IndexKind>,

    /// The declaring table (the near side of the edge).
    pub target_table: String,

    /// Join column on the declaring table.
    pub target_column: String,

    /// Kind of the index covering `target_column`, if any.
    pub target_index: Option<IndexKind>,

    /// Name under which the relation is exposed on the declaring table.
    pub target_alias: String,
}

/// Which side of an edge physically stores the foreign-key value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The related table's `source_column` holds the FK.
    Source,
    /// The declaring table's `target_column` holds the FK.
    Target,
}

/// Whether an edge yields at most one related row or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl RelationEdge {
    /// Map key for the flat relation repository.
    pub fn key(&self) -> String {
        format!("{}.{}", self.target_table, self.target_alias)
    }

    pub fn key_holder(&self) -> Side {
        fk_holder(self.source_index, self.target_index)
    }

    /// A unique source index means at most one related row per key value.
    pub fn cardinality(&self) -> Cardinality {
        match self.source_index {
            Some(IndexKind::Primary) | Some(IndexKind::Unique) => Cardinality::One,
            _ => Cardinality::Many,
        }
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality() == Cardinality::Many
    }
}

/// Decide which side of a relation edge holds the foreign-key column.
///
/// The holder is the side whose index carries less ownership weight:
/// Primary outranks Unique outranks None outranks Secondary, and the lower
/// rank stores the FK. Ties go to the declaring (target) side, so swapping
/// the operands always selects the complementary physical table.
pub fn fk_holder(source: Option<IndexKind>, target: Option<IndexKind>) -> Side {
    fn rank(kind: Option<IndexKind>) -> u8 {
        match kind {
            Some(IndexKind::Primary) => 3,
            Some(IndexKind::Unique) => 2,
            None | Some(IndexKind::Ttl) => 1,
            Some(IndexKind::Secondary) => 0,
        }
    }

    if rank(source) < rank(target) {
        Side::Source
    } else {
        Side::Target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use IndexKind::*;

    const KINDS: [Option<IndexKind>; 4] = [Some(Primary), Some(Unique), Some(Secondary), None];

    #[test]
    fn holder_rule_is_total_and_swap_complementary() {
        for source in KINDS {
            for target in KINDS {
                let forward = fk_holder(source, target);
                let backward = fk_holder(target, source);

                // Exactly one side is picked, and flipping the operands flips
                // the selected physical table.
                match (forward, backward) {
                    (Side::Source, Side::Target) | (Side::Target, Side::Source) => {}
                    // Equal-rank pairs resolve to the declaring side both
                    // ways, which is the complementary table after a swap.
                    (Side::Target, Side::Target) => {}
                    other => panic!("asymmetric holder for {source:?}/{target:?}: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn primary_never_holds_against_non_primary() {
        assert_eq!(fk_holder(Some(Primary), Some(Secondary)), Side::Target);
        assert_eq!(fk_holder(Some(Primary), None), Side::Target);
        assert_eq!(fk_holder(Some(Secondary), Some(Primary)), Side::Source);
        assert_eq!(fk_holder(None, Some(Primary)), Side::Source);
    }

    #[test]
    fn unique_holds_against_primary() {
        assert_eq!(fk_holder(Some(Unique), Some(Primary)), Side::Source);
        assert_eq!(fk_holder(Some(Primary), Some(Unique)), Side::Target);
    }

    #[test]
    fn secondary_holds_against_everything() {
        assert_eq!(fk_holder(Some(Secondary), Some(Unique)), Side::Source);
        assert_eq!(fk_holder(Some(Secondary), None), Side::Source);
        assert_eq!(fk_holder(Some(Unique), Some(Secondary)), Side::Target);
        assert_eq!(fk_holder(None, Some(Secondary)), Side::Target);
    }

    #[test]
    fn declared_side_wins_ties() {
        assert_eq!(fk_holder(Some(Unique), Some(Unique)), Side::Target);
        assert_eq!(fk_holder(Some(Primary), Some(Primary)), Side::Target);
        assert_eq!(fk_holder(None, None), Side::Target);
    }

    #[test]
    fn cardinality_follows_source_index() {
        let mut edge = RelationEdge {
            source_table: "b".into(),
            source_column: "id".into(),
            source_index: Some(Primary),
            target_table: "a".into(),
            target_column: "b_id".into(),
            target_index: None,
            target_alias: "b".into(),
        };
        assert_eq!(edge.cardinality(), Cardinality::One);

        edge.source_index = Some(Secondary);
        assert_eq!(edge.cardinality(), Cardinality::Many);
    }
}
