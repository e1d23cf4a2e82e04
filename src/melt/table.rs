//! Assembly of final output tables
//!
//! Every table goes through the same steps: project the intermediate rows,
//! deduplicate when the table holds entities, then sort by the table key.
//! Sorting breaks key ties by the whole row, so the output never depends on
//! the order rows arrived in. Entity tables keep one row per key, the variant
//! with the most filled cells.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::melt::types::{Column, Row, Table, TableKind};

/// Output column name paired with the intermediate column it is read from
pub type FieldMap<'a> = [(&'a str, &'a str)];

/// Select and rename columns; input columns that are absent read as missing
pub fn project(rows: &[Row], fields: &FieldMap<'_>) -> Vec<Row> {
    let outputs: Vec<Column> = fields.iter().map(|(output, _)| Column::from(*output)).collect();
    rows.iter()
        .map(|row| {
            outputs
                .iter()
                .zip(fields)
                .map(|(output, (_, input))| (output.clone(), row.get(input).clone()))
                .collect()
        })
        .collect()
}

/// Drop rows equal to an earlier row, keeping first occurrences in order
pub fn distinct(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

fn key_order(a: &Row, b: &Row, key: &[&str]) -> Ordering {
    key.iter()
        .map(|column| a.get(column).cmp(b.get(column)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sort ascending by the key columns, then by the whole row
pub fn sort_by(mut rows: Vec<Row>, key: &[&str]) -> Vec<Row> {
    rows.sort_by(|a, b| key_order(a, b, key).then_with(|| a.cmp(b)));
    rows
}

/// Sort by the key columns; within a key the row with the most filled
/// cells comes first, then the whole row decides
pub fn sort_most_complete_first(mut rows: Vec<Row>, key: &[&str]) -> Vec<Row> {
    rows.sort_by(|a, b| {
        key_order(a, b, key)
            .then_with(|| b.filled().cmp(&a.filled()))
            .then_with(|| a.cmp(b))
    });
    rows
}

/// Keep the first row of each run of equal keys
///
/// Expects rows grouped by `key`; the result holds one row per key.
pub fn unique_by_key(mut rows: Vec<Row>, key: &[&str]) -> Vec<Row> {
    rows.dedup_by(|later, earlier| key.iter().all(|column| later.get(column) == earlier.get(column)));
    rows
}

/// Recipe for one output table
#[derive(Debug, Clone)]
pub struct TableBuilder<'a> {
    name: &'a str,
    kind: TableKind,
    key: &'a [&'a str],
    fields: &'a FieldMap<'a>,
}

impl<'a> TableBuilder<'a> {
    /// Deduplicated table with one row per key; rows missing a key are dropped
    pub fn entity(name: &'a str, key: &'a [&'a str]) -> Self {
        Self::new(name, TableKind::Entity, key)
    }

    /// Relationship table, multiplicity kept
    pub fn bridge(name: &'a str, key: &'a [&'a str]) -> Self {
        Self::new(name, TableKind::Bridge, key)
    }

    /// One row per source record
    pub fn fact(name: &'a str, key: &'a [&'a str]) -> Self {
        Self::new(name, TableKind::Fact, key)
    }

    fn new(name: &'a str, kind: TableKind, key: &'a [&'a str]) -> Self {
        TableBuilder {
            name,
            kind,
            key,
            fields: &[],
        }
    }

    pub fn fields(mut self, fields: &'a FieldMap<'a>) -> Self {
        self.fields = fields;
        self
    }

    /// Project, deduplicate and sort `rows` into the finished table
    pub fn build(&self, rows: &[Row]) -> Table {
        let projected = project(rows, self.fields);

        let rows = match self.kind {
            TableKind::Entity => {
                let mut rows = distinct(projected);
                rows.retain(|row| self.key.iter().all(|column| !row.get(column).is_missing()));
                unique_by_key(sort_most_complete_first(rows, self.key), self.key)
            }
            TableKind::Bridge | TableKind::Fact => sort_by(projected, self.key),
        };

        Table {
            name: self.name.to_string(),
            kind: self.kind,
            columns: self.fields.iter().map(|(output, _)| output.to_string()).collect(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melt::types::Cell;

    fn actor(id: i64, name: &str) -> Row {
        vec![("cast.id", Cell::Int(id)), ("cast.name", Cell::text(name))]
            .into_iter()
            .collect()
    }

    const ACTOR_FIELDS: &FieldMap<'static> = &[("id", "cast.id"), ("name", "cast.name")];

    #[test]
    fn test_project_renames_and_orders() {
        let rows = project(&[actor(31, "Tom Hanks")], &[("name", "cast.name"), ("id", "cast.id"), ("x", "nope")]);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["name", "id", "x"]);
        assert_eq!(rows[0].get("id"), &Cell::Int(31));
        assert!(rows[0].get("x").is_missing());
    }

    #[test]
    fn test_distinct_is_idempotent() {
        let rows = vec![actor(1, "a"), actor(2, "b"), actor(1, "a"), actor(2, "b"), actor(3, "c")];
        let once = distinct(rows);
        assert_eq!(once.len(), 3);
        assert_eq!(distinct(once.clone()), once);
    }

    #[test]
    fn test_sort_independent_of_arrival_order() {
        let forward = vec![actor(2, "b"), actor(1, "z"), actor(1, "a")];
        let mut backward = forward.clone();
        backward.reverse();

        let key = ["cast.id"];
        assert_eq!(sort_by(forward, &key), sort_by(backward, &key));
    }

    #[test]
    fn test_entity_one_row_per_key() {
        let rows = vec![actor(31, "Tom Hanks"), actor(12, "b"), actor(31, "Tom Hanks"), actor(31, "T. Hanks")];
        let table = TableBuilder::entity("actors", &["id"]).fields(ACTOR_FIELDS).build(&rows);

        assert_eq!(table.kind, TableKind::Entity);
        assert_eq!(table.columns, vec!["id", "name"]);
        assert_eq!(table.column("id"), vec![&Cell::Int(12), &Cell::Int(31)]);
        assert_eq!(table.rows[1].get("name"), &Cell::text("T. Hanks"));
    }

    #[test]
    fn test_entity_keeps_most_complete_variant() {
        let sparse: Row = vec![("cast.id", Cell::Int(31)), ("cast.name", Cell::Missing)]
            .into_iter()
            .collect();
        let rows = vec![sparse.clone(), actor(31, "Tom Hanks"), sparse];
        let table = TableBuilder::entity("actors", &["id"]).fields(ACTOR_FIELDS).build(&rows);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].get("name"), &Cell::text("Tom Hanks"));
    }

    #[test]
    fn test_entity_drops_missing_keys() {
        let rows = vec![
            vec![("cast.id", Cell::Missing), ("cast.name", Cell::text("ghost"))]
                .into_iter()
                .collect(),
            actor(5, "e"),
        ];
        let table = TableBuilder::entity("actors", &["id"]).fields(ACTOR_FIELDS).build(&rows);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bridge_keeps_multiplicity() {
        let rows = vec![actor(2, "x"), actor(1, "x"), actor(2, "x")];
        let table = TableBuilder::bridge("pairs", &["id"]).fields(ACTOR_FIELDS).build(&rows);
        assert_eq!(table.column("id"), vec![&Cell::Int(1), &Cell::Int(2), &Cell::Int(2)]);
    }
}
