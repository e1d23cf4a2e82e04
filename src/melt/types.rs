use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::schema::SemanticType;

/// Rendering used for timestamps in text casts and in written records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

static MISSING: Cell = Cell::Missing;

/// A single value in a row: either typed data or the explicit missing marker
#[derive(Debug, Clone)]
pub enum Cell {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The semantic type carried by this cell, `None` when missing
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Cell::Missing => None,
            Cell::Bool(_) => Some(SemanticType::Boolean),
            Cell::Int(_) => Some(SemanticType::Integer),
            Cell::Float(_) => Some(SemanticType::Float),
            Cell::Text(_) => Some(SemanticType::Text),
            Cell::Timestamp(_) => Some(SemanticType::Timestamp),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Missing => 0,
            Cell::Bool(_) => 1,
            Cell::Int(_) => 2,
            Cell::Float(_) => 3,
            Cell::Text(_) => 4,
            Cell::Timestamp(_) => 5,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
            Cell::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
        }
    }
}

// Missing sorts before every value; cells of different types order by type.
impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cell::Missing, Cell::Missing) => Ordering::Equal,
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Float(a), Cell::Float(b)) => a.total_cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Timestamp(a), Cell::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Cell::Missing => {}
            Cell::Bool(b) => b.hash(state),
            Cell::Int(i) => i.hash(state),
            Cell::Float(x) => x.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Timestamp(t) => t.hash(state),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Missing => serializer.serialize_none(),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(x) => serializer.serialize_f32(*x),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Timestamp(t) => serializer.collect_str(&t.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// Shared column name; rows read from one source share their header's names
pub type Column = Arc<str>;

/// One record: column name to cell, in column order
///
/// Equality, ordering and hashing follow the column order, so two rows with
/// the same cells under the same columns compare equal.
#[derive(Debug, Clone, Default)]
pub struct Row(IndexMap<Column, Cell>);

impl Row {
    pub fn new() -> Self {
        Row(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row(IndexMap::with_capacity(capacity))
    }

    /// Set a column, keeping its position when it already exists
    pub fn insert(&mut self, column: impl Into<Column>, cell: Cell) {
        self.0.insert(column.into(), cell);
    }

    /// Value of a column; absent columns read as missing
    pub fn get(&self, column: &str) -> &Cell {
        self.0.get(column).unwrap_or(&MISSING)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Cell> {
        self.0.get_mut(column)
    }

    /// Number of cells holding a value
    pub fn filled(&self) -> usize {
        self.0.values().filter(|cell| !cell.is_missing()).count()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| &**k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.0.iter().map(|(k, v)| (&**k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<Column>> FromIterator<(K, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for Row {
    type Item = (Column, Cell);
    type IntoIter = indexmap::map::IntoIter<Column, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Row {}

impl Ord for Row {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().cmp(other.0.iter())
    }
}

impl PartialOrd for Row {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for (column, cell) in &self.0 {
            column.hash(state);
            cell.hash(state);
        }
    }
}

/// Rows serialize as JSON objects with missing columns left out
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.filled()))?;
        for (column, cell) in &self.0 {
            if !cell.is_missing() {
                map.serialize_entry(&**column, cell)?;
            }
        }
        map.end()
    }
}

/// Raw rows read from a source, all cells text or missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rowset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Rowset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Rowset { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// How a finished table was assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Deduplicated, one row per key
    Entity,
    /// Parent/child key pairs, multiplicity kept
    Bridge,
    /// One row per source record
    Fact,
}

/// A finalized output table, ready for the sink
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub kind: TableKind,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, in row order
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        self.rows.iter().map(|r| r.get(name)).collect()
    }
}
