//! Relational normalization of denormalized rows
//!
//! This module turns flat rows carrying embedded JSON sub-documents into
//! entity and bridge tables: shape-guided decoding and exploding, type
//! coercion with identifier filtering, and deterministic table assembly.

pub mod types;
pub mod decoder;
pub mod coerce;
pub mod table;
pub mod writer;

pub use types::{Cell, Column, Row, Rowset, Table, TableKind};
pub use decoder::{Decoded, Exploded, ShapeDecoder};
pub use coerce::{cast, cast_text, is_valid_identifier, is_valid_key};
pub use table::{distinct, project, sort_by, sort_most_complete_first, unique_by_key, FieldMap, TableBuilder};
pub use writer::{destination_for, GzJsonSink, RecordWriter, SinkWriter};
