//! # cinemelt - movie dataset normalizer
//!
//! Turns the denormalized movie dataset (CSV files whose columns embed JSON
//! sub-documents) into a relational export: one table per entity and one
//! bridge table per many-to-many relationship, each written as gzip-compressed
//! JSON Lines.
//!
//! ## Modules
//!
//! - **schema**: declared shapes of the embedded sub-documents
//! - **melt**: decoding, coercion, table assembly and the sink
//! - **recipes**: the per-file transforms
//! - **source** / **pipeline**: reading sources and running the recipes
//!
//! ## Quick Start
//!
//! ```rust
//! use cinemelt::melt::{Cell, Rowset, TableBuilder, ShapeDecoder};
//! use cinemelt::schema::{shape_for, DocumentKind};
//!
//! let source = Rowset::new(
//!     vec!["id".to_string(), "genres".to_string()],
//!     vec![vec![
//!         ("id", Cell::text("862")),
//!         ("genres", Cell::text("[{'id': 16, 'name': 'Animation'}]")),
//!     ]
//!     .into_iter()
//!     .collect()],
//! );
//!
//! let decoder = ShapeDecoder::new(shape_for(DocumentKind::IdName));
//! let rows: Vec<_> = decoder
//!     .explode(&source.rows, "id", "genres")
//!     .into_iter()
//!     .map(|e| e.into_row("id", "genre"))
//!     .collect();
//!
//! let genres = TableBuilder::entity("genres", &["id"])
//!     .fields(&[("id", "genre.id"), ("name", "genre.name")])
//!     .build(&rows);
//!
//! assert_eq!(genres.rows[0].get("name"), &Cell::text("Animation"));
//! ```

pub mod config;
pub mod error;
pub mod melt;
pub mod pipeline;
pub mod recipes;
pub mod schema;
pub mod source;

// Re-export commonly used types for convenience
pub use config::{Config, SourceSet};
pub use error::{CinemeltError, Result};
pub use melt::{Cell, GzJsonSink, Row, Rowset, ShapeDecoder, SinkWriter, Table, TableBuilder};
pub use pipeline::{Pipeline, WrittenTable};
pub use recipes::Recipe;
pub use schema::{shape_for, DocumentKind, SemanticType, Shape};
pub use source::{CsvSource, SourceReader};

/// Main entry point: read every source named by `config`, normalize it and
/// write all tables under the configured destination
pub fn process_all(config: &Config) -> Result<Vec<WrittenTable>> {
    Pipeline::new(config.clone(), CsvSource::new(), GzJsonSink::new()).run()
}
