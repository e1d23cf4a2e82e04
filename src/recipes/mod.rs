//! Per-file transforms
//!
//! Each recipe is a fixed, top-to-bottom composition of the melt stages:
//! decode/explode, coerce and filter, then [`TableBuilder`] projection,
//! deduplication and sorting. Recipes are pure functions of their input rows.
//!
//! [`TableBuilder`]: crate::melt::TableBuilder

pub mod credits;
pub mod keywords;
pub mod links;
pub mod movies;
pub mod ratings;

use std::path::Path;

use crate::melt::coerce::{coerce_column, retain_valid_keys};
use crate::melt::types::{Row, Rowset, Table};
use crate::melt::ShapeDecoder;
use crate::schema::{shape_for, DocumentKind, SemanticType};

/// Column holding the movie identifier in credits, keywords and movies files
pub(crate) const MOVIE_KEY: &str = "id";

/// The source file kinds, each with its own set of output tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    Credits,
    Keywords,
    Links,
    Ratings,
    Movies,
}

impl Recipe {
    pub fn name(self) -> &'static str {
        match self {
            Recipe::Credits => "credits",
            Recipe::Keywords => "keywords",
            Recipe::Links => "links",
            Recipe::Ratings => "ratings",
            Recipe::Movies => "movies",
        }
    }

    /// Build this recipe's output tables; `locator` picks the table name for
    /// links and ratings. Recipes that cast source columns consume the rows.
    pub fn transform(self, locator: &Path, source: Rowset) -> Vec<Table> {
        match self {
            Recipe::Credits => credits::transform(&source),
            Recipe::Keywords => keywords::transform(&source),
            Recipe::Links => vec![links::transform(locator, source)],
            Recipe::Ratings => vec![ratings::transform(locator, source)],
            Recipe::Movies => movies::transform(source),
        }
    }
}

/// `full` when the locator names `<full>.csv`, otherwise `small`
pub(crate) fn table_name_for(locator: &Path, full: &'static str, small: &'static str) -> &'static str {
    if locator.to_string_lossy().ends_with(&format!("{}.csv", full)) {
        full
    } else {
        small
    }
}

/// Explode `column` into flat rows: the movie key plus `<prefix>.<field>`
pub(crate) fn exploded_rows(source: &Rowset, column: &str, kind: DocumentKind, prefix: &str) -> Vec<Row> {
    ShapeDecoder::new(shape_for(kind))
        .explode(&source.rows, MOVIE_KEY, column)
        .into_iter()
        .map(|e| e.into_row(MOVIE_KEY, prefix))
        .collect()
}

/// Bridge parents: rows with a well-formed movie key, the key cast to integer
pub(crate) fn keyed_by_movie(rows: Vec<Row>) -> Vec<Row> {
    coerce_column(retain_valid_keys(rows, MOVIE_KEY), MOVIE_KEY, SemanticType::Integer)
}
