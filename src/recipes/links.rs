//! links.csv / links_small.csv: identifiers in external movie databases

use std::path::Path;

use crate::melt::coerce::coerce_columns;
use crate::melt::types::{Rowset, Table};
use crate::melt::TableBuilder;
use crate::schema::SemanticType;

use super::table_name_for;

/// links or links_small, depending on the source file
pub fn transform(locator: &Path, source: Rowset) -> Table {
    // imdbId stays text: its leading zeros are significant
    let rows = coerce_columns(
        source.rows,
        &[("movieId", SemanticType::Integer), ("tmdbId", SemanticType::Integer)],
    );

    TableBuilder::fact(table_name_for(locator, "links", "links_small"), &["movie_id"])
        .fields(&[("movie_id", "movieId"), ("imdb_id", "imdbId"), ("tmdb_id", "tmdbId")])
        .build(&rows)
}
