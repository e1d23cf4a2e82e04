//! ratings.csv / ratings_small.csv: user ratings of movies

use std::path::Path;

use crate::melt::coerce::coerce_columns;
use crate::melt::types::{Rowset, Table};
use crate::melt::TableBuilder;
use crate::schema::SemanticType;

use super::table_name_for;

/// ratings or ratings_small, depending on the source file
pub fn transform(locator: &Path, source: Rowset) -> Table {
    let rows = coerce_columns(
        source.rows,
        &[
            ("userId", SemanticType::Integer),
            ("movieId", SemanticType::Integer),
            ("rating", SemanticType::Float),
            ("timestamp", SemanticType::Timestamp),
        ],
    );

    TableBuilder::fact(table_name_for(locator, "ratings", "ratings_small"), &["user_id", "movie_id"])
        .fields(&[
            ("user_id", "userId"),
            ("movie_id", "movieId"),
            ("rating", "rating"),
            ("timestamp", "timestamp"),
        ])
        .build(&rows)
}
