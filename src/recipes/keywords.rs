//! keywords.csv: plot keywords per movie

use crate::melt::types::{Rowset, Table};
use crate::melt::TableBuilder;
use crate::schema::DocumentKind;

use super::{exploded_rows, keyed_by_movie, MOVIE_KEY};

/// keywords and movie_keywords
pub fn transform(source: &Rowset) -> Vec<Table> {
    let exploded = exploded_rows(source, "keywords", DocumentKind::IdName, "keyword");

    let keywords = TableBuilder::entity("keywords", &["id"])
        .fields(&[("id", "keyword.id"), ("name", "keyword.name")])
        .build(&exploded);

    let movie_keywords = TableBuilder::bridge("movie_keywords", &["movie_id"])
        .fields(&[("movie_id", MOVIE_KEY), ("keyword_id", "keyword.id")])
        .build(&keyed_by_movie(exploded));

    vec![keywords, movie_keywords]
}
