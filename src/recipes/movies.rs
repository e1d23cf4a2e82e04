//! movies_metadata.csv: the movies themselves plus genres, collections and
//! production companies

use crate::melt::coerce::{coerce_column, coerce_columns};
use crate::melt::types::{Row, Rowset, Table};
use crate::melt::{ShapeDecoder, TableBuilder};
use crate::schema::{shape_for, DocumentKind, SemanticType};

use super::{exploded_rows, keyed_by_movie, MOVIE_KEY};

/// Scalar columns copied into the movies table, with their casts
const MOVIE_COLUMNS: &[(&str, Option<SemanticType>)] = &[
    ("id", Some(SemanticType::Integer)),
    ("adult", None),
    ("budget", Some(SemanticType::Integer)),
    ("homepage", None),
    ("imdb_id", None),
    ("original_language", None),
    ("original_title", None),
    ("overview", None),
    ("popularity", None),
    ("poster_path", None),
    ("production_countries", None),
    ("release_date", None),
    ("revenue", Some(SemanticType::Float)),
    ("runtime", Some(SemanticType::Integer)),
    ("spoken_languages", None),
    ("status", None),
    ("tagline", None),
    ("title", None),
    ("video", None),
    ("vote_average", Some(SemanticType::Float)),
    ("vote_count", Some(SemanticType::Integer)),
];

/// genres, collections, production_companies, movie_collections,
/// movie_genres, movie_production_companies and movies
pub fn transform(source: Rowset) -> Vec<Table> {
    let genres = exploded_rows(&source, "genres", DocumentKind::IdName, "genre");
    let companies = exploded_rows(
        &source,
        "production_companies",
        DocumentKind::IdName,
        "company",
    );
    let collections = collection_rows(&source);

    let mut tables = vec![
        TableBuilder::entity("genres", &["id"])
            .fields(&[("id", "genre.id"), ("name", "genre.name")])
            .build(&genres),
        TableBuilder::entity("collections", &["id"])
            .fields(&[
                ("id", "collection.id"),
                ("name", "collection.name"),
                ("poster_path", "collection.poster_path"),
                ("backdrop_path", "collection.backdrop_path"),
            ])
            .build(&collections),
        TableBuilder::entity("production_companies", &["id"])
            .fields(&[("id", "company.id"), ("name", "company.name")])
            .build(&companies),
        TableBuilder::bridge("movie_collections", &["movie_id"])
            .fields(&[("movie_id", MOVIE_KEY), ("collection_id", "collection.id")])
            .build(&keyed_by_movie(collections)),
        TableBuilder::bridge("movie_genres", &["movie_id"])
            .fields(&[("movie_id", MOVIE_KEY), ("genre_id", "genre.id")])
            .build(&keyed_by_movie(genres)),
        TableBuilder::bridge("movie_production_companies", &["movie_id"])
            .fields(&[
                ("movie_id", MOVIE_KEY),
                ("production_company_id", "company.id"),
            ])
            .build(&keyed_by_movie(companies)),
    ];
    tables.push(movies_table(source));
    tables
}

/// One row per movie: the movie key and its decoded collection, whose fields
/// are all missing when the movie belongs to none
fn collection_rows(source: &Rowset) -> Vec<Row> {
    let decoder = ShapeDecoder::new(shape_for(DocumentKind::Collection));
    source
        .rows
        .iter()
        .map(|row| {
            let decoded = decoder.decode(row.get("belongs_to_collection"));
            let mut flat = Row::with_capacity(decoder.shape().fields.len() + 1);
            flat.insert(MOVIE_KEY, row.get(MOVIE_KEY).clone());
            for field in decoder.shape().field_names() {
                flat.insert(format!("collection.{}", field), decoded.field(field));
            }
            flat
        })
        .collect()
}

fn movies_table(source: Rowset) -> Table {
    // budget is read as a float first so "1.5e7"-style values survive
    let rows = coerce_column(source.rows, "budget", SemanticType::Float);
    let casts: Vec<(&str, SemanticType)> = MOVIE_COLUMNS
        .iter()
        .filter_map(|(column, ty)| ty.map(|ty| (*column, ty)))
        .collect();
    let rows = coerce_columns(rows, &casts);

    let fields: Vec<(&str, &str)> = MOVIE_COLUMNS
        .iter()
        .map(|(column, _)| (*column, *column))
        .collect();

    TableBuilder::fact("movies", &["id"]).fields(&fields).build(&rows)
}
