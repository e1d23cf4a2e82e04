//! credits.csv: cast and crew credits per movie

use crate::melt::coerce::retain_valid_keys;
use crate::melt::types::{Rowset, Table};
use crate::melt::TableBuilder;
use crate::schema::DocumentKind;

use super::{exploded_rows, keyed_by_movie, MOVIE_KEY};

/// movie_characters, actors, movie_crews and crews
pub fn transform(source: &Rowset) -> Vec<Table> {
    let cast = exploded_rows(source, "cast", DocumentKind::CastCredit, "cast");
    let crew = exploded_rows(source, "crew", DocumentKind::CrewCredit, "crew");

    let movie_characters = TableBuilder::bridge("movie_characters", &["movie_id"])
        .fields(&[
            ("movie_id", MOVIE_KEY),
            ("cast_id", "cast.cast_id"),
            ("cast_order", "cast.order"),
            ("character", "cast.character"),
            ("gender", "cast.gender"),
            ("actor_id", "cast.id"),
        ])
        .build(&keyed_by_movie(cast.clone()));

    let actors = TableBuilder::entity("actors", &["id"])
        .fields(&[
            ("id", "cast.id"),
            ("name", "cast.name"),
            ("profile_path", "cast.profile_path"),
        ])
        .build(&retain_valid_keys(cast, "cast.id"));

    let movie_crews = TableBuilder::bridge("movie_crews", &["movie_id"])
        .fields(&[
            ("movie_id", MOVIE_KEY),
            ("department", "crew.department"),
            ("credit_id", "crew.credit_id"),
            ("crew_id", "crew.id"),
        ])
        .build(&keyed_by_movie(crew.clone()));

    let crews = TableBuilder::entity("crews", &["id"])
        .fields(&[
            ("id", "crew.id"),
            ("name", "crew.name"),
            ("profile_path", "crew.profile_path"),
        ])
        .build(&retain_valid_keys(crew, "crew.id"));

    vec![movie_characters, actors, movie_crews, crews]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melt::types::{Cell, Row};

    fn credits_row(id: &str, cast: &str, crew: &str) -> Row {
        vec![
            ("cast", Cell::text(cast)),
            ("crew", Cell::text(crew)),
            ("id", Cell::text(id)),
        ]
        .into_iter()
        .collect()
    }

    fn source(rows: Vec<Row>) -> Rowset {
        Rowset::new(vec!["cast".into(), "crew".into(), "id".into()], rows)
    }

    #[test]
    fn test_woody() {
        let tables = transform(&source(vec![credits_row(
            "862",
            r#"[{"cast_id":1,"character":"Woody","credit_id":"x","gender":2,"id":31,"name":"Tom Hanks","order":"0","profile_path":"/a.jpg"}]"#,
            "[]",
        )]));

        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["movie_characters", "actors", "movie_crews", "crews"]);

        let characters = &tables[0];
        assert_eq!(characters.len(), 1);
        let expected: Row = vec![
            ("movie_id", Cell::Int(862)),
            ("cast_id", Cell::Int(1)),
            ("cast_order", Cell::text("0")),
            ("character", Cell::text("Woody")),
            ("gender", Cell::Int(2)),
            ("actor_id", Cell::Int(31)),
        ]
        .into_iter()
        .collect();
        assert_eq!(characters.rows[0], expected);

        let actors = &tables[1];
        let expected: Row = vec![
            ("id", Cell::Int(31)),
            ("name", Cell::text("Tom Hanks")),
            ("profile_path", Cell::text("/a.jpg")),
        ]
        .into_iter()
        .collect();
        assert_eq!(actors.rows, vec![expected]);

        assert!(tables[2].is_empty());
        assert!(tables[3].is_empty());
    }

    #[test]
    fn test_invalid_movie_key_only_drops_bridge_rows() {
        let tables = transform(&source(vec![credits_row(
            "1997-08-20",
            r#"[{"id": 31, "name": "Tom Hanks"}]"#,
            r#"[{"id": 7879, "name": "John Lasseter", "department": "Directing", "credit_id": "c"}]"#,
        )]));

        assert!(tables[0].is_empty());
        assert_eq!(tables[1].len(), 1);
        assert!(tables[2].is_empty());
        assert_eq!(tables[3].len(), 1);
    }

    #[test]
    fn test_actors_deduplicated_across_movies() {
        let hanks = r#"[{"cast_id": 14, "id": 31, "name": "Tom Hanks"}]"#;
        let tables = transform(&source(vec![
            credits_row("862", hanks, "[]"),
            credits_row("863", hanks, "[]"),
            credits_row("13", hanks, "[]"),
        ]));

        assert_eq!(tables[0].len(), 3);
        assert_eq!(
            tables[0].column("movie_id"),
            vec![&Cell::Int(13), &Cell::Int(862), &Cell::Int(863)]
        );
        assert_eq!(tables[1].len(), 1);
    }

    #[test]
    fn test_sparse_credit_does_not_erase_actor_details() {
        let tables = transform(&source(vec![
            credits_row("862", r#"[{"id": 31, "name": "Tom Hanks", "profile_path": "/a.jpg"}]"#, "[]"),
            credits_row("863", r#"[{"id": 31}]"#, "[]"),
        ]));

        let actors = &tables[1];
        assert_eq!(actors.len(), 1);
        assert_eq!(actors.rows[0].get("name"), &Cell::text("Tom Hanks"));
        assert_eq!(actors.rows[0].get("profile_path"), &Cell::text("/a.jpg"));
    }

    #[test]
    fn test_credit_without_id_is_not_an_actor() {
        let tables = transform(&source(vec![credits_row(
            "862",
            r#"[{"cast_id": 1, "name": "Unknown"}]"#,
            "not json",
        )]));

        assert_eq!(tables[0].len(), 1);
        assert!(tables[0].rows[0].get("actor_id").is_missing());
        assert!(tables[1].is_empty());
        assert!(tables[2].is_empty());
    }
}
