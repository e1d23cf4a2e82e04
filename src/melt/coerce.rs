//! Total conversions from raw text to semantic types
//!
//! Every conversion here succeeds: malformed input becomes [`Cell::Missing`]
//! instead of an error, so one bad row never stops a bulk run.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::melt::types::{Cell, Row};
use crate::schema::SemanticType;

// Optional integer part, optional comma, optional integer part; "" matches.
static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]*,?[0-9]+|[0-9]+,?[0-9]*)?$").unwrap()
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

/// Whether a join key looks like an identifier
///
/// Comma-formatted numbers pass, as does the empty string.
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_REGEX.is_match(value)
}

/// Identifier check for a cell: text is matched as-is, other values by
/// their rendering, and a missing key never passes
pub fn is_valid_key(cell: &Cell) -> bool {
    match cell {
        Cell::Missing => false,
        Cell::Text(s) => is_valid_identifier(s),
        other => is_valid_identifier(&other.to_string()),
    }
}

/// Convert a cell to `ty`; a cell already of that type is returned unchanged
pub fn cast(cell: &Cell, ty: SemanticType) -> Cell {
    if cell.semantic_type() == Some(ty) {
        return cell.clone();
    }

    match (cell, ty) {
        (Cell::Missing, _) => Cell::Missing,
        (Cell::Text(s), ty) => cast_text(s, ty),
        (other, SemanticType::Text) => Cell::Text(other.to_string()),

        (Cell::Int(i), SemanticType::Float) => Cell::Float(*i as f32),
        (Cell::Int(i), SemanticType::Boolean) => Cell::Bool(*i != 0),
        (Cell::Int(i), SemanticType::Timestamp) => from_epoch_seconds(*i),

        // Saturating truncation, NaN becomes zero
        (Cell::Float(x), SemanticType::Integer) => Cell::Int(i64::from(*x as i32)),
        (Cell::Float(x), SemanticType::Boolean) => Cell::Bool(*x != 0.0),
        (Cell::Float(x), SemanticType::Timestamp) if x.is_finite() => {
            from_epoch_seconds(x.trunc() as i64)
        }

        (Cell::Bool(b), SemanticType::Integer) => Cell::Int(i64::from(*b)),
        (Cell::Bool(b), SemanticType::Float) => Cell::Float(if *b { 1.0 } else { 0.0 }),

        (Cell::Timestamp(t), SemanticType::Integer) => integer_in_range(t.timestamp()),
        (Cell::Timestamp(t), SemanticType::Float) => Cell::Float(t.timestamp() as f32),

        _ => Cell::Missing,
    }
}

/// Parse raw text as `ty`
pub fn cast_text(value: &str, ty: SemanticType) -> Cell {
    match ty {
        SemanticType::Text => Cell::text(value),
        SemanticType::Integer => parse_integer(value.trim()),
        SemanticType::Float => match value.trim().parse::<f32>() {
            Ok(x) => Cell::Float(x),
            Err(_) => Cell::Missing,
        },
        SemanticType::Boolean => parse_boolean(value.trim()),
        SemanticType::Timestamp => parse_timestamp(value.trim()),
    }
}

/// Apply a cast to one column of every row; rows without the column are
/// left as they are, since absent columns already read as missing
pub fn coerce_column(mut rows: Vec<Row>, column: &str, ty: SemanticType) -> Vec<Row> {
    for row in rows.iter_mut() {
        if let Some(cell) = row.get_mut(column) {
            *cell = cast(cell, ty);
        }
    }
    rows
}

/// Apply several column casts, in order
pub fn coerce_columns(rows: Vec<Row>, casts: &[(&str, SemanticType)]) -> Vec<Row> {
    casts
        .iter()
        .fold(rows, |rows, (column, ty)| coerce_column(rows, column, *ty))
}

/// Keep only rows whose `column` passes [`is_valid_key`]
pub fn retain_valid_keys(mut rows: Vec<Row>, column: &str) -> Vec<Row> {
    rows.retain(|row| is_valid_key(row.get(column)));
    rows
}

fn integer_in_range(value: i64) -> Cell {
    if i32::try_from(value).is_ok() {
        Cell::Int(value)
    } else {
        Cell::Missing
    }
}

fn parse_integer(value: &str) -> Cell {
    if let Ok(i) = value.parse::<i64>() {
        return integer_in_range(i);
    }

    // "90.0" truncates toward zero
    let Some((whole, fraction)) = value.split_once('.') else {
        return Cell::Missing;
    };
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Cell::Missing;
    }
    match whole {
        "" | "+" | "-" if !fraction.is_empty() => Cell::Int(0),
        _ => match whole.parse::<i64>() {
            Ok(i) => integer_in_range(i),
            Err(_) => Cell::Missing,
        },
    }
}

fn parse_boolean(value: &str) -> Cell {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Cell::Bool(true),
        "false" | "f" | "no" | "n" | "0" => Cell::Bool(false),
        _ => Cell::Missing,
    }
}

fn parse_timestamp(value: &str) -> Cell {
    if value.is_empty() {
        return Cell::Missing;
    }

    // Rating timestamps are Unix epoch seconds
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return match value.parse::<i64>() {
            Ok(secs) => from_epoch_seconds(secs),
            Err(_) => Cell::Missing,
        };
    }

    for format in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Cell::Timestamp(t.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(Cell::Missing, |t| Cell::Timestamp(t.and_utc()))
}

fn from_epoch_seconds(secs: i64) -> Cell {
    match DateTime::from_timestamp(secs, 0) {
        Some(t) => Cell::Timestamp(t),
        None => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_predicate() {
        assert!(is_valid_identifier(""));
        assert!(is_valid_identifier("12"));
        assert!(is_valid_identifier("12,34"));
        assert!(is_valid_identifier(",5"));
        assert!(is_valid_identifier("5,"));
        assert!(!is_valid_identifier("abc"));
        assert!(!is_valid_identifier("1997-08-20"));
        assert!(!is_valid_identifier("12,,34"));
        assert!(!is_valid_identifier(","));
    }

    #[test]
    fn test_key_cells() {
        assert!(is_valid_key(&Cell::Int(31)));
        assert!(is_valid_key(&Cell::text("862")));
        assert!(!is_valid_key(&Cell::Int(-4)));
        assert!(!is_valid_key(&Cell::Missing));
    }

    #[test]
    fn test_integer_cast() {
        assert_eq!(cast_text("862", SemanticType::Integer), Cell::Int(862));
        assert_eq!(cast_text(" 42 ", SemanticType::Integer), Cell::Int(42));
        assert_eq!(cast_text("81.0", SemanticType::Integer), Cell::Int(81));
        assert_eq!(cast_text("-3.9", SemanticType::Integer), Cell::Int(-3));
        assert_eq!(cast_text("1e3", SemanticType::Integer), Cell::Missing);
        assert_eq!(cast_text("9999999999", SemanticType::Integer), Cell::Missing);
        assert_eq!(cast_text("abc", SemanticType::Integer), Cell::Missing);
        assert_eq!(cast_text("", SemanticType::Integer), Cell::Missing);
    }

    #[test]
    fn test_float_cast() {
        assert_eq!(cast_text("7.7", SemanticType::Float), Cell::Float(7.7));
        assert_eq!(cast_text("five", SemanticType::Float), Cell::Missing);
        assert_eq!(cast(&Cell::Int(3), SemanticType::Float), Cell::Float(3.0));
    }

    #[test]
    fn test_budget_float_then_integer() {
        let budget = cast(&cast_text("30000000", SemanticType::Float), SemanticType::Integer);
        assert_eq!(budget, Cell::Int(30_000_000));

        let huge = cast(&Cell::Float(1e12), SemanticType::Integer);
        assert_eq!(huge, Cell::Int(i64::from(i32::MAX)));
    }

    #[test]
    fn test_timestamp_cast() {
        let epoch = cast_text("1260759144", SemanticType::Timestamp);
        assert_eq!(epoch.to_string(), "2009-12-14T02:52:24.000Z");

        let formatted = cast_text("2009-12-14 02:52:24", SemanticType::Timestamp);
        assert_eq!(formatted, epoch);

        let date = cast_text("1995-10-30", SemanticType::Timestamp);
        assert_eq!(date.to_string(), "1995-10-30T00:00:00.000Z");

        assert_eq!(cast_text("yesterday", SemanticType::Timestamp), Cell::Missing);
    }

    #[test]
    fn test_boolean_cast() {
        assert_eq!(cast_text("False", SemanticType::Boolean), Cell::Bool(false));
        assert_eq!(cast_text("TRUE", SemanticType::Boolean), Cell::Bool(true));
        assert_eq!(cast_text("maybe", SemanticType::Boolean), Cell::Missing);
    }

    #[test]
    fn test_cast_is_idempotent_on_typed_values() {
        let values = [
            (Cell::Int(5), SemanticType::Integer),
            (Cell::Float(2.5), SemanticType::Float),
            (Cell::text("x"), SemanticType::Text),
            (Cell::Bool(true), SemanticType::Boolean),
            (cast_text("1260759144", SemanticType::Timestamp), SemanticType::Timestamp),
        ];
        for (cell, ty) in values {
            let once = cast(&cell, ty);
            assert_eq!(once, cell);
            assert_eq!(cast(&once, ty), once);
        }
    }

    #[test]
    fn test_coerce_and_filter_rows() {
        let rows: Vec<Row> = ["862", "abc", "12,5"]
            .iter()
            .map(|id| vec![("id", Cell::text(*id))].into_iter().collect())
            .collect();

        let rows = retain_valid_keys(rows, "id");
        assert_eq!(rows.len(), 2);

        let rows = coerce_column(rows, "id", SemanticType::Integer);
        assert_eq!(rows[0].get("id"), &Cell::Int(862));
        assert!(rows[1].get("id").is_missing());
    }
}
