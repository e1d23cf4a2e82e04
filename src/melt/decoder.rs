//! Shape-guided decoding of JSON sub-documents embedded in text columns
//!
//! A [`ShapeDecoder`] reads each cell against a declared [`Shape`] and never
//! fails: empty cells, malformed JSON and containers of the wrong kind all
//! decode as absent, so a bad row contributes nothing for that column.

use serde_json::{Map, Value};
use tracing::debug;

use crate::melt::coerce::{cast, cast_text};
use crate::melt::types::{Cell, Row};
use crate::schema::{Container, SemanticType, Shape};

/// Outcome of decoding one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Empty, null or unparseable cell
    Absent,
    /// A single object, for object shapes
    Object(Row),
    /// Zero or more elements, for array shapes
    Array(Vec<Row>),
}

impl Decoded {
    pub fn is_absent(&self) -> bool {
        matches!(self, Decoded::Absent)
    }

    /// Decoded records, flattened: absent is empty, an object is one record
    pub fn into_records(self) -> Vec<Row> {
        match self {
            Decoded::Absent => Vec::new(),
            Decoded::Object(record) => vec![record],
            Decoded::Array(records) => records,
        }
    }

    /// A field of a single decoded object, missing for anything else
    pub fn field(&self, name: &str) -> Cell {
        match self {
            Decoded::Object(record) => record.get(name).clone(),
            _ => Cell::Missing,
        }
    }
}

/// One exploded element together with the key of the row it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Exploded {
    pub parent: Cell,
    pub element: Row,
}

impl Exploded {
    /// Flatten into a single row: the parent key under `parent_column`,
    /// element fields as `<prefix>.<field>`
    pub fn into_row(self, parent_column: &str, prefix: &str) -> Row {
        let mut row = Row::with_capacity(self.element.len() + 1);
        row.insert(parent_column, self.parent);
        for (field, cell) in self.element {
            row.insert(format!("{}.{}", prefix, field), cell);
        }
        row
    }
}

/// Decoder for one embedded-document shape
#[derive(Debug, Clone, Copy)]
pub struct ShapeDecoder {
    shape: &'static Shape,
}

impl ShapeDecoder {
    pub fn new(shape: &'static Shape) -> Self {
        ShapeDecoder { shape }
    }

    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Decode one cell against the shape
    pub fn decode(&self, cell: &Cell) -> Decoded {
        let Some(text) = cell.as_text() else {
            return Decoded::Absent;
        };
        let text = text.trim();
        if text.is_empty() {
            return Decoded::Absent;
        }

        let Some(value) = parse_lenient(text) else {
            debug!(shape = self.shape.name, "unparseable sub-document, treating as absent");
            return Decoded::Absent;
        };

        match (self.shape.container, value) {
            (_, Value::Null) => Decoded::Absent,
            (Container::Object, Value::Object(obj)) => Decoded::Object(self.record(&obj)),
            (Container::Array, Value::Array(items)) => match self.elements(items) {
                Some(records) => Decoded::Array(records),
                None => {
                    debug!(shape = self.shape.name, "array holds non-object elements, treating as absent");
                    Decoded::Absent
                }
            },
            _ => {
                debug!(shape = self.shape.name, "sub-document has the wrong container, treating as absent");
                Decoded::Absent
            }
        }
    }

    /// Fan each row's `column` out into one entry per decoded element,
    /// carrying the row's `key_column` value unmodified
    pub fn explode(&self, rows: &[Row], key_column: &str, column: &str) -> Vec<Exploded> {
        let mut exploded = Vec::new();
        for row in rows {
            let parent = row.get(key_column);
            for element in self.decode(row.get(column)).into_records() {
                exploded.push(Exploded {
                    parent: parent.clone(),
                    element,
                });
            }
        }
        exploded
    }

    /// Decode array elements; `None` if any element is not an object or null
    fn elements(&self, items: Vec<Value>) -> Option<Vec<Row>> {
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(obj) => Some(self.record(&obj)),
                Value::Null => Some(self.empty_record()),
                _ => None,
            })
            .collect()
    }

    /// Project a JSON object onto the shape's fields; extra keys are ignored
    fn record(&self, obj: &Map<String, Value>) -> Row {
        self.shape
            .fields
            .iter()
            .map(|field| (field.name, json_cell(obj.get(field.name), field.ty)))
            .collect()
    }

    fn empty_record(&self) -> Row {
        self.shape
            .fields
            .iter()
            .map(|field| (field.name, Cell::Missing))
            .collect()
    }
}

/// Convert one JSON field value to a cell of the declared type
fn json_cell(value: Option<&Value>, ty: SemanticType) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::Missing,
        Some(Value::String(s)) => cast_text(s, ty),
        Some(Value::Bool(b)) => cast(&Cell::Bool(*b), ty),
        Some(Value::Number(n)) => match ty {
            SemanticType::Integer => match n.as_i64() {
                Some(i) if i32::try_from(i).is_ok() => Cell::Int(i),
                _ => Cell::Missing,
            },
            SemanticType::Float => n.as_f64().map_or(Cell::Missing, |x| Cell::Float(x as f32)),
            _ => cast_text(&n.to_string(), ty),
        },
        Some(nested @ (Value::Array(_) | Value::Object(_))) => match ty {
            SemanticType::Text => Cell::Text(nested.to_string()),
            _ => Cell::Missing,
        },
    }
}

/// Parse strict JSON, falling back to single-quoted strings
fn parse_lenient(text: &str) -> Option<Value> {
    serde_json::from_str(text)
        .ok()
        .or_else(|| relax_quotes(text).and_then(|t| serde_json::from_str(&t).ok()))
}

/// Rewrite single-quoted strings as double-quoted JSON strings
///
/// Returns `None` when there is nothing to rewrite or a string is left open.
fn relax_quotes(text: &str) -> Option<String> {
    if !text.contains('\'') {
        return None;
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '"' | '\'') => {
                quote = Some(c);
                out.push('"');
            }
            (Some(q), c) if c == q => {
                quote = None;
                out.push('"');
            }
            (Some(q), '\\') => {
                let escaped = chars.next()?;
                if q == '\'' && escaped == '\'' {
                    out.push('\'');
                } else {
                    out.push('\\');
                    out.push(escaped);
                }
            }
            (Some('\''), '"') => out.push_str("\\\""),
            _ => out.push(c),
        }
    }

    quote.is_none().then_some(out)
}
