//! Source reader: CSV files with a header row, every cell kept as raw text.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{CinemeltError, Result};
use crate::melt::types::{Cell, Column, Row, Rowset};

/// Reads a located source into raw rows.
pub trait SourceReader {
    fn read(&self, locator: &Path) -> Result<Rowset>;
}

/// CSV reader; no type inference, empty fields become missing.
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
}

impl CsvSource {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Parse CSV from any reader. Short records are padded with missing
    /// cells and surplus fields are ignored. Invalid UTF-8 is replaced
    /// field by field, so only I/O and framing errors fail the read.
    pub fn read_from<R: Read>(&self, input: R) -> std::result::Result<Rowset, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let columns: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        let keys: Vec<Column> = columns.iter().map(|c| Column::from(c.as_str())).collect();

        let mut rows = Vec::new();
        let mut repaired = 0usize;
        for record in reader.byte_records() {
            let record = record?;
            let row: Row = keys
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let cell = match record.get(i) {
                        Some(b"") | None => Cell::Missing,
                        Some(bytes) => match String::from_utf8_lossy(bytes) {
                            Cow::Borrowed(text) => Cell::text(text),
                            Cow::Owned(text) => {
                                repaired += 1;
                                Cell::Text(text)
                            }
                        },
                    };
                    (column.clone(), cell)
                })
                .collect();
            rows.push(row);
        }

        if repaired > 0 {
            debug!(fields = repaired, "replaced invalid UTF-8 in source fields");
        }
        Ok(Rowset::new(columns, rows))
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceReader for CsvSource {
    fn read(&self, locator: &Path) -> Result<Rowset> {
        let file = File::open(locator).map_err(CinemeltError::io(locator))?;
        self.read_from(file).map_err(|source| CinemeltError::Csv {
            path: locator.to_path_buf(),
            source,
        })
    }
}
