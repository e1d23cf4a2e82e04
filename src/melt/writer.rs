use crate::error::{CinemeltError, Result};
use crate::melt::types::{Row, Table};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the single data file written per table
pub const PART_FILE: &str = "part-00000.json.gz";

/// Empty marker written once a table is complete
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Persists finished tables
pub trait SinkWriter {
    /// Write `table` under `base`, replacing anything already there, and
    /// return the table's directory
    fn write(&self, table: &Table, base: &Path) -> Result<PathBuf>;
}

/// Directory a table is written to: `<base>/<table name>/`
pub fn destination_for(base: &Path, table_name: &str) -> PathBuf {
    base.join(table_name)
}

/// Writes rows as newline-delimited JSON to any output
pub struct RecordWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        RecordWriter { writer, written: 0 }
    }

    /// Write rows, one JSON object per line, missing columns omitted
    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            serde_json::to_writer(&mut self.writer, row)?;
            self.writer.write_all(b"\n").map_err(CinemeltError::Write)?;
            self.written += 1;
        }
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Sink writing each table as one gzip-compressed JSON Lines file
#[derive(Debug, Clone)]
pub struct GzJsonSink {
    compression: Compression,
}

impl GzJsonSink {
    pub fn new() -> Self {
        GzJsonSink {
            compression: Compression::default(),
        }
    }
}

impl Default for GzJsonSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkWriter for GzJsonSink {
    fn write(&self, table: &Table, base: &Path) -> Result<PathBuf> {
        let dir = destination_for(base, &table.name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(CinemeltError::io(&dir))?;
        }
        fs::create_dir_all(&dir).map_err(CinemeltError::io(&dir))?;

        // Gzip header carries no timestamp, so reruns are byte-identical
        let part = dir.join(PART_FILE);
        let file = File::create(&part).map_err(CinemeltError::io(&part))?;
        let encoder = GzEncoder::new(BufWriter::new(file), self.compression);

        let mut writer = RecordWriter::new(encoder);
        writer.write_rows(&table.rows)?;
        let count = writer.written();

        writer
            .into_inner()
            .finish()
            .and_then(|mut buffered| buffered.flush())
            .map_err(CinemeltError::io(&part))?;

        let marker = dir.join(SUCCESS_MARKER);
        File::create(&marker).map_err(CinemeltError::io(&marker))?;

        debug!(table = %table.name, rows = count, path = %part.display(), "table written");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melt::types::{Cell, TableKind};
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn table() -> Table {
        Table {
            name: "genres".to_string(),
            kind: TableKind::Entity,
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec![("id", Cell::Int(16)), ("name", Cell::text("Animation"))]
                    .into_iter()
                    .collect(),
                vec![("id", Cell::Int(35)), ("name", Cell::Missing)]
                    .into_iter()
                    .collect(),
            ],
        }
    }

    #[test]
    fn test_record_writer() {
        let mut buffer = Vec::new();
        let mut writer = RecordWriter::new(&mut buffer);
        writer.write_rows(&table().rows).unwrap();
        assert_eq!(writer.written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "{\"id\":16,\"name\":\"Animation\"}\n{\"id\":35}\n");
    }

    #[test]
    fn test_gz_sink_overwrites() {
        let base = tempfile::tempdir().unwrap();
        let stale = base.path().join("genres").join("part-00042.json.gz");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let dir = GzJsonSink::new().write(&table(), base.path()).unwrap();

        assert_eq!(dir, base.path().join("genres"));
        assert!(!stale.exists());
        assert!(dir.join(SUCCESS_MARKER).exists());

        let mut text = String::new();
        GzDecoder::new(File::open(dir.join(PART_FILE)).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
