//! Runs every recipe over its source file and hands the tables to the sink.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::melt::types::Table;
use crate::melt::writer::SinkWriter;
use crate::recipes::Recipe;
use crate::source::SourceReader;

/// A table that reached the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Reads sources, applies recipes and writes tables, in a fixed order
pub struct Pipeline<R: SourceReader, W: SinkWriter> {
    config: Config,
    reader: R,
    sink: W,
}

impl<R: SourceReader, W: SinkWriter> Pipeline<R, W> {
    pub fn new(config: Config, reader: R, sink: W) -> Self {
        Pipeline {
            config,
            reader,
            sink,
        }
    }

    /// Source files in processing order, each with its recipe
    pub fn plan(&self) -> Vec<(Recipe, &Path)> {
        let sources = &self.config.sources;
        vec![
            (Recipe::Credits, sources.credits.as_path()),
            (Recipe::Keywords, sources.keywords.as_path()),
            (Recipe::Links, sources.links.as_path()),
            (Recipe::Links, sources.links_small.as_path()),
            (Recipe::Ratings, sources.ratings.as_path()),
            (Recipe::Ratings, sources.ratings_small.as_path()),
            (Recipe::Movies, sources.movies.as_path()),
        ]
    }

    /// Process every source file; stops at the first I/O failure
    pub fn run(&self) -> Result<Vec<WrittenTable>> {
        let mut written = Vec::new();
        for (recipe, locator) in self.plan() {
            written.extend(self.run_recipe(recipe, locator)?);
        }
        info!(tables = written.len(), destination = %self.config.destination.display(), "export complete");
        Ok(written)
    }

    /// Transform one source file and write each of its tables once
    pub fn run_recipe(&self, recipe: Recipe, locator: &Path) -> Result<Vec<WrittenTable>> {
        let source = self.reader.read(locator)?;
        info!(recipe = recipe.name(), source = %locator.display(), rows = source.len(), "source read");

        recipe
            .transform(locator, source)
            .iter()
            .map(|table| self.write(table))
            .collect()
    }

    fn write(&self, table: &Table) -> Result<WrittenTable> {
        let path = self.sink.write(table, &self.config.destination)?;
        info!(table = %table.name, rows = table.len(), "table written");
        Ok(WrittenTable {
            name: table.name.clone(),
            rows: table.len(),
            path,
        })
    }
}
