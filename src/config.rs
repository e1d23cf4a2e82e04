//! Run configuration: where the seven source files live and where tables go.

use std::path::{Path, PathBuf};

use crate::error::{CinemeltError, Result};

/// Environment variable overriding the directory holding the source files
pub const SOURCE_DIR_ENV: &str = "CINEMELT_SOURCE_DIR";

/// Source directory used when [`SOURCE_DIR_ENV`] is unset
pub const DEFAULT_SOURCE_DIR: &str = "movie-data";

/// Locators of the seven source files of the movie dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub credits: PathBuf,
    pub keywords: PathBuf,
    pub links: PathBuf,
    pub links_small: PathBuf,
    pub ratings: PathBuf,
    pub ratings_small: PathBuf,
    pub movies: PathBuf,
}

impl SourceSet {
    /// The fixed file names, rooted at `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        SourceSet {
            credits: dir.join("credits.csv"),
            keywords: dir.join("keywords.csv"),
            links: dir.join("links.csv"),
            links_small: dir.join("links_small.csv"),
            ratings: dir.join("ratings.csv"),
            ratings_small: dir.join("ratings_small.csv"),
            movies: dir.join("movies_metadata.csv"),
        }
    }

    /// Rooted at `$CINEMELT_SOURCE_DIR`, or `movie-data/` when unset
    pub fn from_env() -> Self {
        match std::env::var_os(SOURCE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::in_dir(PathBuf::from(dir)),
            _ => Self::in_dir(DEFAULT_SOURCE_DIR),
        }
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self::in_dir(DEFAULT_SOURCE_DIR)
    }
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base directory; each table is written to `<destination>/<table>/`
    pub destination: PathBuf,
    pub sources: SourceSet,
}

impl Config {
    pub fn new(destination: impl Into<PathBuf>, sources: SourceSet) -> Result<Self> {
        let destination = destination.into();
        if destination.as_os_str().is_empty() {
            return Err(CinemeltError::Config(
                "destination must not be empty".to_string(),
            ));
        }
        Ok(Config {
            destination,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_names() {
        let sources = SourceSet::in_dir("/data");
        assert_eq!(sources.credits, PathBuf::from("/data/credits.csv"));
        assert_eq!(sources.links_small, PathBuf::from("/data/links_small.csv"));
        assert_eq!(sources.movies, PathBuf::from("/data/movies_metadata.csv"));
    }

    #[test]
    fn test_default_dir() {
        assert_eq!(
            SourceSet::default().ratings,
            Path::new(DEFAULT_SOURCE_DIR).join("ratings.csv")
        );
    }

    #[test]
    fn test_empty_destination_rejected() {
        let err = Config::new("", SourceSet::default()).unwrap_err();
        assert!(matches!(err, CinemeltError::Config(_)));
        assert!(Config::new("out", SourceSet::default()).is_ok());
    }
}
