use crate::{
    error::{Error, Result},
    model::{License, Named},
};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, trace};
use walkdir::WalkDir;

const RECORD_PATTERNS: &[&str] = &["*.yml", "*.yaml"];

/// How loaded records are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort by record name
    ByName,
    /// Keep file-name order
    FileOrder,
}

/// Loads one record per YAML file found directly in `dir`.
///
/// Files are visited in file-name order so the result is deterministic
/// regardless of the underlying filesystem.
///
/// # Errors
///
/// Returns an error if:
/// - `dir` doesn't exist
/// - A file cannot be read
/// - A file cannot be decoded into `T` (including missing required fields)
pub fn load_records<T>(dir: &Path, order: SortOrder) -> Result<Vec<T>>
where
    T: DeserializeOwned + Named,
{
    if !dir.is_dir() {
        return Err(Error::missing_input(dir));
    }

    let patterns = record_globset()?;
    let mut records = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
            Error::io(path, std::io::Error::from(e))
        })?;

        if !entry.file_type().is_file() || !patterns.is_match(entry.file_name()) {
            trace!("Skipping non-record entry {}", entry.path().display());
            continue;
        }

        records.push(read_yaml::<T>(entry.path())?);
    }

    if order == SortOrder::ByName {
        records.sort_by(|a, b| a.name().cmp(b.name()));
    }

    debug!("Loaded {} records from {}", records.len(), dir.display());
    Ok(records)
}

/// Loads the license list from a single YAML file.
///
/// # Errors
///
/// Returns an error if the file is missing or cannot be decoded.
pub fn load_licenses(path: &Path) -> Result<Vec<License>> {
    if !path.is_file() {
        return Err(Error::missing_input(path));
    }
    let licenses: Vec<License> = read_yaml(path)?;
    debug!("Loaded {} licenses from {}", licenses.len(), path.display());
    Ok(licenses)
}

/// Reads a required text file verbatim.
///
/// # Errors
///
/// Returns [`Error::MissingInput`] if the file does not exist.
pub fn read_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::missing_input(path));
    }
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| Error::parse(path, &e))
}

fn record_globset() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in RECORD_PATTERNS {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("Invalid glob pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("Failed to build glob set: {e}")))
}

/// Well-known locations inside a source directory.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    root: PathBuf,
}

impl SourceLayout {
    /// Wraps a source directory root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory of category records.
    #[must_use]
    pub fn categories_dir(&self) -> PathBuf {
        self.root.join("tags")
    }

    /// Directory of platform records.
    #[must_use]
    pub fn platforms_dir(&self) -> PathBuf {
        self.root.join("platforms")
    }

    /// Directory of project records.
    #[must_use]
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("software")
    }

    /// License list file.
    #[must_use]
    pub fn licenses_file(&self) -> PathBuf {
        self.root.join("licenses.yml")
    }

    /// Index header text.
    #[must_use]
    pub fn header_file(&self) -> PathBuf {
        self.root.join("markdown").join("header.md")
    }

    /// Index footer text.
    #[must_use]
    pub fn footer_file(&self) -> PathBuf {
        self.root.join("markdown").join("footer.md")
    }
}
