//! Local catalogue files: JSON listings of named entries.
//!
//! A catalogue is a JSON array of objects with a `name` and an optional `id`,
//! kept in the order the provider listed them:
//!
//! ```json
//! [
//!   { "id": "2", "name": "512MB Standard Instance" },
//!   { "id": "performance1-4", "name": "4GB Performance" }
//! ]
//! ```

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::Deserialize;
use thiserror::Error;

use crate::resolve::{Candidate, MatchMode, Resolution, resolve_with};

/// A single catalogue entry.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct CatalogEntry {
    /// Display name matched against queries.
    pub name: String,
    /// Provider identifier, when the listing carries one.
    #[serde(default)]
    pub id: Option<String>,
}

impl Candidate for CatalogEntry {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Ordered collection of [`CatalogEntry`] values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// Errors raised while loading a catalogue file.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalogue {path}: {message}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error.
        message: String,
    },
    /// The file is not a JSON array of entries.
    #[error("invalid catalogue {path}: {message}")]
    Parse {
        /// Path that was requested.
        path: String,
        /// Parser error.
        message: String,
    },
}

impl Catalog {
    /// Wraps entries that were obtained elsewhere.
    #[must_use]
    pub const fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Reads and parses a catalogue file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Read`] when the file cannot be opened and
    /// [`CatalogError::Parse`] when its contents are not a valid listing.
    pub fn load(path: &Utf8Path) -> Result<Self, CatalogError> {
        let content = read_to_string_ambient(path).map_err(|message| CatalogError::Read {
            path: path.to_string(),
            message,
        })?;
        parse_entries(&content, path.as_str())
    }

    /// Parses a catalogue from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when `json` is not a listing.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        parse_entries(json, "<inline>")
    }

    /// Display names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(CatalogEntry::display_name)
    }

    /// Resolves `query` against the listing.
    pub fn resolve(&self, mode: MatchMode, query: &str) -> Resolution<&CatalogEntry> {
        resolve_with(mode, query, &self.entries)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the listing is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(json: &str, origin: &str) -> Result<Catalog, CatalogError> {
    serde_json::from_str(json)
        .map(Catalog::new)
        .map_err(|err| CatalogError::Parse {
            path: origin.to_owned(),
            message: err.to_string(),
        })
}

fn read_to_string_ambient(path: &Utf8Path) -> Result<String, String> {
    let (dir_path, file_path) = if path.is_absolute() {
        let parent = path
            .parent()
            .ok_or_else(|| format!("path has no parent directory: {path}"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| format!("path has no file name: {path}"))?;
        (parent, Utf8Path::new(file_name))
    } else {
        (Utf8Path::new("."), path)
    };

    let dir =
        Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(|err| err.to_string())?;
    dir.read_to_string(file_path).map_err(|err| err.to_string())
}
