//! Sample data sets for drivers.
//!
//! A [`SampleData`] value bundles demonstration books with the pools of authors, genres,
//! years and nonexistent ISBNs that the [`simulation`](crate::simulation) draws search
//! terms from. The catalog core never reads sample data; drivers load it and hand books
//! to [`Catalog::add`](crate::Catalog::add).
//!
//! The JSON layout is:
//!
//! ```json
//! {
//!   "books": [{"title": "...", "author": "...", "year": 1869, "genre": "...", "isbn": "..."}],
//!   "genres": ["..."],
//!   "authors": ["..."],
//!   "years": [1869],
//!   "fake_isbns": ["..."]
//! }
//! ```

use crate::book::Book;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUNDLED: &str = include_str!("../data/books_data.json");

/// Books plus search-term pools for demonstration and testing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    /// Books available for adding to a catalog
    pub books: Vec<Book>,
    /// Genres to search for
    #[serde(default)]
    pub genres: Vec<String>,
    /// Authors to search for
    #[serde(default)]
    pub authors: Vec<String>,
    /// Years to search for
    #[serde(default)]
    pub years: Vec<i32>,
    /// ISBNs expected to be absent from any catalog built from `books`
    #[serde(default)]
    pub fake_isbns: Vec<String>,
}

impl SampleData {
    /// Parse sample data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::JsonError`](crate::CatalogError::JsonError) if the JSON
    /// does not match the sample data layout.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read sample data from any JSON source.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the JSON is malformed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read sample data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IoError`](crate::CatalogError::IoError) if the file cannot
    /// be opened, or a JSON error if it is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The data set compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED)
    }

    /// Fresh copies of the sample books
    #[must_use]
    pub fn create_books(&self) -> Vec<Book> {
        self.books.clone()
    }
}
