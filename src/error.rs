//! Error types for catalog operations.
//!
//! This module provides the [`CatalogError`] type for all catalog, collection and
//! index operations and the [`Result`] convenience type.
//!
//! A search that finds nothing is not an error: lookups return `None` or an
//! empty [`BookCollection`](crate::BookCollection) instead.

use thiserror::Error;

/// Error type for all catalog operations.
///
/// Represents the failure conditions of the collection, index and catalog
/// layers, plus the I/O and decoding errors of sample data loading.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// An argument had the wrong shape (zero slice step, malformed lookup selector).
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Positional access outside the collection.
    #[error("Index {index} out of range for collection of {len} books")]
    IndexOutOfBounds {
        /// The requested (possibly negative) position
        index: isize,
        /// Length of the collection at the time of access
        len: usize,
    },

    /// A lookup kind other than `isbn`, `author` or `year`.
    #[error("Unknown lookup kind: {0}")]
    UnknownLookupKind(String),

    /// A book with this ISBN is already present.
    #[error("Book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// IO error while reading sample data.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Sample data could not be decoded.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
