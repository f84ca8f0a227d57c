//! Common capability trait for book containers.
//!
//! This module defines the [`BookSet`] trait implemented by both
//! [`BookCollection`](crate::BookCollection) and [`BookIndex`](crate::BookIndex).
//! Each container picks its own selector and output types, so positional access on a
//! collection and keyed access on an index go through the same entry point.
//!
//! # Examples
//!
//! ```
//! use bookcat::{Book, BookCollection, BookIndex, BookSet};
//!
//! fn describe<S: BookSet>(set: &S) -> String {
//!     format!("{set} holding {} books", set.len())
//! }
//!
//! let books: BookCollection = vec![Book::new("T", "A", 2000, "G", "1")].into();
//! let index = BookIndex::build(books.iter().cloned()).unwrap();
//! assert_eq!(describe(&books), "BookCollection(1 books) holding 1 books");
//! assert_eq!(describe(&index), "BookIndex(1 unique books) holding 1 books");
//! ```

use crate::book::Book;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Common trait for containers of shared books.
///
/// The `Display` supertrait provides the short summary string.
pub trait BookSet: fmt::Display {
    /// What [`select`](Self::select) accepts.
    type Selector;

    /// What [`select`](Self::select) returns.
    type Output;

    /// Iterate over the books held by the container.
    fn iter_books(&self) -> Box<dyn Iterator<Item = &Arc<Book>> + '_>;

    /// Number of books held.
    fn len(&self) -> usize;

    /// Whether the container is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access the container through its selector type.
    ///
    /// # Errors
    ///
    /// Returns an error when the selector is out of range or malformed for this
    /// container.
    fn select(&self, selector: Self::Selector) -> Result<Self::Output>;

    /// Whether a book with the same ISBN is held.
    ///
    /// The default implementation scans [`iter_books`](Self::iter_books).
    fn contains_book(&self, book: &Book) -> bool {
        self.iter_books().any(|held| held.as_ref() == book)
    }
}
