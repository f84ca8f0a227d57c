//! The catalog entity.
//!
//! A [`Book`] carries descriptive fields plus the ISBN that identifies it. Equality
//! and hashing look at the ISBN alone, so two values describing the same edition with
//! slightly different metadata are treated as the same book.
//!
//! # Examples
//!
//! ```
//! use bookcat::Book;
//!
//! let a = Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1");
//! let b = Book::new("Voina i mir", "L. Tolstoy", 1869, "Epic", "978-1");
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "War and Peace - Leo Tolstoy (1869)");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A book in the catalog.
///
/// `year` is not range checked; negative years and far future years are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Title
    pub title: String,
    /// Author, also the key of the author index
    pub author: String,
    /// Publication year, also the key of the year index
    pub year: i32,
    /// Genre (not indexed)
    pub genre: String,
    /// Unique identifier
    pub isbn: String,
}

impl Book {
    /// Create a new book
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Book {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            isbn: isbn.into(),
        }
    }

    /// Wrap the book in a shared handle, the form stored by collections and indexes.
    #[must_use]
    pub fn shared(self) -> Arc<Book> {
        Arc::new(self)
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.isbn == other.isbn
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.isbn.hash(state);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.title, self.author, self.year)
    }
}

/// Anything that names a book by ISBN.
///
/// Lets index membership checks accept either a book or a raw ISBN string.
pub trait IsbnKey {
    /// The ISBN this value refers to.
    fn isbn_key(&self) -> &str;
}

impl IsbnKey for Book {
    fn isbn_key(&self) -> &str {
        &self.isbn
    }
}

impl IsbnKey for Arc<Book> {
    fn isbn_key(&self) -> &str {
        &self.isbn
    }
}

impl IsbnKey for str {
    fn isbn_key(&self) -> &str {
        self
    }
}

impl IsbnKey for String {
    fn isbn_key(&self) -> &str {
        self
    }
}

impl<T: IsbnKey + ?Sized> IsbnKey for &T {
    fn isbn_key(&self) -> &str {
        (**self).isbn_key()
    }
}
