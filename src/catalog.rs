//! The catalog facade.
//!
//! A [`Catalog`] owns a [`BookCollection`] and a [`BookIndex`] describing the same set of
//! books. Every mutating operation updates both, so `catalog.len()` and
//! `catalog.indexed_len()` agree after each call. ISBN uniqueness is enforced here
//! rather than in the collection.
//!
//! # Examples
//!
//! ```
//! use bookcat::{Book, Catalog, CatalogError};
//!
//! let mut catalog = Catalog::new();
//! catalog.add(Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1"))?;
//! catalog.add(Book::new("Anna Karenina", "Leo Tolstoy", 1877, "Novel", "978-2"))?;
//!
//! assert_eq!(catalog.search_by_author("Leo Tolstoy").len(), 2);
//! assert!(matches!(
//!     catalog.add(Book::new("Copy", "Anon", 2000, "Novel", "978-1")),
//!     Err(CatalogError::DuplicateIsbn(_))
//! ));
//! assert_eq!(catalog.to_string(), "Catalog(2 books, 2 indexed)");
//! # Ok::<(), CatalogError>(())
//! ```

use crate::book::Book;
use crate::collection::BookCollection;
use crate::error::{CatalogError, Result};
use crate::index::BookIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A book collection and its indexes, kept consistent.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: BookCollection,
    indexes: BookIndex,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Create a catalog seeded with an existing collection.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if the collection repeats an ISBN.
    pub fn with_books(books: BookCollection) -> Result<Self> {
        let indexes = BookIndex::build(books.iter().cloned())?;
        debug!(books = books.len(), "seeded catalog");
        Ok(Catalog { books, indexes })
    }

    /// Add a book to the collection and the indexes.
    ///
    /// Returns the shared handle now held by the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if a book with the same ISBN is present;
    /// the catalog is unchanged in that case.
    pub fn add(&mut self, book: impl Into<Arc<Book>>) -> Result<Arc<Book>> {
        let book = book.into();
        if self.indexes.contains(&book) {
            debug!(isbn = %book.isbn, "rejected duplicate ISBN");
            return Err(CatalogError::DuplicateIsbn(book.isbn.clone()));
        }
        self.books.add(Arc::clone(&book));
        self.indexes.insert(Arc::clone(&book));
        trace!(isbn = %book.isbn, total = self.books.len(), "added book");
        Ok(book)
    }

    /// Remove a book from the collection and the indexes.
    ///
    /// Removing a book that is not present is a no-op and returns `None`.
    pub fn remove(&mut self, book: &Book) -> Option<Arc<Book>> {
        let from_books = self.books.remove(book);
        let from_index = self.indexes.remove(book);
        let removed = from_index.or(from_books);
        if let Some(removed) = &removed {
            trace!(isbn = %removed.isbn, total = self.books.len(), "removed book");
        }
        removed
    }

    /// The book with this ISBN, if present
    #[must_use]
    pub fn search_by_isbn(&self, isbn: &str) -> Option<Arc<Book>> {
        self.indexes.get_isbn(isbn)
    }

    /// All books by `author`; empty if none
    #[must_use]
    pub fn search_by_author(&self, author: &str) -> BookCollection {
        self.indexes.by_author(author)
    }

    /// All books published in `year`; empty if none
    #[must_use]
    pub fn search_by_year(&self, year: i32) -> BookCollection {
        self.indexes.by_year(year)
    }

    /// All books of `genre`, in collection order; empty if none.
    ///
    /// Genre is not indexed, so this scans the collection.
    #[must_use]
    pub fn search_by_genre(&self, genre: &str) -> BookCollection {
        self.books
            .iter()
            .filter(|book| book.genre == genre)
            .cloned()
            .collect()
    }

    /// A uniformly chosen book, or `None` if the catalog is empty
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Arc<Book>> {
        self.books.as_slice().choose(rng).cloned()
    }

    /// Rebuild the indexes from the current collection.
    ///
    /// Use after mutating the collection through [`books_mut`](Self::books_mut).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if the collection repeats an ISBN; the
    /// indexes are left as they were.
    pub fn resync_indexes(&mut self) -> Result<()> {
        self.indexes.rebuild(self.books.iter().cloned())
    }

    /// The ordered collection
    #[must_use]
    pub fn books(&self) -> &BookCollection {
        &self.books
    }

    /// Mutable access to the collection, bypassing the indexes.
    ///
    /// Call [`resync_indexes`](Self::resync_indexes) afterwards.
    pub fn books_mut(&mut self) -> &mut BookCollection {
        &mut self.books
    }

    /// The indexes
    #[must_use]
    pub fn indexes(&self) -> &BookIndex {
        &self.indexes
    }

    /// Number of books in the collection
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Number of unique ISBNs indexed
    #[must_use]
    pub fn indexed_len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether the catalog holds no books
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog({} books, {} indexed)",
            self.books.len(),
            self.indexes.len()
        )
    }
}
