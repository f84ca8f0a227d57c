//! Secondary indexes over a set of books.
//!
//! [`BookIndex`] keeps three mappings in lockstep:
//!
//! - ISBN to book (at most one book per ISBN)
//! - author to bucket of books, in insertion order
//! - year to bucket of books, in insertion order
//!
//! Every book reachable through the ISBN map sits exactly once in its author bucket and
//! exactly once in its year bucket. A bucket that becomes empty is dropped, so
//! [`authors`](BookIndex::authors) and [`years`](BookIndex::years) only ever report keys
//! that still have books.
//!
//! # Examples
//!
//! ```
//! use bookcat::{Book, BookIndex, Lookup, LookupResult};
//!
//! let mut index = BookIndex::new();
//! index.insert(Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1"));
//! index.insert(Book::new("Anna Karenina", "Leo Tolstoy", 1877, "Novel", "978-2"));
//!
//! assert_eq!(index.by_author("Leo Tolstoy").len(), 2);
//! match index.lookup(&"year:1877".parse::<Lookup>().unwrap()) {
//!     LookupResult::Books(books) => assert_eq!(books.len(), 1),
//!     LookupResult::Book(_) => unreachable!(),
//! }
//! ```

use crate::book::{Book, IsbnKey};
use crate::book_set::BookSet;
use crate::collection::BookCollection;
use crate::error::{CatalogError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, trace};

/// A keyed query against a [`BookIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Exact ISBN
    Isbn(String),
    /// All books by an author
    Author(String),
    /// All books published in a year
    Year(i32),
}

impl Lookup {
    /// Build a lookup from a kind name (`isbn`, `author` or `year`) and a raw value.
    ///
    /// The kind is matched case-insensitively and surrounding whitespace is trimmed
    /// from both parts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownLookupKind`] for any other kind, and
    /// [`CatalogError::Validation`] if a year value is not an integer.
    pub fn new(kind: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        match kind.trim().to_ascii_lowercase().as_str() {
            "isbn" => Ok(Lookup::Isbn(value.to_string())),
            "author" => Ok(Lookup::Author(value.to_string())),
            "year" => value.parse().map(Lookup::Year).map_err(|_| {
                CatalogError::Validation(format!("year must be an integer, got {value:?}"))
            }),
            _ => Err(CatalogError::UnknownLookupKind(kind.to_string())),
        }
    }

    /// The kind name of this lookup
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Lookup::Isbn(_) => "isbn",
            Lookup::Author(_) => "author",
            Lookup::Year(_) => "year",
        }
    }
}

impl FromStr for Lookup {
    type Err = CatalogError;

    /// Parse a `kind:value` selector such as `author:Leo Tolstoy`.
    fn from_str(s: &str) -> Result<Self> {
        let (kind, value) = s.split_once(':').ok_or_else(|| {
            CatalogError::Validation(format!("lookup must be a kind:value pair, got {s:?}"))
        })?;
        Lookup::new(kind, value)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Isbn(isbn) => write!(f, "isbn:{isbn}"),
            Lookup::Author(author) => write!(f, "author:{author}"),
            Lookup::Year(year) => write!(f, "year:{year}"),
        }
    }
}

/// Result of a [`Lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// ISBN lookups yield at most one book
    Book(Option<Arc<Book>>),
    /// Author and year lookups yield a collection, empty when nothing matches
    Books(BookCollection),
}

impl LookupResult {
    /// Number of books found
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            LookupResult::Book(book) => usize::from(book.is_some()),
            LookupResult::Books(books) => books.len(),
        }
    }

    /// Whether nothing was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a collection
    #[must_use]
    pub fn into_collection(self) -> BookCollection {
        match self {
            LookupResult::Book(book) => book.into_iter().collect(),
            LookupResult::Books(books) => books,
        }
    }
}

/// ISBN, author and year indexes over a set of shared books.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    by_isbn: IndexMap<String, Arc<Book>>,
    by_author: IndexMap<String, Vec<Arc<Book>>>,
    by_year: IndexMap<i32, Vec<Arc<Book>>>,
}

impl BookIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        BookIndex::default()
    }

    /// Build an index over `books`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if two books share an ISBN.
    pub fn build<I, B>(books: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<Book>>,
    {
        let mut index = BookIndex::new();
        for book in books {
            let book = book.into();
            if index.by_isbn.contains_key(&book.isbn) {
                debug!(isbn = %book.isbn, "duplicate ISBN in bulk index build");
                return Err(CatalogError::DuplicateIsbn(book.isbn.clone()));
            }
            index.link(book);
        }
        Ok(index)
    }

    /// Clear all three mappings and rebuild them from `books`.
    ///
    /// The index is left untouched if `books` repeats an ISBN.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if two books share an ISBN.
    pub fn rebuild<I, B>(&mut self, books: I) -> Result<()>
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<Book>>,
    {
        *self = BookIndex::build(books)?;
        debug!(books = self.len(), "rebuilt book index");
        Ok(())
    }

    /// Index a single book.
    ///
    /// If a book with the same ISBN is already indexed it is replaced and unlinked from
    /// its buckets; the replaced handle is returned.
    pub fn insert(&mut self, book: impl Into<Arc<Book>>) -> Option<Arc<Book>> {
        let book = book.into();
        let replaced = self.remove(book.as_ref());
        trace!(isbn = %book.isbn, author = %book.author, year = book.year, "indexing book");
        self.link(book);
        replaced
    }

    /// Remove a book from all three mappings.
    ///
    /// Buckets are located through the indexed copy of the book, so a caller holding a
    /// stale value with the same ISBN still removes the right entries. Returns `None`
    /// when the ISBN was never indexed.
    pub fn remove(&mut self, book: &Book) -> Option<Arc<Book>> {
        let removed = self.by_isbn.shift_remove(&book.isbn)?;
        unlink(&mut self.by_author, &removed.author, &removed);
        unlink(&mut self.by_year, &removed.year, &removed);
        trace!(isbn = %removed.isbn, "unindexed book");
        Some(removed)
    }

    /// Run a lookup.
    #[must_use]
    pub fn lookup(&self, lookup: &Lookup) -> LookupResult {
        match lookup {
            Lookup::Isbn(isbn) => LookupResult::Book(self.get_isbn(isbn)),
            Lookup::Author(author) => LookupResult::Books(self.by_author(author)),
            Lookup::Year(year) => LookupResult::Books(self.by_year(*year)),
        }
    }

    /// The book with this ISBN, if indexed
    #[must_use]
    pub fn get_isbn(&self, isbn: &str) -> Option<Arc<Book>> {
        self.by_isbn.get(isbn).cloned()
    }

    /// All books by `author`, empty if none
    #[must_use]
    pub fn by_author(&self, author: &str) -> BookCollection {
        bucket(self.by_author.get(author))
    }

    /// All books published in `year`, empty if none
    #[must_use]
    pub fn by_year(&self, year: i32) -> BookCollection {
        bucket(self.by_year.get(&year))
    }

    /// Whether the ISBN named by `item` is indexed.
    ///
    /// Accepts a [`Book`], an `Arc<Book>` or a raw ISBN string.
    #[must_use]
    pub fn contains<K: IsbnKey + ?Sized>(&self, item: &K) -> bool {
        self.by_isbn.contains_key(item.isbn_key())
    }

    /// Number of unique ISBNs indexed
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_isbn.len()
    }

    /// Whether nothing is indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_isbn.is_empty()
    }

    /// Authors that currently have at least one book
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.by_author.keys().map(String::as_str)
    }

    /// Years that currently have at least one book
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Indexed books in first-insertion order
    pub fn iter(&self) -> indexmap::map::Values<'_, String, Arc<Book>> {
        self.by_isbn.values()
    }

    /// Drop every mapping
    pub fn clear(&mut self) {
        self.by_isbn.clear();
        self.by_author.clear();
        self.by_year.clear();
    }

    fn link(&mut self, book: Arc<Book>) {
        self.by_author
            .entry(book.author.clone())
            .or_default()
            .push(Arc::clone(&book));
        self.by_year
            .entry(book.year)
            .or_default()
            .push(Arc::clone(&book));
        self.by_isbn.insert(book.isbn.clone(), book);
    }
}

fn bucket(books: Option<&Vec<Arc<Book>>>) -> BookCollection {
    books.map_or_else(BookCollection::new, |books| {
        books.iter().cloned().collect()
    })
}

/// Remove the first ISBN-equal entry from `map[key]`, dropping the bucket once empty.
fn unlink<K>(map: &mut IndexMap<K, Vec<Arc<Book>>>, key: &K, book: &Book)
where
    K: Hash + Eq,
{
    let Some(bucket) = map.get_mut(key) else {
        return;
    };
    if let Some(pos) = bucket.iter().position(|held| held.as_ref() == book) {
        bucket.remove(pos);
    }
    if bucket.is_empty() {
        map.shift_remove(key);
    }
}

impl BookSet for BookIndex {
    type Selector = Lookup;
    type Output = LookupResult;

    fn iter_books(&self) -> Box<dyn Iterator<Item = &Arc<Book>> + '_> {
        Box::new(self.by_isbn.values())
    }

    fn len(&self) -> usize {
        self.by_isbn.len()
    }

    fn select(&self, selector: Lookup) -> Result<LookupResult> {
        Ok(self.lookup(&selector))
    }

    fn contains_book(&self, book: &Book) -> bool {
        self.contains(book)
    }
}

impl fmt::Display for BookIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookIndex({} unique books)", self.by_isbn.len())
    }
}

impl<'a> IntoIterator for &'a BookIndex {
    type Item = &'a Arc<Book>;
    type IntoIter = indexmap::map::Values<'a, String, Arc<Book>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_isbn.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1"),
            Book::new("Anna Karenina", "Leo Tolstoy", 1877, "Novel", "978-2"),
            Book::new("The Master and Margarita", "Mikhail Bulgakov", 1967, "Fantasy", "978-3"),
            Book::new("Crime and Punishment", "Fyodor Dostoevsky", 1866, "Novel", "978-4"),
            Book::new("Eugene Onegin", "Alexander Pushkin", 1833, "Poem", "978-5"),
        ]
    }

    fn built() -> BookIndex {
        BookIndex::build(sample()).unwrap()
    }

    /// Each ISBN-indexed book sits exactly once in its buckets, and nothing else does.
    fn assert_consistent(index: &BookIndex) {
        let author_total: usize = index.by_author.values().map(Vec::len).sum();
        let year_total: usize = index.by_year.values().map(Vec::len).sum();
        assert_eq!(author_total, index.len());
        assert_eq!(year_total, index.len());
        for book in index.iter() {
            let in_author = index.by_author[&book.author]
                .iter()
                .filter(|b| Arc::ptr_eq(b, book))
                .count();
            let in_year = index.by_year[&book.year]
                .iter()
                .filter(|b| Arc::ptr_eq(b, book))
                .count();
            assert_eq!((in_author, in_year), (1, 1), "{book}");
        }
        assert!(index.by_author.values().all(|b| !b.is_empty()));
        assert!(index.by_year.values().all(|b| !b.is_empty()));
    }

    #[test]
    fn test_empty_index() {
        let index = BookIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.to_string(), "BookIndex(0 unique books)");
        assert!(index.get_isbn("978-1").is_none());
        assert!(index.by_author("Leo Tolstoy").is_empty());
    }

    #[test]
    fn test_build() {
        let index = built();
        assert_eq!(index.len(), 5);
        assert_eq!(index.by_author("Leo Tolstoy").len(), 2);
        assert_eq!(index.by_year(1967).get(0).unwrap().isbn, "978-3");
        assert_eq!(index.authors().count(), 4);
        assert_consistent(&index);
    }

    #[test]
    fn test_build_rejects_duplicate_isbn() {
        let mut books = sample();
        books.push(Book::new("Copy", "Someone", 2000, "X", "978-2"));
        let err = BookIndex::build(books).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIsbn(isbn) if isbn == "978-2"));
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = built();
        index
            .rebuild(vec![Book::new("T", "A", 2000, "G", "1")])
            .unwrap();
        assert_eq!(index.len(), 1);
        assert!(!index.contains("978-1"));
        assert_eq!(index.authors().collect::<Vec<_>>(), vec!["A"]);
        assert_consistent(&index);
    }

    #[test]
    fn test_failed_rebuild_keeps_index() {
        let mut index = built();
        let dupes = vec![
            Book::new("T", "A", 2000, "G", "1"),
            Book::new("U", "B", 2001, "G", "1"),
        ];
        assert!(index.rebuild(dupes).is_err());
        assert_eq!(index.len(), 5);
        assert_consistent(&index);
    }

    #[test]
    fn test_insert_creates_buckets() {
        let mut index = BookIndex::new();
        assert!(index
            .insert(Book::new("T", "New Author", -44, "G", "1"))
            .is_none());
        assert_eq!(index.by_author("New Author").len(), 1);
        assert_eq!(index.by_year(-44).len(), 1);
        assert_consistent(&index);
    }

    #[test]
    fn test_insert_same_isbn_replaces_and_unlinks() {
        let mut index = built();
        let replaced = index
            .insert(Book::new("War and Peace (2nd ed.)", "L. N. Tolstoy", 1870, "Novel", "978-1"))
            .unwrap();
        assert_eq!(replaced.year, 1869);
        assert_eq!(index.len(), 5);
        assert!(index.by_year(1869).is_empty());
        assert_eq!(index.by_author("Leo Tolstoy").len(), 1);
        assert_eq!(index.get_isbn("978-1").unwrap().year, 1870);
        assert_consistent(&index);
    }

    #[test]
    fn test_remove_cleans_empty_buckets() {
        let mut index = built();
        let removed = index.remove(&sample()[2]).unwrap();
        assert_eq!(removed.title, "The Master and Margarita");
        assert!(!index.authors().any(|a| a == "Mikhail Bulgakov"));
        assert!(!index.years().any(|y| y == 1967));
        assert!(index.by_author("Mikhail Bulgakov").is_empty());
        assert_consistent(&index);
    }

    #[test]
    fn test_remove_keeps_shared_bucket() {
        let mut index = built();
        index.remove(&sample()[0]);
        let tolstoy = index.by_author("Leo Tolstoy");
        assert_eq!(tolstoy.len(), 1);
        assert_eq!(tolstoy.get(0).unwrap().isbn, "978-2");
        assert_consistent(&index);
    }

    #[test]
    fn test_remove_uses_indexed_fields() {
        let mut index = built();
        // Same ISBN, stale author and year
        let stale = Book::new("War and Peace", "Tolstoy", 1800, "Novel", "978-1");
        assert!(index.remove(&stale).is_some());
        assert_eq!(index.by_author("Leo Tolstoy").len(), 1);
        assert!(index.by_year(1869).is_empty());
        assert_consistent(&index);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut index = built();
        assert!(index.remove(&Book::new("", "Leo Tolstoy", 1869, "", "999")).is_none());
        assert_eq!(index.len(), 5);
        assert_eq!(index.by_author("Leo Tolstoy").len(), 2);
    }

    #[test]
    fn test_contains_book_or_isbn() {
        let index = built();
        assert!(index.contains(&sample()[0]));
        assert!(index.contains("978-4"));
        assert!(index.contains(&"978-4".to_string()));
        assert!(!index.contains("nope"));
        assert!(index.contains_book(&Book::new("", "", 0, "", "978-5")));
    }

    #[test]
    fn test_lookup_variants() {
        let index = built();
        assert_eq!(
            index.lookup(&Lookup::Isbn("978-5".into())),
            LookupResult::Book(index.get_isbn("978-5"))
        );
        assert_eq!(index.lookup(&Lookup::Isbn("missing".into())).len(), 0);
        assert_eq!(index.lookup(&Lookup::Author("Leo Tolstoy".into())).len(), 2);
        let none = index.lookup(&Lookup::Year(2999));
        assert!(matches!(&none, LookupResult::Books(books) if books.is_empty()));
        assert!(none.into_collection().is_empty());
        assert_eq!(index.select(Lookup::Year(1866)).unwrap().len(), 1);
    }

    #[test]
    fn test_lookup_parse() {
        assert_eq!(
            "author:Leo Tolstoy".parse::<Lookup>().unwrap(),
            Lookup::Author("Leo Tolstoy".into())
        );
        assert_eq!("YEAR: 1869".parse::<Lookup>().unwrap(), Lookup::Year(1869));
        assert_eq!(
            "isbn:978-1:extra".parse::<Lookup>().unwrap(),
            Lookup::Isbn("978-1:extra".into())
        );
        assert!(matches!(
            "genre:Novel".parse::<Lookup>(),
            Err(CatalogError::UnknownLookupKind(kind)) if kind == "genre"
        ));
        assert!(matches!(
            Lookup::new("GENRE", "Novel"),
            Err(CatalogError::UnknownLookupKind(kind)) if kind == "GENRE"
        ));
        assert!(matches!(
            "978-1".parse::<Lookup>(),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            Lookup::new("year", "soon"),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_lookup_values_are_trimmed() {
        assert_eq!(
            "author: Leo Tolstoy ".parse::<Lookup>().unwrap(),
            Lookup::Author("Leo Tolstoy".into())
        );
        assert_eq!(
            " ISBN : 978-1".parse::<Lookup>().unwrap(),
            Lookup::Isbn("978-1".into())
        );
        let index = built();
        let found = index.lookup(&"Author: Leo Tolstoy".parse().unwrap());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_clear_drops_every_mapping() {
        let mut index = built();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.authors().count(), 0);
        assert_eq!(index.years().count(), 0);
        assert!(!index.contains("978-1"));
        index.insert(sample()[0].clone());
        assert_eq!(index.len(), 1);
        assert_consistent(&index);
    }

    #[test]
    fn test_lookup_display_roundtrip() {
        for lookup in [
            Lookup::Isbn("978-1".into()),
            Lookup::Author("Homer".into()),
            Lookup::Year(-750),
        ] {
            assert_eq!(lookup.to_string().parse::<Lookup>().unwrap(), lookup);
        }
        assert_eq!(Lookup::Year(1).kind(), "year");
    }

    #[test]
    fn test_iteration_follows_insertion() {
        let index = built();
        let isbns: Vec<_> = index.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["978-1", "978-2", "978-3", "978-4", "978-5"]);
        assert_eq!((&index).into_iter().count(), 5);
    }
}
