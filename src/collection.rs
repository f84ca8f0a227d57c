//! Insertion-ordered collection of shared books.
//!
//! [`BookCollection`] is the primary container of a [`Catalog`](crate::Catalog) and
//! the result type of every multi-book search. It holds [`Arc<Book>`] handles, so the
//! same book can sit in a collection and an index at once without being copied.
//!
//! Membership and removal compare books by ISBN. The collection itself does not
//! enforce uniqueness; that is a catalog-level policy.
//!
//! # Examples
//!
//! ```
//! use bookcat::{Book, BookCollection, SliceSpec};
//!
//! let mut books = BookCollection::new();
//! books.add(Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1"));
//! books.add(Book::new("Anna Karenina", "Leo Tolstoy", 1877, "Novel", "978-2"));
//! books.add(Book::new("Eugene Onegin", "Alexander Pushkin", 1833, "Poem", "978-5"));
//!
//! assert_eq!(books.get(-1).unwrap().isbn, "978-5");
//! let tail = books.slice(SliceSpec::from(1..));
//! assert_eq!(tail.len(), 2);
//! ```

use crate::book::Book;
use crate::book_set::BookSet;
use crate::error::{CatalogError, Result};
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::sync::Arc;

/// An ordered sequence of shared books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCollection {
    books: Vec<Arc<Book>>,
}

/// A `start:stop:step` selection over a collection.
///
/// Every part is optional. Negative `start` and `stop` count from the end, bounds are
/// clamped to the collection, and a negative `step` walks backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSpec {
    /// First position (inclusive)
    pub start: Option<isize>,
    /// Last position (exclusive)
    pub stop: Option<isize>,
    /// Stride; `None` means 1. Zero is rejected.
    pub step: Option<isize>,
}

impl SliceSpec {
    /// Create a slice with the given bounds and a step of 1
    #[must_use]
    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        SliceSpec {
            start,
            stop,
            step: None,
        }
    }

    /// Set the stride
    #[must_use]
    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve the slice against a length, yielding the selected positions in order.
    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(CatalogError::Validation(
                "slice step cannot be zero".to_string(),
            ));
        }

        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };
        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });

        let mut positions = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            let Ok(pos) = usize::try_from(i) else {
                break;
            };
            positions.push(pos);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(positions)
    }
}

fn bound(value: usize) -> Option<isize> {
    Some(isize::try_from(value).unwrap_or(isize::MAX))
}

impl From<Range<usize>> for SliceSpec {
    fn from(range: Range<usize>) -> Self {
        SliceSpec::new(bound(range.start), bound(range.end))
    }
}

impl From<RangeFrom<usize>> for SliceSpec {
    fn from(range: RangeFrom<usize>) -> Self {
        SliceSpec::new(bound(range.start), None)
    }
}

impl From<RangeTo<usize>> for SliceSpec {
    fn from(range: RangeTo<usize>) -> Self {
        SliceSpec::new(None, bound(range.end))
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        SliceSpec::default()
    }
}

/// Selector accepted by [`BookCollection`]'s [`BookSet::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSelector {
    /// A single position; negative values count from the end
    Position(isize),
    /// A sub-sequence
    Slice(SliceSpec),
}

impl From<isize> for CollectionSelector {
    fn from(position: isize) -> Self {
        CollectionSelector::Position(position)
    }
}

impl From<SliceSpec> for CollectionSelector {
    fn from(slice: SliceSpec) -> Self {
        CollectionSelector::Slice(slice)
    }
}

/// Result of selecting from a [`BookCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A single book, from a position selector
    Book(Arc<Book>),
    /// A new collection, from a slice selector
    Books(BookCollection),
}

impl BookCollection {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        BookCollection { books: Vec::new() }
    }

    /// Append a book at the end. Duplicates are allowed.
    pub fn add(&mut self, book: impl Into<Arc<Book>>) {
        self.books.push(book.into());
    }

    /// Remove the first book with the same ISBN as `book`.
    ///
    /// Returns the removed handle, or `None` if no such book was present.
    pub fn remove(&mut self, book: &Book) -> Option<Arc<Book>> {
        let pos = self.books.iter().position(|held| held.as_ref() == book)?;
        Some(self.books.remove(pos))
    }

    /// Get the book at `index`; `-1` is the last book.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IndexOutOfBounds`] if `index` falls outside the collection.
    pub fn get(&self, index: isize) -> Result<&Arc<Book>> {
        let len = self.books.len();
        let signed_len = isize::try_from(len).unwrap_or(isize::MAX);
        let resolved = if index < 0 { index + signed_len } else { index };
        usize::try_from(resolved)
            .ok()
            .and_then(|pos| self.books.get(pos))
            .ok_or(CatalogError::IndexOutOfBounds { index, len })
    }

    /// Select a sub-sequence into a new collection.
    ///
    /// A zero step selects nothing; use [`try_slice`](Self::try_slice) to reject it.
    #[must_use]
    pub fn slice(&self, spec: SliceSpec) -> BookCollection {
        self.try_slice(spec).unwrap_or_default()
    }

    /// Select a sub-sequence into a new collection.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the step is zero.
    pub fn try_slice(&self, spec: SliceSpec) -> Result<BookCollection> {
        let positions = spec.positions(self.books.len())?;
        Ok(positions
            .into_iter()
            .map(|pos| Arc::clone(&self.books[pos]))
            .collect())
    }

    /// A new collection holding `self` followed by `other`.
    ///
    /// `other` may be another collection or any slice or vector of book handles.
    #[must_use]
    pub fn concat<B: AsRef<[Arc<Book>]>>(&self, other: B) -> BookCollection {
        let other = other.as_ref();
        let mut books = Vec::with_capacity(self.books.len() + other.len());
        books.extend(self.books.iter().cloned());
        books.extend(other.iter().cloned());
        BookCollection { books }
    }

    /// Whether a book with the same ISBN is present. Linear scan.
    #[must_use]
    pub fn contains(&self, book: &Book) -> bool {
        self.books.iter().any(|held| held.as_ref() == book)
    }

    /// Number of books
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Iterate in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Book>> {
        self.books.iter()
    }

    /// The books as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Arc<Book>] {
        &self.books
    }
}

impl BookSet for BookCollection {
    type Selector = CollectionSelector;
    type Output = Selection;

    fn iter_books(&self) -> Box<dyn Iterator<Item = &Arc<Book>> + '_> {
        Box::new(self.books.iter())
    }

    fn len(&self) -> usize {
        self.books.len()
    }

    fn select(&self, selector: CollectionSelector) -> Result<Selection> {
        match selector {
            CollectionSelector::Position(index) => {
                self.get(index).map(|book| Selection::Book(Arc::clone(book)))
            }
            CollectionSelector::Slice(spec) => self.try_slice(spec).map(Selection::Books),
        }
    }

    fn contains_book(&self, book: &Book) -> bool {
        self.contains(book)
    }
}

impl fmt::Display for BookCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookCollection({} books)", self.books.len())
    }
}

impl AsRef<[Arc<Book>]> for BookCollection {
    fn as_ref(&self) -> &[Arc<Book>] {
        &self.books
    }
}

impl std::ops::Add<&BookCollection> for &BookCollection {
    type Output = BookCollection;

    fn add(self, other: &BookCollection) -> BookCollection {
        self.concat(other)
    }
}

impl std::ops::Add<Vec<Arc<Book>>> for &BookCollection {
    type Output = BookCollection;

    fn add(self, other: Vec<Arc<Book>>) -> BookCollection {
        self.concat(other)
    }
}

impl std::ops::Add for BookCollection {
    type Output = BookCollection;

    fn add(mut self, other: BookCollection) -> BookCollection {
        self.books.extend(other.books);
        self
    }
}

impl From<Vec<Arc<Book>>> for BookCollection {
    fn from(books: Vec<Arc<Book>>) -> Self {
        BookCollection { books }
    }
}

impl From<Vec<Book>> for BookCollection {
    fn from(books: Vec<Book>) -> Self {
        books.into_iter().collect()
    }
}

impl FromIterator<Arc<Book>> for BookCollection {
    fn from_iter<I: IntoIterator<Item = Arc<Book>>>(iter: I) -> Self {
        BookCollection {
            books: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Book> for BookCollection {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        iter.into_iter().map(Arc::new).collect()
    }
}

impl Extend<Arc<Book>> for BookCollection {
    fn extend<I: IntoIterator<Item = Arc<Book>>>(&mut self, iter: I) {
        self.books.extend(iter);
    }
}

impl IntoIterator for BookCollection {
    type Item = Arc<Book>;
    type IntoIter = std::vec::IntoIter<Arc<Book>>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.into_iter()
    }
}

impl<'a> IntoIterator for &'a BookCollection {
    type Item = &'a Arc<Book>;
    type IntoIter = std::slice::Iter<'a, Arc<Book>>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}
