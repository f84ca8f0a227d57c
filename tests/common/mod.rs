//! Common test helpers and utilities shared across test suite.

use bookcat::{Book, Catalog};

/// Creates the five classic novels used throughout the catalog tests.
///
/// Two share an author (Tolstoy) and three share a genre (Novel).
#[allow(dead_code)]
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1"),
        Book::new("Anna Karenina", "Leo Tolstoy", 1877, "Novel", "978-2"),
        Book::new("The Master and Margarita", "Mikhail Bulgakov", 1967, "Fantasy", "978-3"),
        Book::new("Crime and Punishment", "Fyodor Dostoevsky", 1866, "Novel", "978-4"),
        Book::new("Eugene Onegin", "Alexander Pushkin", 1833, "Poem", "978-5"),
    ]
}

/// Creates a catalog holding every book from [`sample_books`].
#[allow(dead_code)]
pub fn filled_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for book in sample_books() {
        catalog.add(book).expect("sample ISBNs are unique");
    }
    catalog
}

/// Checks that the collection and the index describe the same set of books.
#[allow(dead_code)]
pub fn assert_in_sync(catalog: &Catalog) {
    assert_eq!(catalog.len(), catalog.indexed_len());
    for book in catalog.books() {
        let indexed = catalog
            .search_by_isbn(&book.isbn)
            .unwrap_or_else(|| panic!("{} missing from index", book.isbn));
        assert!(std::sync::Arc::ptr_eq(&indexed, book));
        assert_eq!(
            catalog
                .search_by_author(&book.author)
                .iter()
                .filter(|b| b.isbn == book.isbn)
                .count(),
            1
        );
        assert_eq!(
            catalog
                .search_by_year(book.year)
                .iter()
                .filter(|b| b.isbn == book.isbn)
                .count(),
            1
        );
    }
}
