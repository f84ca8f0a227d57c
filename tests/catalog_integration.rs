//! Integration tests for the catalog facade

mod common;

use bookcat::{
    Book, BookCollection, BookIndex, BookSet, Catalog, CatalogError, Lookup, LookupResult,
};
use common::{assert_in_sync, filled_catalog, sample_books};
use pretty_assertions::assert_eq;

#[test]
fn test_tolstoy_scenario() {
    let mut catalog = Catalog::new();
    let war_and_peace = Book::new("War and Peace", "Tolstoy", 1869, "Novel", "978-1");
    let anna_karenina = Book::new("Anna Karenina", "Tolstoy", 1877, "Novel", "978-2");
    catalog.add(war_and_peace.clone()).unwrap();
    catalog.add(anna_karenina).unwrap();

    assert_eq!(catalog.search_by_author("Tolstoy").len(), 2);

    catalog.remove(&war_and_peace);
    assert!(catalog.search_by_year(1869).is_empty());
    assert!(catalog.search_by_isbn("978-1").is_none());
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.indexed_len(), 1);
    assert!(!catalog.indexes().years().any(|year| year == 1869));
    assert_eq!(catalog.indexes().authors().collect::<Vec<_>>(), vec!["Tolstoy"]);
}

#[test]
fn test_duplicate_key_scenario() {
    let mut catalog = Catalog::new();
    catalog.add(Book::new("First", "A", 2000, "G", "X")).unwrap();
    let before = catalog.to_string();

    let err = catalog
        .add(Book::new("Second", "B", 2001, "H", "X"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateIsbn(ref isbn) if isbn == "X"));
    assert_eq!(catalog.to_string(), before);
    assert_eq!(catalog.search_by_isbn("X").unwrap().title, "First");
    assert!(catalog.search_by_author("B").is_empty());
    assert!(catalog.search_by_year(2001).is_empty());
}

#[test]
fn test_round_trip() {
    let mut catalog = filled_catalog();
    let book = Book::new("The Idiot", "Fyodor Dostoevsky", 1869, "Novel", "978-6");

    catalog.add(book.clone()).unwrap();
    assert_eq!(*catalog.search_by_isbn("978-6").unwrap(), book);

    catalog.remove(&book);
    assert!(catalog.search_by_isbn("978-6").is_none());
    assert_in_sync(&catalog);
}

#[test]
fn test_removing_last_book_of_author_and_year() {
    let mut catalog = filled_catalog();
    let pushkin = &sample_books()[4];
    catalog.remove(pushkin);

    assert!(catalog.search_by_author("Alexander Pushkin").is_empty());
    assert!(catalog.search_by_year(1833).is_empty());
    assert!(!catalog.indexes().authors().any(|a| a == "Alexander Pushkin"));
    assert!(!catalog.indexes().years().any(|y| y == 1833));
    assert_in_sync(&catalog);
}

#[test]
fn test_idempotent_removal() {
    let mut catalog = filled_catalog();
    let ghost = Book::new("Nonexistent", "Unknown", 2000, "Fantasy", "999");
    catalog.remove(&ghost);
    catalog.remove(&ghost);
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.indexed_len(), 5);
    assert_in_sync(&catalog);
}

#[test]
fn test_removal_by_equal_key_only() {
    let mut catalog = filled_catalog();
    // Only the ISBN matters for identity
    let alias = Book::new("Voina i mir", "L. Tolstoy", 1868, "Epic", "978-1");
    assert_eq!(catalog.remove(&alias).unwrap().title, "War and Peace");
    assert_eq!(catalog.search_by_author("Leo Tolstoy").len(), 1);
    assert!(catalog.search_by_year(1869).is_empty());
    assert_in_sync(&catalog);
}

#[test]
fn test_search_results_are_fresh_collections() {
    let catalog = filled_catalog();
    let mut tolstoy = catalog.search_by_author("Leo Tolstoy");
    tolstoy.add(Book::new("Stray", "Leo Tolstoy", 1900, "Novel", "978-9"));
    assert_eq!(catalog.search_by_author("Leo Tolstoy").len(), 2);
}

#[test]
fn test_seeded_catalog_matches_added_catalog() {
    let seeded = Catalog::with_books(BookCollection::from(sample_books())).unwrap();
    let added = filled_catalog();
    assert_eq!(seeded.to_string(), added.to_string());
    assert_eq!(seeded.books(), added.books());
    assert_in_sync(&seeded);
}

#[test]
fn test_index_lookup_through_catalog() {
    let catalog = filled_catalog();
    let result = catalog
        .indexes()
        .lookup(&"author:Fyodor Dostoevsky".parse::<Lookup>().unwrap());
    let LookupResult::Books(books) = result else {
        panic!("author lookups return collections");
    };
    assert_eq!(books.get(0).unwrap().title, "Crime and Punishment");
}

#[test]
fn test_book_set_is_shared_by_collection_and_index() {
    fn summary<S: BookSet>(set: &S) -> (String, usize) {
        (set.to_string(), set.iter_books().count())
    }

    let catalog = filled_catalog();
    let index: &BookIndex = catalog.indexes();
    assert_eq!(summary(catalog.books()), ("BookCollection(5 books)".to_string(), 5));
    assert_eq!(summary(index), ("BookIndex(5 unique books)".to_string(), 5));
    assert!(index.contains_book(&sample_books()[3]));
    assert!(catalog.books().contains_book(&sample_books()[3]));
}

#[test]
fn test_summary_reports_both_counts() {
    let mut catalog = filled_catalog();
    assert_eq!(catalog.to_string(), "Catalog(5 books, 5 indexed)");
    catalog.books_mut().add(Book::new("Extra", "Someone", 2020, "Novel", "978-7"));
    assert_eq!(catalog.to_string(), "Catalog(6 books, 5 indexed)");
    catalog.resync_indexes().unwrap();
    assert_eq!(catalog.to_string(), "Catalog(6 books, 6 indexed)");
    assert_in_sync(&catalog);
}

#[test]
fn test_extreme_years_are_accepted() {
    let mut catalog = Catalog::new();
    catalog.add(Book::new("Iliad", "Homer", -750, "Epic", "0-1")).unwrap();
    catalog
        .add(Book::new("Far Future", "Nobody", i32::MAX, "Science fiction", "0-2"))
        .unwrap();
    assert_eq!(catalog.search_by_year(-750).len(), 1);
    assert_eq!(catalog.search_by_year(i32::MAX).len(), 1);
}
