#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # bookcat: an indexed book catalog
//!
//! An in-memory book catalog: an insertion-ordered collection of books plus ISBN,
//! author and year indexes, kept consistent by the [`Catalog`] facade.
//!
//! ## Quick Start
//!
//! ```
//! use bookcat::{Book, Catalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut catalog = Catalog::new();
//! catalog.add(Book::new("War and Peace", "Leo Tolstoy", 1869, "Novel", "978-1"))?;
//! catalog.add(Book::new("Anna Karenina", "Leo Tolstoy", 1877, "Novel", "978-2"))?;
//!
//! assert_eq!(catalog.search_by_author("Leo Tolstoy").len(), 2);
//!
//! let first = catalog.search_by_isbn("978-1").expect("indexed");
//! catalog.remove(&first);
//! assert!(catalog.search_by_year(1869).is_empty());
//! assert_eq!(catalog.len(), catalog.indexed_len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`book`] — The [`Book`] entity, compared by ISBN
//! - [`collection`] — [`BookCollection`], the ordered container and search result type
//! - [`index`] — [`BookIndex`] with ISBN, author and year mappings
//! - [`book_set`] — The [`BookSet`] trait shared by collections and indexes
//! - [`catalog`] — The [`Catalog`] facade
//! - [`sample`] — Sample data loading for drivers
//! - [`simulation`] — Seeded random simulation driver
//! - [`error`] — Error types and result type

pub mod book;
pub mod book_set;
pub mod catalog;
pub mod collection;
pub mod error;
pub mod index;
pub mod sample;
pub mod simulation;

pub use book::{Book, IsbnKey};
pub use book_set::BookSet;
pub use catalog::Catalog;
pub use collection::{BookCollection, CollectionSelector, Selection, SliceSpec};
pub use error::{CatalogError, Result};
pub use index::{BookIndex, Lookup, LookupResult};
pub use sample::SampleData;
pub use simulation::{
    Event, Simulation, SimulationConfig, SimulationReport, StepDetail, StepOutcome,
};
