//! Seeded random simulation over a catalog.
//!
//! The simulation seeds a [`Catalog`] from [`SampleData`], then runs a number of
//! randomly chosen [`Event`]s against it: adding and removing books and searching by
//! author, genre, year or a nonexistent ISBN. It only uses the catalog's public
//! operations.
//!
//! With a fixed seed the whole run is deterministic, so two runs produce identical
//! reports and identical rendered text.
//!
//! # Examples
//!
//! ```
//! use bookcat::{SampleData, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig { steps: 5, seed: Some(42), ..Default::default() };
//! let first = Simulation::new(config.clone(), SampleData::bundled()?)?.run();
//! let second = Simulation::new(config, SampleData::bundled()?)?.run();
//! assert_eq!(first.to_string(), second.to_string());
//! # Ok::<(), bookcat::CatalogError>(())
//! ```

use crate::book::Book;
use crate::catalog::Catalog;
use crate::collection::BookCollection;
use crate::error::{CatalogError, Result};
use crate::sample::SampleData;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Configuration for a simulation run.
///
/// # Examples
///
/// ```
/// use bookcat::SimulationConfig;
///
/// let config = SimulationConfig { steps: 100, seed: Some(7), ..Default::default() };
/// assert_eq!(config.initial_books, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of random events to run
    pub steps: usize,
    /// RNG seed; `None` seeds from the operating system
    pub seed: Option<u64>,
    /// How many sample books to add before the first step
    pub initial_books: usize,
}

impl SimulationConfig {
    /// Upper bound on `steps`
    pub const MAX_STEPS: usize = 1_000_000;

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if `steps` exceeds [`Self::MAX_STEPS`].
    pub fn validate(&self) -> Result<()> {
        if self.steps > Self::MAX_STEPS {
            return Err(CatalogError::Validation(format!(
                "steps must be at most {}, got {}",
                Self::MAX_STEPS,
                self.steps
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            steps: 20,
            seed: None,
            initial_books: 10,
        }
    }
}

/// A kind of simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Add a sample book not yet in the catalog
    AddBook,
    /// Remove a random catalog book
    RemoveBook,
    /// Search by a random author
    SearchByAuthor,
    /// Search by a random genre
    SearchByGenre,
    /// Search by a random year
    SearchByYear,
    /// Search for an ISBN that should not exist
    SearchMissing,
}

impl Event {
    /// Every event, in the order they are drawn from
    pub const ALL: [Event; 6] = [
        Event::AddBook,
        Event::RemoveBook,
        Event::SearchByAuthor,
        Event::SearchByGenre,
        Event::SearchByYear,
        Event::SearchMissing,
    ];
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Event::AddBook => "add book",
            Event::RemoveBook => "remove book",
            Event::SearchByAuthor => "search by author",
            Event::SearchByGenre => "search by genre",
            Event::SearchByYear => "search by year",
            Event::SearchMissing => "search for missing book",
        };
        f.write_str(name)
    }
}

/// What happened during one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepDetail {
    /// A book was added
    Added(Arc<Book>),
    /// Every sample book is already in the catalog
    NothingToAdd,
    /// The catalog refused the book
    Rejected(String),
    /// A book was removed
    Removed(Arc<Book>),
    /// The catalog was empty
    NothingToRemove,
    /// A search ran
    Search {
        /// Human readable description of the search term
        term: String,
        /// Matching books
        results: BookCollection,
    },
    /// A nonexistent ISBN was looked up
    Missing {
        /// The ISBN searched for
        isbn: String,
        /// What the catalog returned; `None` is the expected answer
        found: Option<Arc<Book>>,
    },
    /// The sample data has no terms for this search
    NoTerms,
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// 1-based step number
    pub step: usize,
    /// The event drawn
    pub event: Event,
    /// What happened
    pub detail: StepDetail,
    /// Catalog size after the step
    pub books_after: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// The configuration the run used
    pub config: SimulationConfig,
    /// Books added before the first step
    pub initial: Vec<Arc<Book>>,
    /// Steps in execution order
    pub outcomes: Vec<StepOutcome>,
    /// Collection size at the end
    pub final_books: usize,
    /// Unique indexed ISBNs at the end
    pub final_indexed: usize,
}

/// A seeded simulation driver.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    sample: SampleData,
    catalog: Catalog,
    rng: StdRng,
}

impl Simulation {
    /// Create a simulation over an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the configuration is invalid.
    pub fn new(config: SimulationConfig, sample: SampleData) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Simulation {
            config,
            sample,
            catalog: Catalog::new(),
            rng,
        })
    }

    /// The catalog being driven
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Seed the catalog and run every step.
    pub fn run(&mut self) -> SimulationReport {
        let mut initial = Vec::new();
        for book in self.sample.books.iter().take(self.config.initial_books) {
            match self.catalog.add(book.clone()) {
                Ok(added) => initial.push(added),
                Err(err) => debug!(%err, "skipped initial book"),
            }
        }

        let mut outcomes = Vec::with_capacity(self.config.steps);
        for step in 1..=self.config.steps {
            let event = Event::ALL[self.rng.gen_range(0..Event::ALL.len())];
            let detail = self.execute(event);
            debug!(step, %event, books = self.catalog.len(), "simulation step");
            outcomes.push(StepOutcome {
                step,
                event,
                detail,
                books_after: self.catalog.len(),
            });
        }

        SimulationReport {
            config: self.config.clone(),
            initial,
            outcomes,
            final_books: self.catalog.len(),
            final_indexed: self.catalog.indexed_len(),
        }
    }

    /// Run and write the rendered report to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IoError`] if writing fails.
    pub fn run_to<W: Write>(&mut self, writer: &mut W) -> Result<SimulationReport> {
        let report = self.run();
        write!(writer, "{report}")?;
        Ok(report)
    }

    fn execute(&mut self, event: Event) -> StepDetail {
        match event {
            Event::AddBook => self.add_book(),
            Event::RemoveBook => match self.catalog.pick_random(&mut self.rng) {
                Some(book) => {
                    self.catalog.remove(&book);
                    StepDetail::Removed(book)
                }
                None => StepDetail::NothingToRemove,
            },
            Event::SearchByAuthor => match self.sample.authors.choose(&mut self.rng) {
                Some(author) => StepDetail::Search {
                    term: format!("author '{author}'"),
                    results: self.catalog.search_by_author(author),
                },
                None => StepDetail::NoTerms,
            },
            Event::SearchByGenre => match self.sample.genres.choose(&mut self.rng) {
                Some(genre) => StepDetail::Search {
                    term: format!("genre '{genre}'"),
                    results: self.catalog.search_by_genre(genre),
                },
                None => StepDetail::NoTerms,
            },
            Event::SearchByYear => match self.sample.years.choose(&mut self.rng) {
                Some(&year) => StepDetail::Search {
                    term: format!("year {year}"),
                    results: self.catalog.search_by_year(year),
                },
                None => StepDetail::NoTerms,
            },
            Event::SearchMissing => match self.sample.fake_isbns.choose(&mut self.rng) {
                Some(isbn) => StepDetail::Missing {
                    isbn: isbn.clone(),
                    found: self.catalog.search_by_isbn(isbn),
                },
                None => StepDetail::NoTerms,
            },
        }
    }

    fn add_book(&mut self) -> StepDetail {
        let indexes = self.catalog.indexes();
        let available: Vec<&Book> = self
            .sample
            .books
            .iter()
            .filter(|book| !indexes.contains(*book))
            .collect();
        let Some(&book) = available.choose(&mut self.rng) else {
            return StepDetail::NothingToAdd;
        };
        match self.catalog.add(book.clone()) {
            Ok(added) => StepDetail::Added(added),
            Err(err) => StepDetail::Rejected(err.to_string()),
        }
    }
}

fn write_books(f: &mut fmt::Formatter<'_>, books: &BookCollection) -> fmt::Result {
    writeln!(f, "  found: {}", books.len())?;
    for book in books {
        writeln!(f, "    - {book}")?;
    }
    Ok(())
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Step {}: {}", self.step, self.event)?;
        match &self.detail {
            StepDetail::Added(book) => {
                writeln!(f, "  added: {book} (books: {})", self.books_after)
            }
            StepDetail::NothingToAdd => writeln!(f, "  every sample book is already present"),
            StepDetail::Rejected(reason) => writeln!(f, "  could not add book: {reason}"),
            StepDetail::Removed(book) => {
                writeln!(f, "  removed: {book} (books: {})", self.books_after)
            }
            StepDetail::NothingToRemove => writeln!(f, "  catalog is empty, nothing to remove"),
            StepDetail::Search { term, results } => {
                writeln!(f, "  searching {term}")?;
                write_books(f, results)
            }
            StepDetail::Missing { isbn, found: None } => {
                writeln!(f, "  ISBN {isbn}: not found (expected)")
            }
            StepDetail::Missing {
                isbn,
                found: Some(book),
            } => writeln!(f, "  ISBN {isbn}: unexpectedly found {book}"),
            StepDetail::NoTerms => writeln!(f, "  no search terms in sample data"),
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seed = self
            .config
            .seed
            .map_or_else(|| "random".to_string(), |seed| seed.to_string());
        writeln!(f, "Simulation: steps={}, seed={seed}", self.config.steps)?;
        writeln!(f)?;
        for book in &self.initial {
            writeln!(f, "Initial: {book}")?;
        }
        writeln!(f, "Start: {} books", self.initial.len())?;
        writeln!(f)?;
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        writeln!(f, "Final: {} books", self.final_books)?;
        writeln!(f, "Unique books indexed: {}", self.final_indexed)
    }
}
