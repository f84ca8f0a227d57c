//! bookcat - command line front end for the book catalog
//!
//! Loads a sample data set, seeds a catalog from it and runs searches or a seeded
//! simulation against it.

use anyhow::{Context, Result};
use bookcat::{
    BookCollection, Catalog, Lookup, LookupResult, SampleData, Simulation, SimulationConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "bookcat",
    about = "In-memory book catalog with ISBN, author and year indexes",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Sample data JSON file (defaults to the bundled data set)
    #[clap(long, global = true)]
    data: Option<PathBuf>,

    /// Set log level (RUST_LOG takes precedence)
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a seeded random simulation
    Simulate {
        /// Number of steps
        #[clap(long, default_value_t = 20)]
        steps: usize,

        /// RNG seed; random when omitted
        #[clap(long)]
        seed: Option<u64>,

        /// Sample books added before the first step
        #[clap(long, default_value_t = 10)]
        initial_books: usize,
    },
    /// Search a catalog holding every sample book, e.g. `author:Leo Tolstoy`
    Search {
        /// Lookup in `kind:value` form; kind is isbn, author, year or genre
        query: String,
    },
    /// Print catalog counts
    Stats,
}

fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_sample(path: Option<&PathBuf>) -> Result<SampleData> {
    match path {
        Some(path) => SampleData::from_path(path)
            .with_context(|| format!("failed to load sample data from {}", path.display())),
        None => SampleData::bundled().context("failed to load bundled sample data"),
    }
}

fn full_catalog(sample: &SampleData) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    for book in sample.create_books() {
        catalog
            .add(book)
            .context("sample data contains a duplicate ISBN")?;
    }
    info!(books = catalog.len(), "catalog ready");
    Ok(catalog)
}

fn print_books(out: &mut impl Write, books: &BookCollection) -> io::Result<()> {
    writeln!(out, "Found: {}", books.len())?;
    for book in books {
        writeln!(out, "  - {book} [{}] ISBN {}", book.genre, book.isbn)?;
    }
    Ok(())
}

/// The genre named by a `genre:value` query, matched like the indexed kinds.
fn genre_query(query: &str) -> Option<&str> {
    let (kind, value) = query.split_once(':')?;
    kind.trim()
        .eq_ignore_ascii_case("genre")
        .then_some(value.trim())
}

fn search_command(sample: &SampleData, query: &str) -> Result<()> {
    let catalog = full_catalog(sample)?;
    let mut out = io::stdout().lock();

    // Genre is not indexed, so it is answered by a catalog scan
    if let Some(genre) = genre_query(query) {
        print_books(&mut out, &catalog.search_by_genre(genre))?;
        return Ok(());
    }

    let lookup: Lookup = query
        .parse()
        .with_context(|| format!("invalid query {query:?}"))?;
    debug!(%lookup, "running lookup");
    match catalog.indexes().lookup(&lookup) {
        LookupResult::Book(Some(book)) => {
            writeln!(out, "{book} [{}] ISBN {}", book.genre, book.isbn)?;
        }
        LookupResult::Book(None) => writeln!(out, "Not found")?,
        LookupResult::Books(books) => print_books(&mut out, &books)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let sample = load_sample(cli.data.as_ref())?;

    match cli.command {
        Command::Simulate {
            steps,
            seed,
            initial_books,
        } => {
            let config = SimulationConfig {
                steps,
                seed,
                initial_books,
            };
            let mut simulation =
                Simulation::new(config, sample).context("invalid simulation settings")?;
            simulation.run_to(&mut io::stdout().lock())?;
            Ok(())
        }
        Command::Search { query } => search_command(&sample, &query),
        Command::Stats => {
            let catalog = full_catalog(&sample)?;
            println!("{catalog}");
            println!("Authors: {}", catalog.indexes().authors().count());
            println!("Years: {}", catalog.indexes().years().count());
            Ok(())
        }
    }
}
