use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quote_context::config::{
    DEFAULT_CONTEXT_MARGIN, DEFAULT_MAX_FILES_PER_BOOK, DEFAULT_TOLERANCE,
};
use quote_context::{BookFormat, MatchParams, RunConfig, RunDriver};

#[derive(Parser, Debug)]
#[command(name = "quote-context")]
#[command(about = "Find quotes in Project Gutenberg texts and store the surrounding sentences as context")]
#[command(version)]
struct Args {
    /// CSV catalog with Book Num, Book Title and Author columns
    #[arg(long)]
    catalog: PathBuf,

    /// Root directory of book text files
    #[arg(long)]
    books_dir: PathBuf,

    /// SQLite database holding the quotes table
    #[arg(long)]
    database: PathBuf,

    /// Quotes table (columns: id, quote, author, context)
    #[arg(long, default_value = "quotes_cleaned")]
    table: String,

    /// Checkpoint file recording the last processed quote id
    #[arg(long, default_value = "checkpoint.json")]
    checkpoint: PathBuf,

    /// Extension of book files under the books directory
    #[arg(long, default_value = "txt")]
    book_extension: String,

    /// How book files store their text
    #[arg(long, value_enum, default_value_t = BookFormat::PlainText)]
    book_format: BookFormat,

    /// Share of the quote length allowed as edit distance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Characters of context requested on each side of a match
    #[arg(long, default_value_t = DEFAULT_CONTEXT_MARGIN)]
    context_margin: usize,

    /// Maximum source files examined per book
    #[arg(long, default_value_t = DEFAULT_MAX_FILES_PER_BOOK)]
    max_files_per_book: usize,

    /// Worker threads for window scoring (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Score windows on a single thread
    #[arg(long)]
    sequential: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,
}

impl Args {
    fn into_config(self) -> RunConfig {
        RunConfig {
            catalog_path: self.catalog,
            books_dir: self.books_dir,
            book_extension: self.book_extension,
            book_format: self.book_format,
            database_path: self.database,
            quotes_table: self.table,
            checkpoint_path: self.checkpoint,
            stats_out: self.stats_out,
            no_progress: self.no_progress,
            match_params: MatchParams {
                tolerance: self.tolerance,
                context_margin: self.context_margin,
                max_files_per_book: self.max_files_per_book,
                parallel: !self.sequential,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    info!("Starting quote-context");
    info!(?args, "Parsed CLI arguments");

    if !(0.0..=1.0).contains(&args.tolerance) {
        anyhow::bail!("Tolerance must be between 0 and 1, got {}", args.tolerance);
    }

    let threads = args.threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    let config = args.into_config();
    let driver = RunDriver::from_config(&config).await?;
    let stats = driver.run().await;
    driver.close().await;
    let stats = stats?;

    stats.write_json(&config.stats_out).await?;

    println!("quote-context v{} - run complete", env!("CARGO_PKG_VERSION"));
    println!("  Quotes processed: {}", stats.quotes_processed);
    println!("  Context found: {}", stats.quotes_found);
    println!("  Not found: {}", stats.quotes_not_found + stats.quotes_no_candidates);
    if stats.quotes_skipped > 0 {
        println!("  Skipped (malformed): {}", stats.quotes_skipped);
    }
    println!("  Stats written to {}", config.stats_out.display());

    Ok(())
}
