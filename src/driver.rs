// Batch loop: fetch pending quotes, resolve each one in turn, store any context found,
// and advance the checkpoint once the quote is fully handled.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::book_store::DirectoryBookStore;
use crate::catalog::Catalog;
use crate::checkpoint::Checkpoint;
use crate::config::{MatchParams, RunConfig};
use crate::quote_store::QuoteStore;
use crate::resolver::{QuoteResolver, Resolution};

/// Outcome recorded for one quote
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Found,
    NotFound,
    NoCandidateBooks,
    /// Row lacked quote text or author
    Skipped,
}

/// Per-quote statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuoteStats {
    pub id: i64,
    pub status: QuoteStatus,
    pub book_id: Option<String>,
    pub distance: Option<usize>,
    pub context_chars: Option<usize>,
    pub processing_time_ms: u64,
}

/// Aggregate statistics for one run, written to the stats file
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    /// Seconds since the Unix epoch when the run started
    pub run_start: u64,
    pub resumed_after: Option<i64>,
    pub total_processing_time_ms: u64,
    pub quotes_processed: u64,
    pub quotes_found: u64,
    pub quotes_not_found: u64,
    pub quotes_no_candidates: u64,
    pub quotes_skipped: u64,
    pub match_params: MatchParams,
    pub quote_stats: Vec<QuoteStats>,
}

impl RunStats {
    fn new(resumed_after: Option<i64>, match_params: MatchParams) -> Self {
        Self {
            run_start: std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            resumed_after,
            total_processing_time_ms: 0,
            quotes_processed: 0,
            quotes_found: 0,
            quotes_not_found: 0,
            quotes_no_candidates: 0,
            quotes_skipped: 0,
            match_params,
            quote_stats: Vec::new(),
        }
    }

    fn record(&mut self, stats: QuoteStats) {
        self.quotes_processed += 1;
        match stats.status {
            QuoteStatus::Found => self.quotes_found += 1,
            QuoteStatus::NotFound => self.quotes_not_found += 1,
            QuoteStatus::NoCandidateBooks => self.quotes_no_candidates += 1,
            QuoteStatus::Skipped => self.quotes_skipped += 1,
        }
        self.quote_stats.push(stats);
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write stats to {}", path.display()))
    }
}

/// Sequential quote processor
pub struct RunDriver {
    quotes: QuoteStore,
    resolver: QuoteResolver,
    checkpoint_path: PathBuf,
    show_progress: bool,
}

impl RunDriver {
    pub fn new(quotes: QuoteStore, resolver: QuoteResolver, checkpoint_path: PathBuf) -> Self {
        Self {
            quotes,
            resolver,
            checkpoint_path,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Open every collaborator named by `config`. Any failure here aborts the run
    /// before a single quote is touched.
    pub async fn from_config(config: &RunConfig) -> Result<Self> {
        let catalog = Catalog::load_csv(&config.catalog_path)?;
        let books = DirectoryBookStore::open(&config.books_dir, &config.book_extension, config.book_format)?;
        let quotes = QuoteStore::connect(&config.database_path, &config.quotes_table).await?;

        let resolver = QuoteResolver::new(Arc::new(catalog), Arc::new(books), config.match_params.clone());
        Ok(Self::new(quotes, resolver, config.checkpoint_path.clone()).with_progress(!config.no_progress))
    }

    /// Process every pending quote after the checkpoint
    pub async fn run(&self) -> Result<RunStats> {
        let run_start = Instant::now();
        let resume_after = Checkpoint::load(&self.checkpoint_path)
            .await?
            .map(|c| c.last_processed_id);

        match resume_after {
            Some(id) => info!("Resuming after quote id {}", id),
            None => info!("No checkpoint found, starting from the beginning"),
        }

        let rows = self.quotes.pending_quotes(resume_after).await?;
        info!("{} quotes pending", rows.len());

        let progress = self.progress_bar(rows.len() as u64)?;
        let mut stats = RunStats::new(resume_after, self.resolver.params().clone());

        for row in rows {
            let id = row.id;
            let quote_start = Instant::now();

            let record = match row.into_quote() {
                None => {
                    warn!("Skipping malformed quote row (ID: {})", id);
                    QuoteStats {
                        id,
                        status: QuoteStatus::Skipped,
                        book_id: None,
                        distance: None,
                        context_chars: None,
                        processing_time_ms: 0,
                    }
                }
                Some(quote) => {
                    info!("Processing quote: '{}' by {} (ID: {})", quote.text, quote.author, quote.id);

                    let resolver = self.resolver.clone();
                    let resolution = tokio::task::spawn_blocking(move || {
                        resolver.resolve(&quote.text, &quote.author)
                    })
                    .await
                    .with_context(|| format!("Resolver task failed for quote {id}"))?;

                    let mut record = QuoteStats {
                        id,
                        status: QuoteStatus::NotFound,
                        book_id: None,
                        distance: None,
                        context_chars: None,
                        processing_time_ms: 0,
                    };
                    match resolution {
                        Resolution::Found(found) => {
                            self.quotes.set_context(id, &found.context).await?;
                            info!("Updated context for Quote ID: {}", id);
                            record.status = QuoteStatus::Found;
                            record.context_chars = Some(found.context.chars().count());
                            record.book_id = Some(found.book_id);
                            record.distance = Some(found.distance);
                        }
                        Resolution::NoCandidateBooks => record.status = QuoteStatus::NoCandidateBooks,
                        Resolution::NotFound => {}
                    }
                    record
                }
            };

            Checkpoint::advance(&self.checkpoint_path, id).await?;

            stats.record(QuoteStats {
                processing_time_ms: quote_start.elapsed().as_millis() as u64,
                ..record
            });
            progress.inc(1);
        }

        progress.finish_and_clear();
        stats.total_processing_time_ms = run_start.elapsed().as_millis() as u64;
        info!(
            "Run complete: {} processed, {} found, {} not found, {} without candidate books, {} skipped",
            stats.quotes_processed,
            stats.quotes_found,
            stats.quotes_not_found,
            stats.quotes_no_candidates,
            stats.quotes_skipped
        );
        Ok(stats)
    }

    pub async fn close(&self) {
        self.quotes.close().await;
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} quotes ({eta})")?,
        );
        Ok(bar)
    }
}
