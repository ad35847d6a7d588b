use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::book_store::BookFormat;

/// Default share of the normalized quote length allowed as edit distance
pub const DEFAULT_TOLERANCE: f64 = 0.2;
/// Default number of chars added on each side of a match before sentence snapping
pub const DEFAULT_CONTEXT_MARGIN: usize = 1000;
/// Default number of source files examined per catalog entry
pub const DEFAULT_MAX_FILES_PER_BOOK: usize = 5;

/// Tunables for matching and candidate enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Accept a window when `distance <= tolerance * len(normalized quote)`
    pub tolerance: f64,
    /// Chars of context requested on each side of the match
    pub context_margin: usize,
    /// Cap on source files examined for a single book
    pub max_files_per_book: usize,
    /// Score windows on the rayon pool instead of a single thread
    pub parallel: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            context_margin: DEFAULT_CONTEXT_MARGIN,
            max_files_per_book: DEFAULT_MAX_FILES_PER_BOOK,
            parallel: true,
        }
    }
}

/// Everything a run needs, assembled once at startup and passed down explicitly
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// CSV catalog with `Book Num`, `Book Title` and `Author` columns
    pub catalog_path: PathBuf,
    /// Root directory of the book text corpus
    pub books_dir: PathBuf,
    /// Extension (without dot) of book text files under `books_dir`
    pub book_extension: String,
    pub book_format: BookFormat,
    /// SQLite database holding the quotes table
    pub database_path: PathBuf,
    pub quotes_table: String,
    /// File recording the last processed quote id
    pub checkpoint_path: PathBuf,
    /// Where per-run statistics are written as JSON
    pub stats_out: PathBuf,
    pub no_progress: bool,
    pub match_params: MatchParams,
}
