use rayon::prelude::*;
use strsim::levenshtein;
use tracing::debug;

use super::normalization::normalize_text;
use crate::config::MatchParams;

/// Minimum number of windows handed to a single rayon task
const PARALLEL_MIN_WINDOWS: usize = 256;

/// Best-scoring window of a sliding-window scan over normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Char offset of the window start in the normalized (and original) text
    pub start: usize,
    /// `start + len(normalized quote)`
    pub end: usize,
    /// Levenshtein distance between the window and the quote
    pub distance: usize,
}

/// Largest distance accepted for a quote of `quote_len` normalized chars
pub fn max_accepted_distance(quote_len: usize, tolerance: f64) -> usize {
    (tolerance * quote_len as f64).floor().max(0.0) as usize
}

/// Slide a window of the quote's length across `book` and return the closest window,
/// provided its distance is within `params.tolerance * len(quote)`.
///
/// Both arguments must already be normalized. Ties keep the lowest offset.
/// Returns `None` when the quote is empty or longer than the book, or when either
/// input still contains non-ASCII chars.
pub fn find_best_match(book: &str, quote: &str, params: &MatchParams) -> Option<Match> {
    if !book.is_ascii() || !quote.is_ascii() {
        debug!("Refusing to scan unnormalized (non-ASCII) input");
        return None;
    }

    let quote_len = quote.len();
    if quote_len == 0 || quote_len > book.len() {
        return None;
    }

    let (distance, start) = match book.find(quote) {
        // The leftmost exact occurrence is the leftmost zero-distance window
        Some(offset) => (0, offset),
        None if params.parallel => scan_parallel(book, quote),
        None => scan_sequential(book, quote),
    };

    let limit = max_accepted_distance(quote_len, params.tolerance);
    debug!(
        "Best window at offset {} with distance {} (limit {}, quote length {})",
        start, distance, limit, quote_len
    );

    if distance <= limit {
        Some(Match {
            start,
            end: start + quote_len,
            distance,
        })
    } else {
        None
    }
}

/// Normalize raw `book_text` and `quote`, then run [`find_best_match`] on the results.
///
/// Offsets in the returned [`Match`] are char offsets into `book_text`.
pub fn find_match(book_text: &str, quote: &str, params: &MatchParams) -> Option<Match> {
    find_best_match(&normalize_text(book_text), &normalize_text(quote), params)
}

fn window_distance(book: &str, quote: &str, offset: usize) -> usize {
    levenshtein(&book[offset..offset + quote.len()], quote)
}

fn scan_sequential(book: &str, quote: &str) -> (usize, usize) {
    let last = book.len() - quote.len();
    let mut best = (usize::MAX, 0);

    for offset in 0..=last {
        let distance = window_distance(book, quote, offset);
        if distance < best.0 {
            best = (distance, offset);
            if distance == 0 {
                break;
            }
        }
    }

    best
}

fn scan_parallel(book: &str, quote: &str) -> (usize, usize) {
    let last = book.len() - quote.len();

    // Ordering on (distance, offset) keeps the leftmost window among equal distances
    (0..last + 1)
        .into_par_iter()
        .with_min_len(PARALLEL_MIN_WINDOWS)
        .map(|offset| (window_distance(book, quote, offset), offset))
        .min()
        .unwrap_or((usize::MAX, 0))
}
