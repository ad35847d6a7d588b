// Fuzzy quote location: normalize both sides, slide the quote over the book,
// accept the closest window within tolerance, then widen it to whole sentences.

pub mod boundary;
pub mod context;
pub mod matcher;
pub mod normalization;

pub use boundary::{find_sentence_boundary, Direction};
pub use context::{context_span, extract_context};
pub use matcher::{find_best_match, find_match, max_accepted_distance, Match};
pub use normalization::{normalize_text, normalize_text_into};

use crate::config::MatchParams;

/// An accepted match together with its extracted context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLocation {
    pub found: Match,
    pub context: String,
}

/// Locate `quote` inside raw `book_text` and extract its sentence-aligned context.
///
/// Normalization is applied to both inputs independently before scoring; the
/// returned context is always a slice of the original `book_text`.
pub fn locate_quote(book_text: &str, quote: &str, params: &MatchParams) -> Option<QuoteLocation> {
    let normalized_book = normalize_text(book_text);
    let normalized_quote = normalize_text(quote);

    let found = find_best_match(&normalized_book, &normalized_quote, params)?;
    let context = extract_context(book_text, &normalized_book, &found, params.context_margin);
    Some(QuoteLocation { found, context })
}
