use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::book_store::BookTextStore;
use crate::catalog::Catalog;
use crate::config::MatchParams;
use crate::matching::locate_quote;

/// Context found for a quote, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundContext {
    pub context: String,
    pub book_id: String,
    pub title: String,
    /// Char offset of the matched window in the book text
    pub offset: usize,
    pub distance: usize,
}

/// Outcome of resolving a single quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(FoundContext),
    /// The author filter matched no catalog entry
    NoCandidateBooks,
    /// Candidates existed but none contained an accepted match
    NotFound,
}

impl Resolution {
    pub fn context(&self) -> Option<&str> {
        match self {
            Resolution::Found(found) => Some(&found.context),
            _ => None,
        }
    }
}

/// Searches an author's books for a quote, stopping at the first accepted match
#[derive(Clone)]
pub struct QuoteResolver {
    catalog: Arc<Catalog>,
    books: Arc<dyn BookTextStore>,
    params: MatchParams,
}

impl QuoteResolver {
    pub fn new(catalog: Arc<Catalog>, books: Arc<dyn BookTextStore>, params: MatchParams) -> Self {
        Self { catalog, books, params }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Try each of the author's books in catalog order, and each book's candidate
    /// files in store order; the first accepted match wins.
    pub fn resolve(&self, quote: &str, author: &str) -> Resolution {
        let candidates = self.catalog.books_by_author(author);
        if candidates.is_empty() {
            info!("No books found for author: {}", author);
            return Resolution::NoCandidateBooks;
        }

        for book in candidates {
            info!("Checking book: {} (Book Number: {})", book.title, book.book_id);

            for path in self.books.candidate_files(&book.book_id, self.params.max_files_per_book) {
                debug!("Found file: {}", path.display());

                let text = match self.books.load(&path) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Skipping book file: {}", e);
                        continue;
                    }
                };

                if let Some(location) = locate_quote(&text, quote, &self.params) {
                    info!(
                        "Quote found in the book '{}' (Book Number: {}), at offset {} with distance {}",
                        book.title, book.book_id, location.found.start, location.found.distance
                    );
                    return Resolution::Found(FoundContext {
                        context: location.context,
                        book_id: book.book_id.clone(),
                        title: book.title.clone(),
                        offset: location.found.start,
                        distance: location.found.distance,
                    });
                }
            }
        }

        info!("Quote not found in any of the books by {}", author);
        Resolution::NotFound
    }
}
