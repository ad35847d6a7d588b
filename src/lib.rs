pub mod book_store;
pub mod catalog;
pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod errors;
pub mod matching;
pub mod quote_store;
pub mod resolver;

// Re-export main types for convenient access
pub use book_store::{BookFormat, BookTextStore, DirectoryBookStore};
pub use catalog::{standardize_author_name, Catalog, CatalogEntry};
pub use checkpoint::Checkpoint;
pub use config::{MatchParams, RunConfig};
pub use driver::{QuoteStats, QuoteStatus, RunDriver, RunStats};
pub use errors::BookLoadError;
pub use matching::{locate_quote, Match, QuoteLocation};
pub use quote_store::{Quote, QuoteRow, QuoteStore};
pub use resolver::{FoundContext, QuoteResolver, Resolution};
