use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// One book in the metadata catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub book_id: String,
    pub title: String,
    /// Author in "First Last" form when the source used a single-comma "Last, First"
    pub author: String,
}

impl CatalogEntry {
    /// Build an entry, standardizing the author name
    pub fn new(book_id: impl Into<String>, title: impl Into<String>, author: &str) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
            author: standardize_author_name(author),
        }
    }
}

/// Rewrite "Last, First" as "First Last".
///
/// Only names with exactly one comma are rewritten; anything else is returned unchanged.
pub fn standardize_author_name(author: &str) -> String {
    let mut parts = author.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(last), Some(first), None) => format!("{} {}", first.trim(), last.trim()),
        _ => author.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Book Num")]
    book_num: Option<String>,
    #[serde(rename = "Book Title", default)]
    title: Option<String>,
    #[serde(rename = "Author", default)]
    author: Option<String>,
}

/// Read-only table of books, kept in file order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load the catalog CSV. Unreadable rows are skipped; an unreadable file is an error.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;

        let mut entries = Vec::new();
        let mut skipped = 0usize;

        for (line, record) in reader.deserialize::<CatalogRow>().enumerate() {
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable catalog row {}: {}", line + 2, e);
                    skipped += 1;
                    continue;
                }
            };

            let book_id = match row.book_num.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    warn!("Skipping catalog row {} without a book number", line + 2);
                    skipped += 1;
                    continue;
                }
            };

            entries.push(CatalogEntry::new(
                book_id,
                row.title.unwrap_or_default(),
                row.author.as_deref().unwrap_or_default(),
            ));
        }

        info!(
            "Loaded catalog {}: {} entries, {} rows skipped",
            path.display(),
            entries.len(),
            skipped
        );
        Ok(Self { entries })
    }

    /// Entries whose author contains `author` as a case-insensitive substring, in catalog order
    pub fn books_by_author(&self, author: &str) -> Vec<&CatalogEntry> {
        let needle = author.to_lowercase();
        let books: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| entry.author.to_lowercase().contains(&needle))
            .collect();
        debug!("Filtered {} books for author {:?}", books.len(), author);
        books
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_standardize_author_name() {
        assert_eq!(standardize_author_name("Dickens, Charles"), "Charles Dickens");
        assert_eq!(standardize_author_name("  Austen ,  Jane "), "Jane Austen");
        assert_eq!(standardize_author_name("Homer"), "Homer");
        assert_eq!(
            standardize_author_name("Smith, John, Jr."),
            "Smith, John, Jr."
        );
    }

    #[test]
    fn test_books_by_author_is_case_insensitive_substring() {
        let catalog = Catalog::from_entries(vec![
            CatalogEntry::new("98", "A Tale of Two Cities", "Dickens, Charles"),
            CatalogEntry::new("1342", "Pride and Prejudice", "Austen, Jane"),
            CatalogEntry::new("730", "Oliver Twist", "Dickens, Charles"),
        ]);

        let books = catalog.books_by_author("charles DICKENS");
        let ids: Vec<_> = books.iter().map(|b| b.book_id.as_str()).collect();
        assert_eq!(ids, vec!["98", "730"]);

        assert_eq!(catalog.books_by_author("Dickens").len(), 2);
        assert!(catalog.books_by_author("Tolstoy").is_empty());
    }

    #[test]
    fn test_load_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.csv");
        std::fs::write(
            &path,
            "Book Num,Book Title,Author,Link\n\
             98,A Tale of Two Cities,\"Dickens, Charles\",https://example.org/98\n\
             ,Missing Number,\"Nobody, Known\",\n\
             1342,Pride and Prejudice,\"Austen, Jane\",https://example.org/1342\n\
             2600,War and Peace,,\n",
        )
        .unwrap();

        let catalog = Catalog::load_csv(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries()[0], CatalogEntry {
            book_id: "98".to_string(),
            title: "A Tale of Two Cities".to_string(),
            author: "Charles Dickens".to_string(),
        });
        assert_eq!(catalog.entries()[2].author, "");
        assert!(catalog.books_by_author("Tolstoy").is_empty());
    }

    #[test]
    fn test_load_csv_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Catalog::load_csv(&temp_dir.path().join("absent.csv")).is_err());
    }
}
