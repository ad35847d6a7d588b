use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::BookLoadError;

/// How a book file stores its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BookFormat {
    /// Raw UTF-8 text
    #[default]
    PlainText,
    /// A single JSON string holding the whole text
    JsonString,
}

/// Source of book texts keyed by catalog book id
pub trait BookTextStore: Send + Sync {
    /// Files whose name starts with `book_id`, in a deterministic order, at most `limit`
    fn candidate_files(&self, book_id: &str, limit: usize) -> Vec<PathBuf>;

    /// Read the full text of one candidate file
    fn load(&self, path: &Path) -> Result<String, BookLoadError>;
}

/// Book store backed by a directory tree, indexed once by file name
#[derive(Debug)]
pub struct DirectoryBookStore {
    root: PathBuf,
    format: BookFormat,
    /// File name -> every path carrying that name, sorted
    index: BTreeMap<String, Vec<PathBuf>>,
}

impl DirectoryBookStore {
    /// Walk `root` recursively and index every file ending in `.{extension}`.
    ///
    /// A missing or non-directory root is an error; unreadable entries below it are
    /// logged and skipped.
    pub fn open(root: impl AsRef<Path>, extension: &str, format: BookFormat) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            anyhow::bail!("Book directory does not exist or is not a directory: {}", root.display());
        }

        let start = std::time::Instant::now();
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut index: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let mut file_count = 0usize;

        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Directory walk error (continuing): {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };
            if file_name.ends_with(&suffix) {
                index
                    .entry(file_name.to_string())
                    .or_default()
                    .push(entry.path().to_path_buf());
                file_count += 1;
            }
        }

        for paths in index.values_mut() {
            paths.sort();
        }

        info!(
            "Indexed {} book files under {} in {}ms",
            file_count,
            root.display(),
            start.elapsed().as_millis()
        );

        Ok(Self { root, format, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed files
    pub fn file_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }
}

impl BookTextStore for DirectoryBookStore {
    fn candidate_files(&self, book_id: &str, limit: usize) -> Vec<PathBuf> {
        self.index
            .range(book_id.to_string()..)
            .take_while(|(name, _)| name.starts_with(book_id))
            .flat_map(|(_, paths)| paths.iter().cloned())
            .take(limit)
            .collect()
    }

    fn load(&self, path: &Path) -> Result<String, BookLoadError> {
        debug!("Loading book file: {}", path.display());
        match self.format {
            BookFormat::PlainText => read_plain_text(path),
            BookFormat::JsonString => read_json_string(path),
        }
    }
}

/// Read a UTF-8 text file
pub fn read_plain_text(path: &Path) -> Result<String, BookLoadError> {
    let bytes = std::fs::read(path).map_err(|source| BookLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| BookLoadError::InvalidUtf8 {
        path: path.to_path_buf(),
        source: e.utf8_error(),
    })
}

/// Read a file holding one JSON-encoded string
pub fn read_json_string(path: &Path) -> Result<String, BookLoadError> {
    let bytes = std::fs::read(path).map_err(|source| BookLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice::<String>(&bytes).map_err(|source| BookLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
