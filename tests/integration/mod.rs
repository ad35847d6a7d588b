// Integration test utilities and common code
// Builds a corpus directory, a catalog CSV and a quotes database inside one temp dir

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::fs;
use std::str::FromStr;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

use quote_context::{BookFormat, MatchParams, RunConfig};

pub const QUOTES_TABLE: &str = "quotes_cleaned";

/// Test fixture helper for creating a temporary corpus, catalog and quotes database
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();
        fs::create_dir_all(root_path.join("books")).expect("Failed to create books directory");

        Self {
            temp_dir,
            root_path,
        }
    }

    pub fn books_dir(&self) -> PathBuf {
        self.root_path.join("books")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root_path.join("metadata.csv")
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_path.join("quotes.db")
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.root_path.join("checkpoint.json")
    }

    /// Create a book text file under the books directory
    pub fn create_book_file<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.books_dir().join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write book file");
        file_path
    }

    /// Write the catalog CSV from (book num, title, author-as-written) rows
    pub fn create_catalog(&self, rows: &[(&str, &str, &str)]) -> PathBuf {
        let mut content = String::from("Book Num,Book Title,Author\n");
        for (num, title, author) in rows {
            content.push_str(&format!("{},\"{}\",\"{}\"\n", num, title, author));
        }
        fs::write(self.catalog_path(), content).expect("Failed to write catalog");
        self.catalog_path()
    }

    /// Create the quotes database with the given (id, quote, author, context) rows
    pub async fn create_quotes_db(&self, rows: &[(i64, Option<&str>, Option<&str>, Option<&str>)]) {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", self.database_path().display()))
            .expect("Invalid database path")
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create database");

        sqlx::query(&format!(
            "CREATE TABLE {QUOTES_TABLE} (id INTEGER PRIMARY KEY, quote TEXT, author TEXT, context TEXT)"
        ))
        .execute(&pool)
        .await
        .expect("Failed to create quotes table");

        for &(id, quote, author, context) in rows {
            sqlx::query(&format!(
                "INSERT INTO {QUOTES_TABLE} (id, quote, author, context) VALUES (?, ?, ?, ?)"
            ))
            .bind(id)
            .bind(quote)
            .bind(author)
            .bind(context)
            .execute(&pool)
            .await
            .expect("Failed to insert quote");
        }

        pool.close().await;
    }

    /// Read back every (id, context) pair ordered by id
    pub async fn read_contexts(&self) -> Vec<(i64, Option<String>)> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", self.database_path().display()))
            .expect("Invalid database path");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open database");

        let rows: Vec<(i64, Option<String>)> =
            sqlx::query_as(&format!("SELECT id, context FROM {QUOTES_TABLE} ORDER BY id"))
                .fetch_all(&pool)
                .await
                .expect("Failed to read contexts");
        pool.close().await;
        rows
    }

    /// Run configuration pointing at this fixture
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            catalog_path: self.catalog_path(),
            books_dir: self.books_dir(),
            book_extension: "txt".to_string(),
            book_format: BookFormat::PlainText,
            database_path: self.database_path(),
            quotes_table: QUOTES_TABLE.to_string(),
            checkpoint_path: self.checkpoint_path(),
            stats_out: self.root_path.join("run_stats.json"),
            no_progress: true,
            match_params: MatchParams::default(),
        }
    }
}

/// A paragraph of filler sentences, `count` sentences long
pub fn filler_sentences(count: usize) -> String {
    (0..count)
        .map(|i| format!("Filler sentence number {i} says nothing in particular."))
        .collect::<Vec<_>>()
        .join(" ")
}
