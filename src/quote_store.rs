use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// A quote awaiting context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub author: String,
}

/// A pending row as stored; text or author may be missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRow {
    pub id: i64,
    pub text: Option<String>,
    pub author: Option<String>,
}

impl QuoteRow {
    /// The quote, or `None` when text or author is missing or blank
    pub fn into_quote(self) -> Option<Quote> {
        let text = self.text.filter(|t| !t.trim().is_empty())?;
        let author = self.author.filter(|a| !a.trim().is_empty())?;
        Some(Quote {
            id: self.id,
            text,
            author: author.trim().to_string(),
        })
    }
}

/// Quotes table in a SQLite database with `id`, `quote`, `author` and `context` columns
pub struct QuoteStore {
    pool: SqlitePool,
    table: String,
}

impl QuoteStore {
    /// Open an existing database. The table name must be a plain SQL identifier.
    pub async fn connect(path: &Path, table: &str) -> Result<Self> {
        validate_identifier(table)?;

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open quote database {}", path.display()))?;

        Self::from_pool(pool, table)
    }

    pub fn from_pool(pool: SqlitePool, table: &str) -> Result<Self> {
        validate_identifier(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Quotes with no context yet, ascending by id, optionally only ids after `after`
    pub async fn pending_quotes(&self, after: Option<i64>) -> Result<Vec<QuoteRow>> {
        let rows = match after {
            Some(last_id) => {
                let sql = format!(
                    "SELECT id, quote, author FROM {} WHERE context IS NULL AND id > ? ORDER BY id",
                    self.table
                );
                sqlx::query(&sql).bind(last_id).fetch_all(&self.pool).await?
            }
            None => {
                let sql = format!(
                    "SELECT id, quote, author FROM {} WHERE context IS NULL ORDER BY id",
                    self.table
                );
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        let mut quotes = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let text = row.try_get::<Option<String>, _>("quote").unwrap_or_else(|e| {
                warn!("Unreadable quote text for id {}: {}", id, e);
                None
            });
            let author = row.try_get::<Option<String>, _>("author").unwrap_or_else(|e| {
                warn!("Unreadable author for id {}: {}", id, e);
                None
            });
            quotes.push(QuoteRow { id, text, author });
        }

        debug!("Fetched {} pending quotes (after {:?})", quotes.len(), after);
        Ok(quotes)
    }

    /// Store the context for quote `id`
    pub async fn set_context(&self, id: i64, context: &str) -> Result<()> {
        let sql = format!("UPDATE {} SET context = ? WHERE id = ?", self.table);
        let result = sqlx::query(&sql)
            .bind(context)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update context for quote {id}"))?;

        if result.rows_affected() == 0 {
            warn!("No row updated for quote id {}", id);
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if !valid {
        anyhow::bail!("Invalid table name: {name:?}");
    }
    Ok(())
}
