use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resume point for a batch run: the id of the last quote fully processed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub last_processed_id: i64,
    /// Seconds since the Unix epoch of the last save
    pub last_updated: u64,
}

impl Checkpoint {
    pub fn new(last_processed_id: i64) -> Self {
        Self {
            last_processed_id,
            last_updated: unix_now(),
        }
    }

    /// Load the checkpoint at `path`.
    ///
    /// A missing file means no quote has been processed yet and yields `None`.
    /// A file that exists but cannot be read or parsed is an error, so a damaged
    /// checkpoint never silently restarts the batch.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let checkpoint = serde_json::from_str(&content)
                    .with_context(|| format!("Corrupt checkpoint file {}", path.display()))?;
                Ok(Some(checkpoint))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read checkpoint {}", path.display())),
        }
    }

    /// Persist the checkpoint, replacing any previous one atomically
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = temp_path(path);
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write checkpoint {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .await
            .with_context(|| format!("Failed to replace checkpoint {}", path.display()))?;
        Ok(())
    }

    /// Record `quote_id` as processed and save
    pub async fn advance(path: &Path, quote_id: i64) -> Result<Self> {
        let checkpoint = Self::new(quote_id);
        checkpoint.save(path).await?;
        Ok(checkpoint)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "checkpoint".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
