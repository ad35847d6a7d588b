use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce the text of a single book file.
///
/// Never fatal for a run: the resolver logs it and moves on to the next candidate.
#[derive(Debug, Error)]
pub enum BookLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("failed to decode serialized text in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
