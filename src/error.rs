//! Error types shared by every stage of a sync run.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type GistResult<T> = Result<T, GistError>;

/// Everything that can go wrong while scanning, resolving or syncing gists.
#[derive(Error, Debug)]
pub enum GistError {
    // Configuration
    #[error("scan root '{0}' does not exist or is not a directory")]
    MissingRoot(PathBuf),

    #[error("invalid configuration at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Filesystem
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Catalog
    #[error("could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed {document}: {source}")]
    Malformed {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    // Per identifier
    #[error("failed to download '{identifier}' from {url}: {reason}")]
    Download {
        identifier: String,
        url: String,
        reason: String,
    },

    #[error("'{0}' is not a plain file name and cannot be cached")]
    InvalidIdentifier(String),
}

impl GistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GistError::Io {
            path: path.into(),
            source,
        }
    }
}
