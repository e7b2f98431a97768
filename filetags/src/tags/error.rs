//! Error types for the tag store and its collaborators.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// All errors raised by the tag library.
///
/// Every variant is fatal for the current invocation. Per-file skips during
/// `add`/`del` are not errors; they are reported through
/// [`BatchReport`](super::service::BatchReport).
#[derive(Debug, Error)]
pub enum TagError {
    /// Reading, writing or stat-ing a named path failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A store line without the `key:value` separator
    #[error("malformed line {line_number} in {}: {line:?}", path.display())]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    /// Key is empty or contains a format control character
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Tag is empty or contains a format control character
    #[error("invalid tag {tag:?}: {reason}")]
    InvalidTag { tag: String, reason: &'static str },

    /// A path cannot be expressed relative to a base directory
    #[error("cannot express {} relative to {}", path.display(), base.display())]
    Relativize { path: PathBuf, base: PathBuf },

    /// Upward search for the store file reached the filesystem root
    #[error("{filename} not found in {} (or any parent directory)", start.display())]
    StoreNotFound { filename: String, start: PathBuf },

    /// The working directory could not be determined
    #[error("unable to determine working directory: {0}")]
    WorkingDirectory(#[source] io::Error),

    /// Recursive directory walk failed
    #[error("error walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result type for tag operations.
pub type Result<T> = std::result::Result<T, TagError>;

impl TagError {
    /// Build an [`TagError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TagError::Io {
            path: path.into(),
            source,
        }
    }
}
