//! Locate the tag store by searching upward from the working directory.

use std::path::{Path, PathBuf};

use super::error::{Result, TagError};
use super::fs::FileSystem;

/// Where the store file was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Absolute path of the store file
    pub file: PathBuf,
    /// Directory containing the store file; the project root
    pub root: PathBuf,
}

/// Walks from a start directory towards the filesystem root looking for a file
pub struct Ascender<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> Ascender<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Search the working directory and each of its ancestors for `filename`
    pub fn ascend(&self, filename: &str) -> Result<Located> {
        let start = self.fs.current_dir()?;
        self.ascend_from(&start, filename)
    }

    /// Same as [`ascend`](Self::ascend) but starting at `start`.
    ///
    /// The filesystem root itself is searched too.
    pub fn ascend_from(&self, start: &Path, filename: &str) -> Result<Located> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(filename);
            if self.fs.file_exists(&candidate)? {
                tracing::debug!(file = %candidate.display(), "found tag store");
                return Ok(Located {
                    file: candidate,
                    root: current,
                });
            }

            if !current.pop() {
                break;
            }
        }

        Err(TagError::StoreNotFound {
            filename: filename.to_string(),
            start: start.to_path_buf(),
        })
    }
}
