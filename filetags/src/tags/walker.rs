//! Recursive file listing under a project root.

use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use super::error::{Result, TagError};

/// Lists files below a root directory
pub trait Walker {
    /// Every regular file reachable under `root`, relative to `root`.
    fn walk(&self, root: &Path) -> Result<Vec<String>>;
}

/// [`Walker`] backed by `walkdir`.
///
/// Symlinked directories are not descended into. A symlink to a regular file
/// is listed like the file itself, matching [`FileSystem::file_exists`](super::fs::FileSystem::file_exists).
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkdirWalker;

impl Walker for WalkdirWalker {
    fn walk(&self, root: &Path) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|source| TagError::Walk {
                path: root.to_path_buf(),
                source,
            })?;

            if !is_listed(&entry) {
                continue;
            }

            let relative =
                entry
                    .path()
                    .strip_prefix(root)
                    .map_err(|_| TagError::Relativize {
                        path: entry.path().to_path_buf(),
                        base: root.to_path_buf(),
                    })?;
            files.push(to_key(relative));
        }

        files.sort();
        tracing::debug!(root = %root.display(), count = files.len(), "walked project tree");
        Ok(files)
    }
}

fn is_listed(entry: &walkdir::DirEntry) -> bool {
    if entry.path_is_symlink() {
        // Dangling links are not files
        return fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false);
    }
    entry.file_type().is_file()
}

/// Render a relative path as a store key, joining components with `/`
pub fn to_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
