//! Working-directory view over a root-relative [`Tags`] implementation
//!
//! Store keys are always relative to the project root. Users pass and read
//! paths relative to wherever they ran the command. [`RelativeTags`] is the
//! only place that converts between the two:
//!
//! ```text
//! root = /p, wd = /p/docs
//!   user "notes.md"  ->  key "docs/notes.md"
//!   key "docs/notes.md"  ->  user "notes.md"
//!   key "src/main.rs"  ->  hidden (not under wd)
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use super::error::{Result, TagError};
use super::service::{BatchReport, Tags, ALL_PREFIX};
use super::sorted_set::SortedSet;
use super::walker::to_key;

/// Wraps a root-relative [`Tags`] and exposes it relative to `wd`
pub struct RelativeTags<T> {
    base: T,
    root: PathBuf,
    wd: PathBuf,
}

impl<T: Tags> RelativeTags<T> {
    pub fn new(base: T, root: impl Into<PathBuf>, wd: impl Into<PathBuf>) -> Self {
        Self {
            base,
            root: root.into(),
            wd: wd.into(),
        }
    }

    /// Convert a working-directory-relative file argument to a store key.
    ///
    /// Files that resolve outside the project root cannot be keyed.
    fn to_root_key(&self, file: &str) -> Result<String> {
        let abs = normalize(&self.wd.join(file));
        let rel = relative_path(&abs, &self.root).ok_or_else(|| TagError::Relativize {
            path: abs.clone(),
            base: self.root.clone(),
        })?;

        if rel.starts_with("..") {
            return Err(TagError::Relativize {
                path: abs,
                base: self.root.clone(),
            });
        }
        Ok(to_key(&rel))
    }

    /// Re-express a store key relative to the working directory, or None if
    /// the file is not under it.
    fn to_wd_path(&self, key: &str) -> Result<Option<String>> {
        let abs = self.root.join(key);

        // Plain string prefix, same as the directory filter in `list`/`dump`
        if !abs
            .to_string_lossy()
            .starts_with(self.wd.to_string_lossy().as_ref())
        {
            return Ok(None);
        }

        let rel = relative_path(&abs, &self.wd).ok_or_else(|| TagError::Relativize {
            path: abs.clone(),
            base: self.wd.clone(),
        })?;
        Ok(Some(to_key(&rel)))
    }

    /// The working directory (joined with `prefix`) relative to the root,
    /// `"."` when they are the same directory.
    fn root_prefix(&self, prefix: &str) -> Result<String> {
        let dir = normalize(&self.wd.join(prefix));
        let rel = relative_path(&dir, &self.root).ok_or_else(|| TagError::Relativize {
            path: dir.clone(),
            base: self.root.clone(),
        })?;

        let key = to_key(&rel);
        Ok(if key.is_empty() {
            ALL_PREFIX.to_string()
        } else {
            key
        })
    }

    fn to_root_keys(&self, files: &[String]) -> Result<Vec<String>> {
        files.iter().map(|file| self.to_root_key(file)).collect()
    }
}

impl<T: Tags> Tags for RelativeTags<T> {
    fn add(&mut self, tag: &str, files: &[String]) -> Result<BatchReport> {
        let keys = self.to_root_keys(files)?;
        let report = self.base.add(tag, &keys)?;
        Ok(rebase_report(report, &keys, files))
    }

    fn del(&mut self, tag: &str, files: &[String]) -> Result<BatchReport> {
        let keys = self.to_root_keys(files)?;
        let report = self.base.del(tag, &keys)?;
        Ok(rebase_report(report, &keys, files))
    }

    fn find(&self, tag: &str) -> Result<BTreeMap<String, SortedSet>> {
        let mut result = BTreeMap::new();
        for (key, tags) in self.base.find(tag)? {
            if let Some(path) = self.to_wd_path(&key)? {
                result.insert(path, tags);
            }
        }
        Ok(result)
    }

    fn untagged(&self) -> Result<Vec<String>> {
        let mut result = Vec::new();
        for key in self.base.untagged()? {
            if let Some(path) = self.to_wd_path(&key)? {
                result.push(path);
            }
        }
        Ok(result)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.base.list(&self.root_prefix(prefix)?)
    }

    fn dump(&self) -> Result<Vec<String>> {
        if self.root == self.wd {
            return self.base.dump();
        }

        let prefix = self.root_prefix(ALL_PREFIX)?;
        Ok(self
            .base
            .dump()?
            .into_iter()
            .filter(|line| line.starts_with(&prefix))
            .collect())
    }
}

/// Map root-relative file names in a report back to the caller's arguments.
///
/// The wrapped batch reports keys in argument order, so each key is matched
/// by position; aliases of one file keep their own spelling.
fn rebase_report(report: BatchReport, keys: &[String], files: &[String]) -> BatchReport {
    let mut applied = report.applied.into_iter().peekable();
    let mut skipped = report.skipped.into_iter().peekable();
    let mut rebased = BatchReport::default();

    for (key, file) in keys.iter().zip(files) {
        if applied.next_if(|k| k == key).is_some() {
            rebased.applied.push(file.clone());
        } else if skipped.next_if(|k| k == key).is_some() {
            rebased.skipped.push(file.clone());
        }
    }

    rebased
}

/// Lexically resolve `.` and `..` components without touching the disk
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` of the root is the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Express `path` relative to `base`, inserting `..` where `path` is not
/// below `base`. Both must be absolute, or both relative; None otherwise.
pub fn relative_path(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }

    let path = normalize(path);
    let base = normalize(base);

    let mut path_parts = path.components().peekable();
    let mut base_parts = base.components().peekable();

    // Skip the shared leading components
    while let (Some(p), Some(b)) = (path_parts.peek(), base_parts.peek()) {
        if p != b {
            break;
        }
        path_parts.next();
        base_parts.next();
    }

    let mut rel = PathBuf::new();
    for _ in base_parts {
        rel.push("..");
    }
    for part in path_parts {
        rel.push(part);
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}
