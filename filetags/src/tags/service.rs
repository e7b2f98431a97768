//! Tag operations expressed in project-root-relative paths
//!
//! [`BaseTags`] reconciles the store with the filesystem: it refuses to tag
//! files that do not exist and diffs the project tree against stored keys to
//! find untagged files. Every path it accepts or returns is relative to the
//! project root; see [`RelativeTags`](super::relative::RelativeTags) for the
//! working-directory view.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use super::error::Result;
use super::fs::FileSystem;
use super::sorted_set::SortedSet;
use super::store::TagStore;
use super::walker::Walker;

/// Prefix that matches every key in [`Tags::list`]
pub const ALL_PREFIX: &str = ".";

/// Outcome of a batch `add`/`del`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files the operation was applied to
    pub applied: Vec<String>,
    /// Files skipped because they do not exist
    pub skipped: Vec<String>,
}

/// The operations exposed to the command layer
pub trait Tags {
    /// Tag each of `files`. Missing files are skipped, not fatal.
    fn add(&mut self, tag: &str, files: &[String]) -> Result<BatchReport>;

    /// Untag each of `files`. Missing files are skipped, not fatal.
    fn del(&mut self, tag: &str, files: &[String]) -> Result<BatchReport>;

    /// Files carrying `tag`, with all of their tags
    fn find(&self, tag: &str) -> Result<BTreeMap<String, SortedSet>>;

    /// Files without any tag, sorted
    fn untagged(&self) -> Result<Vec<String>>;

    /// Every tag used by files whose path starts with `prefix`, sorted
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Raw store lines
    fn dump(&self) -> Result<Vec<String>>;
}

/// Root-relative implementation of [`Tags`]. Expects a loaded store.
pub struct BaseTags {
    store: TagStore,
    walker: Box<dyn Walker>,
    fs: Rc<dyn FileSystem>,
    root: PathBuf,
}

impl BaseTags {
    pub fn new(
        store: TagStore,
        walker: Box<dyn Walker>,
        fs: Rc<dyn FileSystem>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            walker,
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Apply `op` to every existing file, then save once
    fn apply_batch<F>(&mut self, files: &[String], mut op: F) -> Result<BatchReport>
    where
        F: FnMut(&mut TagStore, &str) -> Result<()>,
    {
        let mut report = BatchReport::default();

        for file in files {
            if !self.fs.file_exists(&self.root.join(file))? {
                tracing::debug!(file = %file, "skipping non-existent file");
                report.skipped.push(file.clone());
                continue;
            }

            op(&mut self.store, file)?;
            report.applied.push(file.clone());
        }

        self.store.save()?;
        Ok(report)
    }
}

impl Tags for BaseTags {
    fn add(&mut self, tag: &str, files: &[String]) -> Result<BatchReport> {
        self.apply_batch(files, |store, file| store.add(file, tag))
    }

    fn del(&mut self, tag: &str, files: &[String]) -> Result<BatchReport> {
        self.apply_batch(files, |store, file| {
            store.remove(file, tag);
            Ok(())
        })
    }

    fn find(&self, tag: &str) -> Result<BTreeMap<String, SortedSet>> {
        Ok(self
            .store
            .list()
            .into_iter()
            .filter(|(_, tags)| tags.contains(tag))
            .collect())
    }

    fn untagged(&self) -> Result<Vec<String>> {
        let tagged: HashSet<String> = self.store.list().into_keys().collect();

        let mut untagged: Vec<String> = self
            .walker
            .walk(&self.root)?
            .into_iter()
            .filter(|file| !tagged.contains(file))
            .collect();
        untagged.sort();
        Ok(untagged)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut all = SortedSet::new();

        for (file, tags) in self.store.list() {
            if prefix == ALL_PREFIX || file.starts_with(prefix) {
                all.extend(tags.iter().cloned());
            }
        }

        Ok(all.to_vec())
    }

    fn dump(&self) -> Result<Vec<String>> {
        self.store.dump()
    }
}
