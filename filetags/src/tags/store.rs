//! Tag store: the flat-file database mapping file keys to tag sets
//!
//! On-disk format, one record per line:
//!
//! ```text
//! docs/readme.md:draft,todo
//! src/main.rs:core
//! ```
//!
//! - Key and tags are separated by the first `:`
//! - Tags are joined by `,` in sorted order
//! - Lines are sorted and the whole file is rewritten on every save
//! - A missing file is an empty database

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::error::{Result, TagError};
use super::fs::FileSystem;
use super::sorted_set::{SortedSet, ELEMENT_SEPARATOR};

/// Separator between a key and its tag list
pub const KEY_SEPARATOR: char = ':';

/// In-memory view of the backing store file
///
/// Between `load` and `save` this is the only owner of the mapping.
pub struct TagStore {
    path: PathBuf,
    fs: Rc<dyn FileSystem>,
    data: BTreeMap<String, SortedSet>,
}

impl TagStore {
    /// Create an empty store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>, fs: Rc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
            data: BTreeMap::new(),
        }
    }

    /// Create a store and load it from disk
    pub fn open(path: impl Into<PathBuf>, fs: Rc<dyn FileSystem>) -> Result<Self> {
        let mut store = Self::new(path, fs);
        store.load()?;
        Ok(store)
    }

    /// Path of the backing store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory mapping with the contents of the backing file.
    ///
    /// A missing file yields an empty mapping. A line without `:` aborts the
    /// load and leaves the store empty.
    pub fn load(&mut self) -> Result<()> {
        self.data.clear();

        if !self.fs.file_exists(&self.path)? {
            tracing::debug!(path = %self.path.display(), "no tag store yet, starting empty");
            return Ok(());
        }

        let mut data = BTreeMap::new();
        for (index, line) in self.fs.read_lines(&self.path)?.into_iter().enumerate() {
            let (key, tags) = parse_line(&line).ok_or_else(|| TagError::MalformedLine {
                path: self.path.clone(),
                line_number: index + 1,
                line: line.clone(),
            })?;

            if tags.is_empty() {
                continue;
            }
            data.insert(key.to_string(), tags);
        }

        tracing::debug!(path = %self.path.display(), records = data.len(), "loaded tag store");
        self.data = data;
        Ok(())
    }

    /// Rewrite the backing file from the in-memory mapping
    pub fn save(&self) -> Result<()> {
        let mut lines: Vec<String> = self
            .data
            .iter()
            .map(|(key, tags)| format_line(key, tags))
            .collect();
        lines.sort();

        self.fs.write_lines(&self.path, &lines)?;
        tracing::debug!(path = %self.path.display(), records = lines.len(), "saved tag store");
        Ok(())
    }

    /// Attach `tag` to `key`
    pub fn add(&mut self, key: &str, tag: &str) -> Result<()> {
        validate_key(key)?;
        validate_tag(tag)?;

        self.data
            .entry(key.to_string())
            .or_default()
            .add(tag);
        Ok(())
    }

    /// Detach `tag` from `key`. A key left without tags is dropped.
    pub fn remove(&mut self, key: &str, tag: &str) {
        let Some(tags) = self.data.get_mut(key) else {
            return;
        };

        if tags.delete(tag) {
            self.data.remove(key);
        }
    }

    /// Snapshot of every key and its tags
    pub fn list(&self) -> BTreeMap<String, SortedSet> {
        self.data.clone()
    }

    /// Tags for a single key, if it has any
    pub fn get(&self, key: &str) -> Option<&SortedSet> {
        self.data.get(key)
    }

    /// True if `key` has at least one tag
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw lines of the backing file as they are on disk.
    ///
    /// This reads the file again instead of rendering the in-memory mapping.
    pub fn dump(&self) -> Result<Vec<String>> {
        if !self.fs.file_exists(&self.path)? {
            return Ok(Vec::new());
        }
        self.fs.read_lines(&self.path)
    }
}

/// Split a record into its key and tag set. Returns None if there is no `:`.
pub fn parse_line(line: &str) -> Option<(&str, SortedSet)> {
    let (key, value) = line.split_once(KEY_SEPARATOR)?;
    let tags = value
        .split(ELEMENT_SEPARATOR)
        .filter(|tag| !tag.is_empty())
        .collect();
    Some((key, tags))
}

/// Render a record as `key:tag1,tag2`
pub fn format_line(key: &str, tags: &SortedSet) -> String {
    format!("{}{}{}", key, KEY_SEPARATOR, tags.serialize())
}

fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "is empty"
    } else if key.contains('\n') {
        "contains a newline"
    } else if key.contains(KEY_SEPARATOR) {
        "contains a colon"
    } else {
        return Ok(());
    };

    Err(TagError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

fn validate_tag(tag: &str) -> Result<()> {
    let reason = if tag.is_empty() {
        "is empty"
    } else if tag.contains('\n') {
        "contains a newline"
    } else if tag.contains(KEY_SEPARATOR) {
        "contains a colon"
    } else if tag.contains(ELEMENT_SEPARATOR) {
        "contains a comma"
    } else {
        return Ok(());
    };

    Err(TagError::InvalidTag {
        tag: tag.to_string(),
        reason,
    })
}
