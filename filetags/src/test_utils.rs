//! In-memory collaborators for tests
//!
//! Compiled for unit tests only, so the service can be driven without
//! touching disk.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::tags::error::{Result, TagError};
use crate::tags::fs::FileSystem;
use crate::tags::walker::{to_key, Walker};

/// Simulated filesystem: a map from absolute path to file lines.
///
/// Relative paths are resolved against the fixed working directory given at
/// construction.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    cwd: PathBuf,
    files: RefCell<BTreeMap<PathBuf, Vec<String>>>,
}

impl MemoryFileSystem {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            files: RefCell::new(BTreeMap::new()),
        }
    }

    /// Create an empty file if it does not exist yet
    pub fn touch(&self, path: impl AsRef<Path>) {
        let path = self.abs(path.as_ref());
        self.files.borrow_mut().entry(path).or_default();
    }

    /// Remove a file
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = self.abs(path.as_ref());
        self.files.borrow_mut().remove(&path);
    }

    /// Contents of a file as lines, if it exists
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<String>> {
        let path = self.abs(path.as_ref());
        self.files.borrow().get(&path).cloned()
    }

    /// Files under `root`, relative to it, in sorted order
    pub fn files_under(&self, root: &Path) -> Vec<String> {
        self.files
            .borrow()
            .keys()
            .filter_map(|path| path.strip_prefix(root).ok())
            .map(to_key)
            .collect()
    }

    fn abs(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn file_exists(&self, path: &Path) -> Result<bool> {
        Ok(self.files.borrow().contains_key(&self.abs(path)))
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let path = self.abs(path);
        self.files.borrow().get(&path).cloned().ok_or_else(|| {
            TagError::io(
                path.clone(),
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        let path = self.abs(path);
        self.files.borrow_mut().insert(path, lines.to_vec());
        Ok(())
    }
}

/// Walker over a [`MemoryFileSystem`]
#[derive(Debug, Clone)]
pub struct MemoryWalker {
    fs: Rc<MemoryFileSystem>,
}

impl MemoryWalker {
    pub fn new(fs: Rc<MemoryFileSystem>) -> Self {
        Self { fs }
    }
}

impl Walker for MemoryWalker {
    fn walk(&self, root: &Path) -> Result<Vec<String>> {
        Ok(self.fs.files_under(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_resolves_relative_paths() {
        let fs = MemoryFileSystem::new("/home/foo");
        fs.touch("a.txt");
        fs.touch("/home/foo/sub/b.txt");
        fs.touch("/elsewhere/c.txt");

        assert!(fs.file_exists(Path::new("/home/foo/a.txt")).unwrap());
        assert!(fs.file_exists(Path::new("sub/b.txt")).unwrap());
        assert_eq!(
            fs.files_under(Path::new("/home/foo")),
            vec!["a.txt", "sub/b.txt"]
        );
    }

    #[test]
    fn test_write_then_read() {
        let fs = MemoryFileSystem::new("/p");
        fs.write_lines(Path::new("tags.dat"), &["a:b".to_string()])
            .unwrap();
        assert_eq!(fs.read_lines(Path::new("/p/tags.dat")).unwrap(), vec!["a:b"]);
        assert!(fs.read_lines(Path::new("missing")).is_err());

        fs.remove("tags.dat");
        assert!(fs.contents("tags.dat").is_none());
    }
}
