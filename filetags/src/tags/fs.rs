//! Filesystem primitives the store and service depend on.
//!
//! The trait is the seam for tests: [`OsFileSystem`] talks to the real disk,
//! while `test_utils::MemoryFileSystem` keeps everything in a map.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::error::{Result, TagError};

/// Minimal filesystem contract.
///
/// Reads and writes are scoped: the file is opened, fully processed and
/// closed inside a single call, so no handle outlives the operation.
pub trait FileSystem {
    /// True if `path` names an existing regular file. Directories are not files.
    fn file_exists(&self, path: &Path) -> Result<bool>;

    /// The directory the process was invoked from
    fn current_dir(&self) -> Result<PathBuf>;

    /// Read every line of `path`, without line terminators
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;

    /// Replace the contents of `path` with `lines`, each followed by `\n`
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()>;
}

/// [`FileSystem`] backed by `std::fs`, with advisory locks held for the
/// duration of each read or write.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn file_exists(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TagError::io(path, e)),
        }
    }

    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(TagError::WorkingDirectory)
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path).map_err(|e| TagError::io(path, e))?;
        file.lock_shared().map_err(|e| TagError::io(path, e))?;

        let mut lines = Vec::new();
        for line in BufReader::new(&file).lines() {
            lines.push(line.map_err(|e| TagError::io(path, e))?);
        }

        // Lock is released when the file is dropped
        Ok(lines)
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| TagError::io(path, e))?;

        file.lock_exclusive().map_err(|e| TagError::io(path, e))?;

        let mut writer = BufWriter::new(&file);
        for line in lines {
            writeln!(writer, "{}", line).map_err(|e| TagError::io(path, e))?;
        }
        writer.flush().map_err(|e| TagError::io(path, e))?;
        drop(writer);

        file.sync_all().map_err(|e| TagError::io(path, e))?;
        Ok(())
    }
}
