//! Temporary project fixture for driving the `tag` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A throwaway project directory with an initialized tag store
pub struct Project {
    dir: TempDir,
}

/// Captured result of one `tag` invocation
pub struct TagRun {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TagRun {
    fn from_output(output: Output) -> Self {
        Self {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Stdout split into lines
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

impl Project {
    /// Create a project with an empty `tags.dat` at its root
    pub fn new() -> Self {
        let project = Self::bare();
        fs::write(project.root().join("tags.dat"), "").expect("Failed to create tags.dat");
        project
    }

    /// Create a project directory without a tag store
    pub fn bare() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("filetags-test-")
            .tempdir()
            .expect("Failed to create temp dir");
        Self { dir }
    }

    /// Canonical project root, so paths match what the child sees as its cwd
    pub fn root(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir")
    }

    /// Create an empty file (and its parent directories) relative to the root
    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, "").expect("Failed to create file");
        path
    }

    /// Create a directory relative to the root
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Contents of the tag store file
    pub fn store_contents(&self) -> String {
        fs::read_to_string(self.root().join("tags.dat")).expect("Failed to read tags.dat")
    }

    /// Run `tag` from the project root
    pub fn tag(&self, args: &[&str]) -> TagRun {
        self.tag_in(&self.root(), args)
    }

    /// Run `tag` from `dir`
    pub fn tag_in(&self, dir: &Path, args: &[&str]) -> TagRun {
        self.tag_with_env(dir, &[], args)
    }

    /// Run `tag` from `dir` with extra environment variables. Logging is off
    /// unless `vars` sets `TAG_LOG`.
    pub fn tag_with_env(&self, dir: &Path, vars: &[(&str, &str)], args: &[&str]) -> TagRun {
        let mut command = Command::new(env!("CARGO_BIN_EXE_tag"));
        command
            .args(args)
            .current_dir(dir)
            .env_remove("TAG_DB_FILE")
            .env_remove("TAG_START_DIR")
            .env("TAG_LOG", "off");
        for (name, value) in vars {
            command.env(name, value);
        }

        let output = command.output().expect("Failed to run tag binary");
        TagRun::from_output(output)
    }
}
