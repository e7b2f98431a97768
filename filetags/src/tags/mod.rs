//! File tagging
//!
//! Keeps a flat-file store of `file -> tags` under a project root and
//! answers queries relative to the directory a command is run from.

pub mod ascend;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod relative;
pub mod service;
pub mod sorted_set;
pub mod store;
pub mod walker;

// Re-export key types
pub use ascend::{Ascender, Located};
pub use commands::{run_command, usage, Command};
pub use config::TagConfig;
pub use error::{Result, TagError};
pub use fs::{FileSystem, OsFileSystem};
pub use relative::RelativeTags;
pub use service::{BaseTags, BatchReport, Tags};
pub use sorted_set::SortedSet;
pub use store::TagStore;
pub use walker::{WalkdirWalker, Walker};
