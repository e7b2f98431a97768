// Tag store, path translation and command dispatch (shared by the `tag` binary and tests)
pub mod tags;

// In-memory collaborators for unit tests
#[cfg(test)]
pub mod test_utils;

pub use tags::{
    run_command, usage, Ascender, BaseTags, Command, OsFileSystem, RelativeTags, SortedSet,
    TagConfig, TagError, TagStore, Tags, WalkdirWalker,
};
