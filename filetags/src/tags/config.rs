// Environment configuration for the tag CLI
// Handles the store file name, the log filter and the search start directory

use std::path::PathBuf;

/// Default name of the backing store file
pub const DEFAULT_DB_FILENAME: &str = "tags.dat";

/// Default `tracing` filter when `TAG_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings for a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    /// File name searched for from the working directory upwards
    pub db_filename: String,
    /// Filter directive for the log subscriber
    pub log_filter: String,
    /// Directory to start the store search from, instead of the process cwd
    pub start_dir: Option<PathBuf>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            db_filename: DEFAULT_DB_FILENAME.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            start_dir: None,
        }
    }
}

impl TagConfig {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // TAG_DB_FILE must be a bare file name; it is joined to every
        // directory on the way up
        if let Some(name) = lookup("TAG_DB_FILE") {
            match validate_db_filename(&name) {
                Ok(()) => config.db_filename = name,
                Err(reason) => {
                    eprintln!("Warning: ignoring TAG_DB_FILE={:?}: {}", name, reason);
                }
            }
        }

        if let Some(filter) = lookup("TAG_LOG").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        config.start_dir = lookup("TAG_START_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        config
    }
}

/// Check that a store file name is usable.
/// Rules:
/// - not empty
/// - not "." or ".."
/// - no path separators
pub fn validate_db_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("file name cannot be empty".into());
    }
    if name == "." || name == ".." {
        return Err("file name cannot be '.' or '..'".into());
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err("file name must not contain a path separator".into());
    }
    Ok(())
}
