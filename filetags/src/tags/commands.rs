//! Command dispatch for the `tag` binary
//!
//! Parsing only checks argument counts; everything else is delegated to a
//! [`Tags`] implementation. Output is written to any `io::Write` so the same
//! code drives the binary and the tests.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context, Result};

use super::service::{BatchReport, Tags, ALL_PREFIX};
use super::sorted_set::SortedSet;
use super::store::format_line;

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { tag: String, files: Vec<String> },
    Del { tag: String, files: Vec<String> },
    Find { tag: String },
    Untagged,
    List,
    Dump,
}

impl Command {
    /// Parse `op` and its parameters. Returns None when the operation is
    /// unknown or the parameter count is wrong, in which case the caller
    /// should print usage.
    pub fn parse(op: &str, params: &[String]) -> Option<Self> {
        match (op, params) {
            ("add", [tag, files @ ..]) if !files.is_empty() => Some(Command::Add {
                tag: tag.clone(),
                files: files.to_vec(),
            }),
            ("del", [tag, files @ ..]) if !files.is_empty() => Some(Command::Del {
                tag: tag.clone(),
                files: files.to_vec(),
            }),
            ("find", [tag]) => Some(Command::Find { tag: tag.clone() }),
            ("untagged", []) => Some(Command::Untagged),
            ("list", []) => Some(Command::List),
            ("dump", []) => Some(Command::Dump),
            _ => None,
        }
    }
}

/// Run `command` against `tags`, writing results to `out`
pub fn run_command<T, W>(tags: &mut T, command: &Command, out: &mut W) -> Result<()>
where
    T: Tags + ?Sized,
    W: Write,
{
    match command {
        Command::Add { tag, files } => {
            let report = tags
                .add(tag, files)
                .with_context(|| format!("Failed to add tag '{}'", tag))?;
            print_skipped(&report, out)?;
        }
        Command::Del { tag, files } => {
            let report = tags
                .del(tag, files)
                .with_context(|| format!("Failed to remove tag '{}'", tag))?;
            print_skipped(&report, out)?;
        }
        Command::Find { tag } => {
            let found = tags
                .find(tag)
                .with_context(|| format!("Failed to find tag '{}'", tag))?;
            print_sorted_map(&found, out)?;
        }
        Command::Untagged => {
            let files = tags.untagged().context("Failed to list untagged files")?;
            print_lines(&files, out)?;
        }
        Command::List => {
            let all = tags.list(ALL_PREFIX).context("Failed to list tags")?;
            print_lines(&all, out)?;
        }
        Command::Dump => {
            let lines = tags.dump().context("Failed to dump tag store")?;
            print_lines(&lines, out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn print_skipped<W: Write>(report: &BatchReport, out: &mut W) -> Result<()> {
    for file in &report.skipped {
        writeln!(out, "skipping non-existent file: {}", file)?;
    }
    Ok(())
}

fn print_sorted_map<W: Write>(found: &BTreeMap<String, SortedSet>, out: &mut W) -> Result<()> {
    for (file, tags) in found {
        writeln!(out, "{}", format_line(file, tags))?;
    }
    Ok(())
}

fn print_lines<W: Write>(lines: &[String], out: &mut W) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Usage text for the `tag` binary
pub fn usage() -> &'static str {
    r#"tag - tag files and find them again

USAGE:
    tag <COMMAND> [PARAMETER...]

COMMANDS:
    add <tag> <file...>    Add tag to file(s)
    del <tag> <file...>    Remove tag from file(s)
    find <tag>             Find files with tag in current directory (recursive)
    list                   List all tags used in current directory (recursive)
    untagged               List untagged files in current directory (recursive)
    dump                   Dump entries from the tag store (debugging)
    init                   Create an empty tag store in the current directory
    help                   Show this help message

ENVIRONMENT:
    TAG_DB_FILE    Name of the tag store file (default: tags.dat)
    TAG_LOG        Log filter, e.g. debug (default: warn)
    TAG_START_DIR  Directory to run from instead of the current one
"#
}
