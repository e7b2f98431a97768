// tag: CLI for tagging files under a project root
//
// Commands:
//   tag add <tag> <file...>
//   tag del <tag> <file...>
//   tag find <tag>
//   tag list
//   tag untagged
//   tag dump
//   tag init

use anyhow::{Context, Result};
use filetags_lib::tags::{
    run_command, usage, Ascender, BaseTags, Command, FileSystem, OsFileSystem, RelativeTags,
    TagConfig, TagStore, WalkdirWalker,
};
use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
    rc::Rc,
};
use tracing_subscriber::EnvFilter;

/// Exit code for malformed command lines
const USAGE_EXIT_CODE: i32 = 2;

fn init_logging(config: &TagConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!(
            "Warning: invalid TAG_LOG filter {:?}: {}",
            config.log_filter, e
        );
        EnvFilter::new(filetags_lib::tags::config::DEFAULT_LOG_FILTER)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn start_dir(config: &TagConfig, fs: &dyn FileSystem) -> Result<PathBuf> {
    let cwd = fs.current_dir()?;
    Ok(match &config.start_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

fn run_init(config: &TagConfig, wd: &Path, fs: &dyn FileSystem) -> Result<()> {
    let path = wd.join(&config.db_filename);
    if fs.file_exists(&path)? {
        println!("Tag store already exists: {}", path.display());
        return Ok(());
    }

    fs.write_lines(&path, &[])
        .with_context(|| format!("Failed to create tag store: {}", path.display()))?;
    println!("Created tag store: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("{}", usage());
        return Ok(());
    }

    let op = args[1].as_str();
    let params = &args[2..];

    let config = TagConfig::from_env();
    init_logging(&config);

    let fs: Rc<dyn FileSystem> = Rc::new(OsFileSystem);
    let wd = start_dir(&config, &*fs)?;

    let command = match op {
        "help" | "--help" | "-h" => {
            println!("{}", usage());
            return Ok(());
        }
        "init" if params.is_empty() => return run_init(&config, &wd, &*fs),
        _ => match Command::parse(op, params) {
            Some(command) => command,
            None => {
                eprintln!("{}", usage());
                process::exit(USAGE_EXIT_CODE);
            }
        },
    };

    let located = Ascender::new(&*fs)
        .ascend_from(&wd, &config.db_filename)
        .context("Unable to find tags database")?;
    tracing::debug!(root = %located.root.display(), wd = %wd.display(), "resolved project root");

    let store = TagStore::open(&located.file, fs.clone())
        .with_context(|| format!("Failed to load {}", located.file.display()))?;
    let base = BaseTags::new(store, Box::new(WalkdirWalker), fs.clone(), &located.root);
    let mut tags = RelativeTags::new(base, &located.root, &wd);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&mut tags, &command, &mut out)?;
    out.flush()?;

    Ok(())
}
