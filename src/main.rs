//! swept - see where disk space goes, one directory at a time.
//!
//! Usage:
//!   swept [PATH]                   List PATH, largest first
//!   swept [PATH] --expand DIR      Also show DIR's children inline
//!   swept delete PATH...           Show what would be deleted
//!   swept delete PATH... --yes     Delete it
//!   swept --help                   Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Context, Result};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use swept_core::{Entry, SessionConfig};
use swept_ops::{DeleteMode, FsDeleter};
use swept_scan::FsScanner;
use swept_session::{Collaborators, ScanSession, SessionUpdate};

type FsSession = ScanSession<FsScanner, FsScanner, FsDeleter>;

#[derive(Parser)]
#[command(
    name = "swept",
    version,
    about = "Find what is eating your disk",
    long_about = "swept lists a directory immediately, then sizes its subdirectories \
                  in small batches and keeps the listing sorted by size as results arrive.\n\n\
                  Run `swept [PATH]` to list a directory, or `swept delete` to reclaim space."
)]
struct Cli {
    /// Directory to list (defaults to the configured home)
    path: Option<PathBuf>,

    /// Number of directories sized concurrently
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Print the settled listing as JSON
    #[arg(long)]
    json: bool,

    /// Show a subdirectory's children inline (repeatable)
    #[arg(short, long, value_name = "DIR")]
    expand: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Delete files or directories
    Delete {
        /// Items to delete
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Move items to the trash instead of removing them
        #[arg(short, long)]
        trash: bool,

        /// Actually delete (otherwise only report what would be removed)
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    let mut config = SessionConfig::load();
    if let Some(batch_size) = cli.batch_size {
        if batch_size == 0 {
            bail!("--batch-size must be at least 1");
        }
        config.batch_size = batch_size;
    }

    match cli.command {
        Some(Command::Delete { paths, trash, yes }) => {
            let mode = if trash || config.use_trash {
                DeleteMode::Trash
            } else {
                DeleteMode::Permanent
            };
            let mut session = build_session(config, mode);
            run_delete(&mut session, &paths, yes).await?;
        }
        None => {
            let path = cli.path.unwrap_or_else(|| config.home.clone());
            let mut session = build_session(config, DeleteMode::Permanent);
            run_list(&mut session, &path, &cli.expand, cli.json).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("swept=info,swept_session=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_session(config: SessionConfig, mode: DeleteMode) -> FsSession {
    tracing::debug!(batch_size = config.batch_size, ?mode, "Starting session");

    let scanner = Arc::new(FsScanner::new().with_follow_symlinks(config.follow_symlinks));
    let collaborators = Collaborators {
        enumerator: Arc::clone(&scanner),
        sizer: scanner,
        deleter: Arc::new(FsDeleter::with_mode(mode)),
    };
    ScanSession::new(config, collaborators)
}

/// List a directory, size it, and print it.
async fn run_list(session: &mut FsSession, path: &Path, expand: &[PathBuf], json: bool) -> Result<()> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", path.display()))?;

    eprintln!("Scanning {}...", path.display());
    session.navigate(&path)?;
    session.settle().await;

    if let Some(err) = session.last_error() {
        bail!("Failed to list {}: {}", path.display(), err);
    }

    for dir in expand {
        let dir = if dir.is_absolute() { dir.clone() } else { path.join(dir) };
        session.expand(dir);
    }
    session.settle().await;

    let listing = session
        .current()
        .ok_or_else(|| eyre!("Nothing was listed for {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }

    let (dirs, files): (Vec<&Entry>, Vec<&Entry>) = listing.entries.iter().partition(|e| e.is_dir);

    println!();
    println!("{}", "─".repeat(72));
    println!(" {} - {}", listing.path.display(), format_size(listing.total_size));
    println!(" {} directories, {} files", dirs.len(), files.len());
    println!("{}", "─".repeat(72));
    println!();

    for entry in &listing.entries {
        print_entry(entry, 0, listing.total_size, session.expanded().contains(&entry.path));

        if session.expanded().contains(&entry.path) {
            match session.tree_cache().get(&entry.path) {
                Some(children) => {
                    for child in children {
                        print_entry(child, 1, listing.total_size, false);
                    }
                }
                None => println!("    (could not be listed)"),
            }
        }
    }

    Ok(())
}

/// Delete items through a session rooted at their parent directory.
async fn run_delete(session: &mut FsSession, paths: &[PathBuf], yes: bool) -> Result<()> {
    let paths: Vec<PathBuf> = paths
        .iter()
        .map(|p| p.canonicalize().with_context(|| format!("Invalid path: {}", p.display())))
        .collect::<Result<_>>()?;

    let parent = paths
        .first()
        .and_then(|p| p.parent())
        .ok_or_else(|| eyre!("Refusing to delete a filesystem root"))?
        .to_path_buf();

    session.navigate(&parent)?;
    session.settle().await;
    if let Some(err) = session.last_error() {
        bail!("Failed to list {}: {}", parent.display(), err);
    }

    for path in &paths {
        session.toggle_select(path);
    }

    let known = session.selected_size();
    let names = paths.iter().map(|p| p.display()).join(", ");

    if !yes {
        println!("Would delete {} item(s): {}", paths.len(), names);
        println!("Listed size: {}", format_size(known));
        println!("Re-run with --yes to delete.");
        return Ok(());
    }

    session.request_delete()?;

    for update in session.settle().await {
        match update {
            SessionUpdate::Deleted { reclaimed } => {
                println!("Deleted {} item(s), reclaimed {}", paths.len(), format_size(reclaimed));
            }
            SessionUpdate::DeletionFailed { error } => {
                bail!("Deletion failed: {error}");
            }
            _ => {}
        }
    }

    if let Some(listing) = session.current() {
        println!("{} now holds {}", listing.path.display(), format_size(listing.total_size));
    }

    Ok(())
}

/// Print one entry with its share of the listing total.
fn print_entry(entry: &Entry, depth: usize, total: u64, expanded: bool) {
    let ratio = if total > 0 {
        (entry.size as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    let indent = "  ".repeat(depth);
    let marker = match (entry.is_dir, expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        (false, _) => "  ",
    };
    let dir_marker = if entry.is_dir { "/" } else { "" };
    let modified = entry
        .modified
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let items = entry
        .child_count
        .map(|n| format!("{n} items"))
        .unwrap_or_default();

    println!(
        "{}{}{:<40} {:>10} {:>5.1}% {} {:>10} {}",
        indent,
        marker,
        truncate(&format!("{}{}", entry.name, dir_marker), 40),
        format_size(entry.size),
        ratio,
        make_bar(ratio / 100.0, 10),
        modified,
        items
    );
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{head}…")
    }
}
