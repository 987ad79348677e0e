//! reclaim - find and safely reclaim disk space.
//!
//! Usage:
//!   reclaim junk                     Scan junk categories
//!   reclaim large [PATH]             Find large files
//!   reclaim empty [PATH]             Find empty folders
//!   reclaim duplicates [PATH]        Find duplicate files
//!   reclaim clean --categories ...   Clean junk categories
//!   reclaim categorize ...           Sort files into category folders
//!   reclaim disks                    Show volume usage
//!   reclaim --help                   Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};

use reclaim_core::{DuplicateScanOptions, EmptyScanOptions, LargeScanOptions};
use reclaim_ops::{
    CategorizeResult, CategoryMove, MutateResult, MutationOutcome, start_delete_files,
    start_delete_folders, start_move_to_categories, start_move_to_trash,
};
use reclaim_rules::PathRules;
use reclaim_scan::{DuplicateScanner, EmptyFolderScanner, JunkScanner, LargeFileScanner};

#[derive(Parser)]
#[command(
    name = "reclaim",
    version,
    about = "Find and safely reclaim disk space",
    long_about = "reclaim finds categorized junk files, oversized files, empty folders\n\
                  and duplicates, and can delete, trash, or sort what you select."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan all junk categories
    Junk {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find large files
    Large {
        /// Path to scan (defaults to the platform's default volume)
        path: Option<PathBuf>,

        /// Minimum file size (e.g. "100MB", "1GB")
        #[arg(short, long, default_value = "100MB")]
        min_size: String,

        /// Maximum scan depth
        #[arg(short, long, default_value = "15")]
        depth: u32,

        /// Extra exclude patterns (substrings or globs)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Only report one type bucket (video, audio, archive, ...)
        #[arg(short = 't', long = "type")]
        type_filter: Option<String>,

        /// Number of files to print in text mode
        #[arg(short = 'n', long, default_value = "25")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find empty folders
    Empty {
        /// Path to scan
        path: PathBuf,

        /// Delete the folders that were found
        #[arg(long)]
        delete: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find duplicate files
    Duplicates {
        /// Path to scan (defaults to the home directory)
        path: Option<PathBuf>,

        /// Minimum file size to consider (e.g. "1MB")
        #[arg(short, long, default_value = "1MB")]
        min_size: String,

        /// Confirm candidate groups by hashing the first 1 MiB
        #[arg(long)]
        hash: bool,

        /// Delete every group member except the first
        #[arg(long)]
        delete: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Clean junk categories or an explicit file list
    Clean {
        /// Category keys to clean (see `reclaim junk`)
        #[arg(short, long, value_delimiter = ',')]
        categories: Vec<String>,

        /// Explicit files to delete instead of categories
        #[arg(long)]
        files: Vec<PathBuf>,

        /// Include categories that are not marked safe
        #[arg(long)]
        include_unsafe: bool,

        /// Move to the OS trash instead of deleting
        #[arg(long)]
        trash: bool,

        /// Only report what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Move files into per-category folders under a base directory
    Categorize {
        /// Base directory receiving the category folders
        #[arg(short, long)]
        base: PathBuf,

        /// Category folder name
        #[arg(short, long)]
        category: String,

        /// Files to move
        files: Vec<PathBuf>,
    },

    /// Show volume usage
    Disks {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = PathRules::new();

    match cli.command {
        Command::Junk { format } => run_junk(&rules, format).await,
        Command::Large {
            path,
            min_size,
            depth,
            exclude,
            type_filter,
            top,
            format,
        } => {
            let root = path.unwrap_or_else(|| rules.default_drive());
            run_large(&rules, root, &min_size, depth, exclude, type_filter, top, format).await
        }
        Command::Empty {
            path,
            delete,
            format,
        } => run_empty(path, delete, format).await,
        Command::Duplicates {
            path,
            min_size,
            hash,
            delete,
            format,
        } => {
            let root = path.unwrap_or_else(|| rules.home().clone());
            run_duplicates(root, &min_size, hash, delete, format).await
        }
        Command::Clean {
            categories,
            files,
            include_unsafe,
            trash,
            dry_run,
        } => run_clean(&rules, categories, files, include_unsafe, trash, dry_run).await,
        Command::Categorize {
            base,
            category,
            files,
        } => run_categorize(base, category, files).await,
        Command::Disks { format } => run_disks(&rules, format),
    }
}

/// Scan every junk category and print the per-category breakdown.
async fn run_junk(rules: &PathRules, format: OutputFormat) -> Result<()> {
    let scanner = JunkScanner::new(rules)?;
    let mut progress_rx = scanner.subscribe();

    tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            eprintln!(
                "  [{:>3}%] {} ({} files so far)",
                progress.percentage, progress.category, progress.total_scanned
            );
        }
    });

    eprintln!("Scanning junk categories...");
    let report = tokio::task::spawn_blocking(move || scanner.scan())
        .await
        .context("Scan task failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(" Junk Scan Report");
            println!("{}", "─".repeat(70));
            for result in report.categories.values() {
                if result.file_count == 0 {
                    continue;
                }
                let marker = if result.safe_to_clean { " " } else { "!" };
                println!(
                    " {marker} {:<28} {:>6} files {:>12}   [{}]",
                    result.name, result.file_count, result.total_size_formatted, result.key
                );
                if let Some(warning) = &result.warning {
                    println!("     {warning}");
                }
            }
            println!();
            println!(
                " Total: {} files, {}",
                report.total_files, report.total_size_formatted
            );
            println!(" Clean with: reclaim clean --categories <key,...>");
        }
    }

    Ok(())
}

/// Scan for large files and print the report.
#[allow(clippy::too_many_arguments)]
async fn run_large(
    rules: &PathRules,
    root: PathBuf,
    min_size: &str,
    depth: u32,
    exclude: Vec<String>,
    type_filter: Option<String>,
    top: usize,
    format: OutputFormat,
) -> Result<()> {
    if let Some(key) = &type_filter {
        if reclaim_rules::file_type_def(key).is_none() {
            let known: Vec<&str> = reclaim_rules::file_types().iter().map(|t| t.key).collect();
            return Err(eyre!("Unknown type '{key}'; expected one of: {}", known.join(", ")));
        }
    }

    let min_bytes = parse_size(min_size)?;
    let options = LargeScanOptions::builder()
        .root(root.clone())
        .min_size(min_bytes)
        .max_depth(depth)
        .exclude_paths(exclude)
        .type_filter(type_filter)
        .build()
        .map_err(|e| eyre!("Invalid options: {e}"))?;

    let scanner = LargeFileScanner::new(rules.clone());
    let mut progress_rx = scanner.subscribe();
    tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            eprint!(
                "\r  {} files, {} found: {}          ",
                progress.scanned_files, progress.found_large_files, progress.current_path
            );
        }
    });

    eprintln!("Scanning {} (min size {min_size})...", root.display());
    let report = tokio::task::spawn_blocking(move || scanner.scan(&options))
        .await
        .context("Scan task failed")??;
    eprintln!();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(
                " {} large files, {} (scanned {} files)",
                report.file_count, report.total_size_formatted, report.scanned_files
            );
            println!("{}", "─".repeat(70));
            for hit in report.files.iter().take(top) {
                println!(
                    " {:>12}  {:<10} {}",
                    hit.file.size_formatted,
                    hit.type_key,
                    hit.file.path.display()
                );
            }
            if report.file_count > top {
                println!("   ... and {} more", report.file_count - top);
            }

            println!();
            println!(" By type:");
            for stat in report.type_stats.iter().filter(|s| s.count > 0) {
                println!(
                    "   {:<16} {:>6} files {:>12} {:>4}%",
                    stat.name, stat.count, stat.total_size_formatted, stat.percentage
                );
            }

            println!();
            println!(" Top directories:");
            for stat in report.directory_stats.iter().take(5) {
                println!(
                    "   {:>12}  {}",
                    stat.total_size_formatted,
                    stat.path.display()
                );
            }
        }
    }

    Ok(())
}

/// Scan for empty folders, optionally deleting them.
async fn run_empty(path: PathBuf, delete: bool, format: OutputFormat) -> Result<()> {
    let scanner = EmptyFolderScanner::new();
    let mut progress_rx = scanner.subscribe();
    tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            eprint!(
                "\r  {} dirs examined, {} empty          ",
                progress.scanned_dirs, progress.found_empty
            );
        }
    });

    eprintln!("Scanning {} for empty folders...", path.display());
    let options = EmptyScanOptions::new(path);
    let report = tokio::task::spawn_blocking(move || scanner.scan(&options))
        .await
        .context("Scan task failed")?;
    eprintln!();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!();
            println!(
                " {} empty folders ({} directories examined)",
                report.count, report.scanned_dirs
            );
            for folder in &report.folders {
                println!("   {}", folder.path.display());
            }
        }
    }

    if delete && report.count > 0 {
        let paths: Vec<PathBuf> = report.folders.iter().map(|f| f.path.clone()).collect();
        let outcome = drain_mutation(start_delete_folders(paths)).await;
        print_outcome("Deleted", &outcome);
    }

    Ok(())
}

/// Scan for duplicate files, optionally deleting the redundant copies.
async fn run_duplicates(
    root: PathBuf,
    min_size: &str,
    hash: bool,
    delete: bool,
    format: OutputFormat,
) -> Result<()> {
    let min_bytes = parse_size(min_size)?;
    let options = DuplicateScanOptions::builder()
        .root(root.clone())
        .min_size(min_bytes)
        .use_hash(hash)
        .build()
        .map_err(|e| eyre!("Invalid options: {e}"))?;

    let scanner = DuplicateScanner::new();
    let mut progress_rx = scanner.subscribe();
    tokio::spawn(async move {
        while let Ok(progress) = progress_rx.recv().await {
            eprint!(
                "\r  {} files, {} candidate groups          ",
                progress.scanned_files, progress.potential_duplicates
            );
        }
    });

    eprintln!("Scanning {} for duplicates (min size {min_size})...", root.display());
    let report = tokio::task::spawn_blocking(move || scanner.scan(&options))
        .await
        .context("Scan task failed")?;
    eprintln!();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            if report.groups.is_empty() {
                println!(" No duplicate files found.");
            } else {
                println!(
                    " {} duplicate groups, {} reclaimable",
                    report.total_groups, report.total_wasted_size_formatted
                );
                if !hash {
                    println!(" (size+name match only; re-run with --hash to confirm content)");
                }
                println!();
                for (index, group) in report.groups.iter().enumerate() {
                    println!(
                        " Group {} ({} files, {} wasted)",
                        index + 1,
                        group.count,
                        group.wasted_size_formatted
                    );
                    for (member, file) in group.files.iter().enumerate() {
                        let marker = if member == 0 { "keep" } else { "dup " };
                        println!("   [{marker}] {}", file.path.display());
                    }
                    println!();
                }
            }
        }
    }

    if delete && !report.groups.is_empty() {
        let redundant: Vec<PathBuf> = report
            .groups
            .iter()
            .flat_map(|g| g.files.iter().skip(1))
            .map(|f| f.path.clone())
            .collect();
        let outcome = drain_mutation(start_delete_files(redundant)).await;
        print_outcome("Deleted", &outcome);
    }

    Ok(())
}

/// Clean selected junk categories or an explicit file list.
async fn run_clean(
    rules: &PathRules,
    categories: Vec<String>,
    files: Vec<PathBuf>,
    include_unsafe: bool,
    trash: bool,
    dry_run: bool,
) -> Result<()> {
    let targets: Vec<PathBuf> = if !files.is_empty() {
        files
    } else {
        if categories.is_empty() {
            return Err(eyre!("Pass --categories <key,...> or --files <path>..."));
        }

        // Re-scan for a fresh snapshot; files may have changed since
        // the listing the selection was made from.
        let scanner = JunkScanner::new(rules)?;
        eprintln!("Re-scanning selected categories...");
        let report = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .context("Scan task failed")?;

        let mut targets = Vec::new();
        for key in &categories {
            let Some(result) = report.categories.get(key) else {
                return Err(eyre!("Unknown category: {key}"));
            };
            if !result.safe_to_clean && !include_unsafe {
                eprintln!(
                    "Skipping {} (not marked safe; pass --include-unsafe to clean it)",
                    result.name
                );
                continue;
            }
            targets.extend(result.files.iter().map(|f| f.path.clone()));
        }
        targets
    };

    if targets.is_empty() {
        println!("Nothing to clean.");
        return Ok(());
    }

    if dry_run {
        println!("Would remove {} files:", targets.len());
        for path in &targets {
            println!("  {}", path.display());
        }
        return Ok(());
    }

    let receiver = if trash {
        start_move_to_trash(targets)
    } else {
        start_delete_files(targets)
    };
    let outcome = drain_mutation(receiver).await;
    print_outcome(if trash { "Trashed" } else { "Deleted" }, &outcome);

    Ok(())
}

/// Move files into a category folder under the base directory.
async fn run_categorize(base: PathBuf, category: String, files: Vec<PathBuf>) -> Result<()> {
    if files.is_empty() {
        return Err(eyre!("No files given"));
    }

    let moves = vec![CategoryMove {
        category,
        sources: files,
    }];
    eprintln!(
        "Moving {} files ({})...",
        moves[0].sources.len(),
        format_size(reclaim_ops::planned_size(&moves))
    );

    let mut rx = start_move_to_categories(base, moves);
    let mut outcome = None;
    while let Some(result) = rx.recv().await {
        match result {
            CategorizeResult::Progress(progress) => {
                eprint!(
                    "\r  [{:>3}%] {}/{} {}          ",
                    progress.percentage, progress.current, progress.total, progress.file
                );
            }
            CategorizeResult::Complete(complete) => outcome = Some(complete),
        }
    }
    eprintln!();

    let outcome = outcome.ok_or_else(|| eyre!("Move task ended without a result"))?;
    println!("Moved {} files, {} failed", outcome.succeeded, outcome.failed);
    for record in outcome.results.iter().filter(|r| !r.success) {
        println!(
            "  failed: {} ({})",
            record.source.display(),
            record.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

/// Print per-volume usage for the addressable drives.
fn run_disks(rules: &PathRules, format: OutputFormat) -> Result<()> {
    use sysinfo::Disks;

    let disks = Disks::new_with_refreshed_list();
    let known_roots = rules.available_drives();

    let mut snapshots = Vec::new();
    for disk in disks.list() {
        let mount = disk.mount_point().to_path_buf();
        if !known_roots.contains(&mount) && !known_roots.iter().any(|r| mount.starts_with(r)) {
            continue;
        }
        snapshots.push(reclaim_core::UsageSnapshot::now(
            mount.display().to_string(),
            disk.total_space(),
            disk.available_space(),
        ));
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshots)?),
        OutputFormat::Text => {
            println!(" {} volumes", rules.platform().name());
            println!(" {:<20} {:>12} {:>12} {:>12} {:>6}", "Volume", "Total", "Used", "Free", "Use%");
            for snap in &snapshots {
                let used_percentage = if snap.total > 0 {
                    (snap.used * 100) / snap.total
                } else {
                    0
                };
                println!(
                    " {:<20} {:>12} {:>12} {:>12} {:>5}%",
                    snap.volume,
                    format_size(snap.total),
                    format_size(snap.used),
                    format_size(snap.free),
                    used_percentage
                );
            }
        }
    }

    Ok(())
}

/// Drain a delete/trash receiver, printing progress to stderr.
async fn drain_mutation(
    mut rx: tokio::sync::mpsc::Receiver<MutateResult>,
) -> MutationOutcome {
    let mut outcome = MutationOutcome {
        deleted_count: 0,
        freed_size: 0,
        freed_size_formatted: format_size(0),
        errors: Vec::new(),
    };
    while let Some(result) = rx.recv().await {
        match result {
            MutateResult::Progress(progress) => {
                eprint!(
                    "\r  [{:>3}%] {}/{} {}          ",
                    progress.percentage, progress.current, progress.total, progress.file
                );
            }
            MutateResult::Complete(complete) => outcome = complete,
        }
    }
    eprintln!();
    outcome
}

fn print_outcome(verb: &str, outcome: &MutationOutcome) {
    println!(
        "{verb} {} items, {} freed",
        outcome.deleted_count, outcome.freed_size_formatted
    );
    for error in &outcome.errors {
        println!("  failed: {error}");
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Parse a size string (e.g. "500", "1KB", "10MB", "1GB").
fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_uppercase();

    let (number, multiplier) = if let Some(n) = s.strip_suffix("GB").or_else(|| s.strip_suffix("G"))
    {
        (n, 1024u64 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB").or_else(|| s.strip_suffix("M")) {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB").or_else(|| s.strip_suffix("K")) {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix("B") {
        (n, 1)
    } else {
        (s.as_str(), 1)
    };

    let value: f64 = number
        .trim()
        .parse()
        .with_context(|| format!("Invalid size: '{s}'"))?;
    if value < 0.0 {
        return Err(eyre!("Size cannot be negative"));
    }

    Ok((value * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("500").unwrap(), 500);
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("100MB").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("2gb").unwrap(), 2 * 1024 * 1024 * 1024);
        assert!(parse_size("lots").is_err());
    }
}
