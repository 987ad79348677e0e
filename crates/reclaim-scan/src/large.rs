//! Large-file scanner with type and directory statistics.
//!
//! Scans the platform's common user directories under the target root
//! first so the files people actually care about surface in early
//! progress updates, then sweeps the rest of the root. The candidate
//! working set is bounded: past 1000 entries it is sorted by size and
//! cut back to the 800 largest, which can only ever drop entries
//! smaller than the 800th largest seen so far.

use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use reclaim_core::{CancelFlag, FileHit, LargeScanOptions, ScanError, format_size, truncate_path};
use reclaim_rules::{PathRules, classify_extension, file_types};

use crate::progress::{LargeScanProgress, Throttle};
use crate::walker::{ExcludeFilter, TreeWalker, WalkVisitor};

/// Working-set bound: trim once the candidate list passes this size.
const TRIM_THRESHOLD: usize = 1000;

/// Working-set size after a trim.
const TRIM_KEEP: usize = 800;

/// Minimum interval between progress events.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Directory names excluded from every large-file scan, on top of the
/// platform system excludes.
const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    "venv",
    ".venv",
    ".npm",
    ".yarn",
    ".cache",
];

/// Progress channel capacity.
const PROGRESS_CHANNEL_SIZE: usize = 100;

/// One large file, with its type bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LargeFileHit {
    #[serde(flatten)]
    pub file: FileHit,
    /// Type bucket key (`video`, `archive`, ...).
    #[serde(rename = "type")]
    pub type_key: String,
}

/// Aggregate statistics for one type bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStat {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    /// Matched files in this bucket.
    pub count: usize,
    /// Total bytes in this bucket.
    pub total_size: u64,
    pub total_size_formatted: String,
    /// Whole-percent share of the grand total (0 when the grand total
    /// is 0).
    pub percentage: u32,
}

/// Aggregate statistics for one containing directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStat {
    pub path: PathBuf,
    pub count: usize,
    pub total_size: u64,
    pub total_size_formatted: String,
}

/// Result of a large-file scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LargeScanReport {
    /// Hits sorted descending by size.
    pub files: Vec<LargeFileHit>,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub file_count: usize,
    /// Files stat()ed during the scan, matched or not.
    pub scanned_files: u64,
    /// Directories entered during the scan.
    pub scanned_dirs: u64,
    /// Per-bucket statistics, in type-table order.
    pub type_stats: Vec<TypeStat>,
    /// Top 20 directories by aggregate hit size.
    pub directory_stats: Vec<DirectoryStat>,
}

/// Scanner for files above a size threshold.
pub struct LargeFileScanner {
    rules: PathRules,
    progress_tx: broadcast::Sender<LargeScanProgress>,
    cancel: CancelFlag,
}

impl LargeFileScanner {
    /// Create a scanner using the given platform path tables.
    pub fn new(rules: PathRules) -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self {
            rules,
            progress_tx,
            cancel: CancelFlag::new(),
        }
    }

    /// Subscribe to throttled progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<LargeScanProgress> {
        self.progress_tx.subscribe()
    }

    /// The flag a controller can set to stop the running scan.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Scan for files of at least `options.min_size` bytes.
    ///
    /// Fails eagerly on a malformed exclude pattern; everything else is
    /// per-item recoverable. A cancelled scan returns the candidates
    /// accumulated so far.
    pub fn scan(&self, options: &LargeScanOptions) -> Result<LargeScanReport, ScanError> {
        self.cancel.reset();

        let mut exclude = ExcludeFilter::new(&options.exclude_paths)?;
        exclude.add_substrings(self.rules.system_exclude_paths());
        exclude.add_substrings(DEFAULT_EXCLUDE_DIRS.iter().copied());
        let walker = TreeWalker::new(options.max_depth, exclude, self.cancel.clone());

        let priority: Vec<PathBuf> = self
            .rules
            .common_dirs()
            .into_iter()
            .filter(|p| p.starts_with(&options.root) && p.is_dir())
            .collect();

        let mut visitor = LargeVisitor {
            min_size: options.min_size,
            type_filter: options.type_filter.as_deref(),
            candidates: Vec::new(),
            scanned_files: 0,
            scanned_dirs: 0,
            throttle: Throttle::new(PROGRESS_INTERVAL),
            progress_tx: &self.progress_tx,
            skip_roots: priority.iter().cloned().collect(),
            skip_enabled: false,
        };

        for dir in &priority {
            if self.cancel.is_cancelled() {
                break;
            }
            debug!(path = %dir.display(), "scanning priority directory");
            walker.walk(dir, &mut visitor);
        }

        // Sweep the remainder of the root; the priority directories are
        // skipped so their files are not reported twice.
        visitor.skip_enabled = true;
        if !self.cancel.is_cancelled() {
            walker.walk(&options.root, &mut visitor);
        }

        let LargeVisitor {
            mut candidates,
            scanned_files,
            scanned_dirs,
            ..
        } = visitor;

        candidates.sort_by(|a, b| b.file.size.cmp(&a.file.size));

        let total_size: u64 = candidates.iter().map(|f| f.file.size).sum();
        let type_stats = compute_type_stats(&candidates, total_size);
        let directory_stats = compute_directory_stats(&candidates);

        Ok(LargeScanReport {
            file_count: candidates.len(),
            total_size,
            total_size_formatted: format_size(total_size),
            files: candidates,
            scanned_files,
            scanned_dirs,
            type_stats,
            directory_stats,
        })
    }
}

struct LargeVisitor<'a> {
    min_size: u64,
    type_filter: Option<&'a str>,
    candidates: Vec<LargeFileHit>,
    scanned_files: u64,
    scanned_dirs: u64,
    throttle: Throttle,
    progress_tx: &'a broadcast::Sender<LargeScanProgress>,
    skip_roots: HashSet<PathBuf>,
    skip_enabled: bool,
}

impl WalkVisitor for LargeVisitor<'_> {
    fn visit_file(&mut self, path: &Path, metadata: &Metadata) {
        self.scanned_files += 1;

        if metadata.len() >= self.min_size {
            let file = FileHit::from_metadata(path, metadata);
            let type_key = classify_extension(&file.extension);
            if self.type_filter.is_none_or(|f| f == type_key) {
                self.candidates.push(LargeFileHit {
                    file,
                    type_key: type_key.to_string(),
                });
                if self.candidates.len() > TRIM_THRESHOLD {
                    self.candidates
                        .sort_by(|a, b| b.file.size.cmp(&a.file.size));
                    self.candidates.truncate(TRIM_KEEP);
                }
            }
        }

        if self.throttle.ready() {
            let dir = path.parent().unwrap_or(path);
            let _ = self.progress_tx.send(LargeScanProgress {
                scanned_files: self.scanned_files,
                scanned_dirs: self.scanned_dirs,
                current_path: truncate_path(&dir.display().to_string(), 60),
                found_large_files: self.candidates.len(),
            });
        }
    }

    fn enter_dir(&mut self, path: &Path, _name: &str) -> bool {
        if self.skip_enabled && self.skip_roots.contains(path) {
            return false;
        }
        self.scanned_dirs += 1;
        true
    }
}

fn compute_type_stats(files: &[LargeFileHit], total_size: u64) -> Vec<TypeStat> {
    let mut by_key: HashMap<&str, (usize, u64)> = HashMap::new();
    for hit in files {
        let entry = by_key.entry(hit.type_key.as_str()).or_default();
        entry.0 += 1;
        entry.1 += hit.file.size;
    }

    file_types()
        .iter()
        .map(|def| {
            let (count, size) = by_key.get(def.key).copied().unwrap_or_default();
            let percentage = if total_size > 0 {
                ((size as f64 / total_size as f64) * 100.0).round() as u32
            } else {
                0
            };
            TypeStat {
                key: def.key.to_string(),
                name: def.name.to_string(),
                icon: def.icon.to_string(),
                color: def.color.to_string(),
                count,
                total_size: size,
                total_size_formatted: format_size(size),
                percentage,
            }
        })
        .collect()
}

fn compute_directory_stats(files: &[LargeFileHit]) -> Vec<DirectoryStat> {
    let mut by_dir: HashMap<&PathBuf, (usize, u64)> = HashMap::new();
    for hit in files {
        let entry = by_dir.entry(&hit.file.directory).or_default();
        entry.0 += 1;
        entry.1 += hit.file.size;
    }

    let mut stats: Vec<DirectoryStat> = by_dir
        .into_iter()
        .map(|(path, (count, total_size))| DirectoryStat {
            path: path.clone(),
            count,
            total_size,
            total_size_formatted: format_size(total_size),
        })
        .collect();
    stats.sort_by(|a, b| b.total_size.cmp(&a.total_size));
    stats.truncate(20);
    stats
}
