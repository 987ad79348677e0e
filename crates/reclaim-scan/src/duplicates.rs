//! Duplicate file detection.
//!
//! Two-stage pipeline: one tree walk buckets every file of at least
//! `min_size` bytes by `(size, lowercased name)`; buckets with two or
//! more members are candidate groups. Optionally, each candidate group
//! is then confirmed by re-bucketing on a blake3 hash of the first
//! 1 MiB of content.
//!
//! The bounded-prefix hash is a deliberate precision/speed trade-off:
//! two files whose first 1 MiB matches but whose tails differ will be
//! merged into one group. That false-positive mode is accepted because
//! full-file hashing of large media libraries is far too slow for
//! interactive use. Without hashing, a size+name match is reported as
//! "probably duplicate" and the wasted-space figures are accordingly
//! approximate.

use std::fs::{File, Metadata};
use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::broadcast;

use reclaim_core::{CancelFlag, DuplicateScanOptions, FileHit, format_size};

use crate::progress::DuplicateScanProgress;
use crate::walker::{ExcludeFilter, TreeWalker, WalkVisitor};

/// Directory names never descended into, compared case-insensitively.
const SKIP_DIR_NAMES: &[&str] = &[
    "$recycle.bin",
    "system volume information",
    "windows",
    "node_modules",
    ".git",
    "appdata",
];

/// Bytes hashed from the start of each candidate file.
const PREFIX_HASH_BYTES: u64 = 1024 * 1024;

/// Progress cadence, in files.
const PROGRESS_EVERY_FILES: u64 = 200;

/// Groups returned in a report; totals still cover the full set.
const MAX_REPORTED_GROUPS: usize = 100;

/// Progress channel capacity.
const PROGRESS_CHANNEL_SIZE: usize = 100;

/// A group of (probable) duplicates.
///
/// Members are in discovery order and the first member is the
/// canonical "keep" file. The ordering is a policy decision: arbitrary,
/// but stable for a given traversal of an unchanged tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    /// Fingerprint key: `size_name`, with a hash prefix appended when
    /// content confirmation ran.
    pub key: String,
    /// Members in discovery order.
    pub files: Vec<FileHit>,
    pub count: usize,
    /// Bytes reclaimable by keeping only the first member.
    pub wasted_size: u64,
    pub wasted_size_formatted: String,
}

/// Result of a duplicate scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateScanReport {
    /// Up to 100 groups, sorted descending by wasted size.
    pub groups: Vec<DuplicateGroup>,
    /// Total group count before truncation.
    pub total_groups: usize,
    /// Wasted bytes across all groups, truncated or not.
    pub total_wasted_size: u64,
    pub total_wasted_size_formatted: String,
    /// Files examined during the walk.
    pub scanned_files: u64,
}

/// Scanner for byte-identical (or probably-identical) files.
pub struct DuplicateScanner {
    progress_tx: broadcast::Sender<DuplicateScanProgress>,
    cancel: CancelFlag,
}

impl Default for DuplicateScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicateScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self {
            progress_tx,
            cancel: CancelFlag::new(),
        }
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<DuplicateScanProgress> {
        self.progress_tx.subscribe()
    }

    /// The flag a controller can set to stop the running scan.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Scan for duplicate files under `options.root`.
    ///
    /// A cancelled scan groups whatever was bucketed so far.
    pub fn scan(&self, options: &DuplicateScanOptions) -> DuplicateScanReport {
        self.cancel.reset();

        let walker = TreeWalker::new(
            options.max_depth,
            ExcludeFilter::empty(),
            self.cancel.clone(),
        );
        let mut visitor = BucketVisitor {
            min_size: options.min_size,
            buckets: IndexMap::new(),
            scanned_files: 0,
            candidate_groups: 0,
            progress_tx: &self.progress_tx,
        };
        walker.walk(&options.root, &mut visitor);

        let mut groups = Vec::new();
        for ((size, lower_name), files) in visitor.buckets {
            if files.len() < 2 {
                continue;
            }
            if options.use_hash {
                groups.extend(confirm_by_hash(size, &lower_name, files));
            } else {
                groups.push(build_group(format!("{size}_{lower_name}"), files));
            }
        }

        groups.sort_by(|a, b| b.wasted_size.cmp(&a.wasted_size));

        let total_groups = groups.len();
        let total_wasted_size: u64 = groups.iter().map(|g| g.wasted_size).sum();
        groups.truncate(MAX_REPORTED_GROUPS);

        DuplicateScanReport {
            groups,
            total_groups,
            total_wasted_size,
            total_wasted_size_formatted: format_size(total_wasted_size),
            scanned_files: visitor.scanned_files,
        }
    }
}

struct BucketVisitor<'a> {
    min_size: u64,
    buckets: IndexMap<(u64, String), Vec<FileHit>>,
    scanned_files: u64,
    candidate_groups: usize,
    progress_tx: &'a broadcast::Sender<DuplicateScanProgress>,
}

impl WalkVisitor for BucketVisitor<'_> {
    fn visit_file(&mut self, path: &Path, metadata: &Metadata) {
        self.scanned_files += 1;

        if metadata.len() >= self.min_size {
            let hit = FileHit::from_metadata(path, metadata);
            let key = (hit.size, hit.name.to_lowercase());
            let bucket = self.buckets.entry(key).or_default();
            bucket.push(hit);
            if bucket.len() == 2 {
                self.candidate_groups += 1;
            }
        }

        if self.scanned_files % PROGRESS_EVERY_FILES == 0 {
            let _ = self.progress_tx.send(DuplicateScanProgress {
                scanned_files: self.scanned_files,
                current_path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                potential_duplicates: self.candidate_groups,
            });
        }
    }

    fn enter_dir(&mut self, _path: &Path, name: &str) -> bool {
        let lower = name.to_lowercase();
        !SKIP_DIR_NAMES.contains(&lower.as_str())
    }
}

/// Stage 2: split one candidate bucket by bounded-prefix content hash.
/// Files whose hash cannot be computed are dropped from the bucket.
fn confirm_by_hash(size: u64, lower_name: &str, files: Vec<FileHit>) -> Vec<DuplicateGroup> {
    let mut by_hash: IndexMap<blake3::Hash, Vec<FileHit>> = IndexMap::new();
    for file in files {
        if let Some(hash) = prefix_hash(&file.path) {
            by_hash.entry(hash).or_default().push(file);
        }
    }

    by_hash
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(hash, members)| {
            let hex = hash.to_hex();
            let prefix = &hex[..8];
            build_group(format!("{size}_{lower_name}_{prefix}"), members)
        })
        .collect()
}

fn build_group(key: String, files: Vec<FileHit>) -> DuplicateGroup {
    let wasted_size: u64 = files.iter().skip(1).map(|f| f.size).sum();
    DuplicateGroup {
        key,
        count: files.len(),
        wasted_size,
        wasted_size_formatted: format_size(wasted_size),
        files,
    }
}

/// Blake3 hash of the first 1 MiB of a file.
fn prefix_hash(path: &PathBuf) -> Option<blake3::Hash> {
    let mut file = File::open(path).ok()?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];
    let mut remaining = PREFIX_HASH_BYTES;

    while remaining > 0 {
        let want = buffer.len().min(remaining as usize);
        let read = file.read(&mut buffer[..want]).ok()?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        remaining -= read as u64;
    }

    Some(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_same_name_same_size_grouped_without_hash() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        let content = vec![0u8; 500_000];
        fs::write(temp.path().join("a/doc.txt"), &content).unwrap();
        fs::write(temp.path().join("b/doc.txt"), &content).unwrap();

        let scanner = DuplicateScanner::new();
        let mut options = DuplicateScanOptions::new(temp.path());
        options.min_size = 1000;
        let report = scanner.scan(&options);

        assert_eq!(report.total_groups, 1);
        let group = &report.groups[0];
        assert_eq!(group.count, 2);
        assert_eq!(group.wasted_size, 500_000);
        assert_eq!(report.total_wasted_size, 500_000);
    }

    #[test]
    fn test_wasted_size_excludes_first_member() {
        let temp = TempDir::new().unwrap();
        for sub in ["a", "b", "c"] {
            fs::create_dir(temp.path().join(sub)).unwrap();
            fs::write(temp.path().join(sub).join("copy.bin"), vec![7u8; 4096]).unwrap();
        }

        let scanner = DuplicateScanner::new();
        let mut options = DuplicateScanOptions::new(temp.path());
        options.min_size = 1;
        let report = scanner.scan(&options);

        assert_eq!(report.total_groups, 1);
        let group = &report.groups[0];
        assert_eq!(group.count, 3);
        assert!(group.files.len() >= 2);
        assert_eq!(
            group.wasted_size,
            group.files.iter().skip(1).map(|f| f.size).sum::<u64>()
        );
        assert_eq!(group.wasted_size, 2 * 4096);
    }

    #[test]
    fn test_hash_confirmation_splits_coincidental_matches() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        // Same name, same size, different content.
        fs::write(temp.path().join("a/data.bin"), vec![1u8; 2048]).unwrap();
        fs::write(temp.path().join("b/data.bin"), vec![2u8; 2048]).unwrap();

        let scanner = DuplicateScanner::new();
        let mut options = DuplicateScanOptions::new(temp.path());
        options.min_size = 1;

        let unconfirmed = scanner.scan(&options);
        assert_eq!(unconfirmed.total_groups, 1);

        options.use_hash = true;
        let confirmed = scanner.scan(&options);
        assert_eq!(confirmed.total_groups, 0);
        assert_eq!(confirmed.total_wasted_size, 0);
    }

    #[test]
    fn test_hash_confirmation_keeps_true_duplicates() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        let content = b"identical content".repeat(200);
        fs::write(temp.path().join("a/same.dat"), &content).unwrap();
        fs::write(temp.path().join("b/same.dat"), &content).unwrap();

        let scanner = DuplicateScanner::new();
        let mut options = DuplicateScanOptions::new(temp.path());
        options.min_size = 1;
        options.use_hash = true;
        let report = scanner.scan(&options);

        assert_eq!(report.total_groups, 1);
        assert_eq!(report.groups[0].count, 2);
        assert!(report.groups[0].key.contains('_'));
    }

    #[test]
    fn test_groups_sorted_by_wasted_size() {
        let temp = TempDir::new().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(temp.path().join(sub)).unwrap();
            fs::write(temp.path().join(sub).join("small.bin"), vec![0u8; 1000]).unwrap();
            fs::write(temp.path().join(sub).join("large.bin"), vec![0u8; 9000]).unwrap();
        }

        let scanner = DuplicateScanner::new();
        let mut options = DuplicateScanOptions::new(temp.path());
        options.min_size = 1;
        let report = scanner.scan(&options);

        assert_eq!(report.total_groups, 2);
        assert_eq!(report.groups[0].wasted_size, 9000);
        assert_eq!(report.groups[1].wasted_size, 1000);
        assert_eq!(report.total_wasted_size, 10000);
    }

    #[test]
    fn test_min_size_filters_buckets() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("a/tiny.txt"), b"xy").unwrap();
        fs::write(temp.path().join("b/tiny.txt"), b"xy").unwrap();

        let scanner = DuplicateScanner::new();
        let mut options = DuplicateScanOptions::new(temp.path());
        options.min_size = 1000;
        let report = scanner.scan(&options);

        assert_eq!(report.total_groups, 0);
        assert_eq!(report.scanned_files, 2);
    }

    #[test]
    fn test_prefix_hash_reads_at_most_one_mebibyte() {
        let temp = TempDir::new().unwrap();
        let path_a = temp.path().join("a.bin");
        let path_b = temp.path().join("b.bin");
        // Identical first MiB, diverging tails: the bounded-prefix
        // fingerprint deliberately merges these.
        let mut a = vec![9u8; (PREFIX_HASH_BYTES + 10) as usize];
        let mut b = a.clone();
        a[PREFIX_HASH_BYTES as usize + 5] = 1;
        b[PREFIX_HASH_BYTES as usize + 5] = 2;
        fs::write(&path_a, &a).unwrap();
        fs::write(&path_b, &b).unwrap();

        assert_eq!(prefix_hash(&path_a), prefix_hash(&path_b));
    }
}
