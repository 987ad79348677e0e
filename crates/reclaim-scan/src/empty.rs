//! Empty-folder scanner.
//!
//! A directory is empty iff it directly contains no files and every
//! subdirectory under it is, recursively, also empty. Directories found
//! empty are reported once at their own level and not descended into
//! further: deleting the reported directory removes its empty children
//! with it.

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::broadcast;

use reclaim_core::{CancelFlag, EmptyScanOptions};

use crate::progress::EmptyScanProgress;
use crate::walker::{ExcludeFilter, TreeWalker, WalkVisitor};

/// System/VCS directory names never reported or descended into,
/// compared case-insensitively against the entry name only.
const SKIP_DIR_NAMES: &[&str] = &[
    "$recycle.bin",
    "system volume information",
    "windows",
    "node_modules",
    ".git",
];

/// Progress cadence, in directories.
const PROGRESS_EVERY_DIRS: u64 = 50;

/// Progress channel capacity.
const PROGRESS_CHANNEL_SIZE: usize = 100;

/// One empty directory found by the scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyFolderHit {
    pub path: PathBuf,
    pub name: String,
    pub parent: PathBuf,
}

/// Result of an empty-folder scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyScanReport {
    /// Empty folders in traversal order.
    pub folders: Vec<EmptyFolderHit>,
    pub count: usize,
    /// Directories examined.
    pub scanned_dirs: u64,
}

/// Scanner for recursively-empty directories.
pub struct EmptyFolderScanner {
    progress_tx: broadcast::Sender<EmptyScanProgress>,
    cancel: CancelFlag,
}

impl Default for EmptyFolderScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyFolderScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self {
            progress_tx,
            cancel: CancelFlag::new(),
        }
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<EmptyScanProgress> {
        self.progress_tx.subscribe()
    }

    /// The flag a controller can set to stop the running scan.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Scan for empty directories under `options.root`.
    ///
    /// The root itself is never reported, only directories below it. A
    /// cancelled scan returns what was found so far.
    pub fn scan(&self, options: &EmptyScanOptions) -> EmptyScanReport {
        self.cancel.reset();

        let walker = TreeWalker::new(
            options.max_depth,
            ExcludeFilter::empty(),
            self.cancel.clone(),
        );
        let mut visitor = EmptyVisitor {
            folders: Vec::new(),
            scanned_dirs: 0,
            memo: HashMap::new(),
            progress_tx: &self.progress_tx,
        };
        walker.walk(&options.root, &mut visitor);

        EmptyScanReport {
            count: visitor.folders.len(),
            scanned_dirs: visitor.scanned_dirs,
            folders: visitor.folders,
        }
    }
}

struct EmptyVisitor<'a> {
    folders: Vec<EmptyFolderHit>,
    scanned_dirs: u64,
    memo: HashMap<PathBuf, bool>,
    progress_tx: &'a broadcast::Sender<EmptyScanProgress>,
}

impl WalkVisitor for EmptyVisitor<'_> {
    fn visit_file(&mut self, _path: &Path, _metadata: &Metadata) {}

    fn enter_dir(&mut self, path: &Path, name: &str) -> bool {
        let lower = name.to_lowercase();
        if SKIP_DIR_NAMES.contains(&lower.as_str()) {
            return false;
        }

        self.scanned_dirs += 1;
        if self.scanned_dirs % PROGRESS_EVERY_DIRS == 0 {
            let _ = self.progress_tx.send(EmptyScanProgress {
                scanned_dirs: self.scanned_dirs,
                found_empty: self.folders.len(),
                current_path: path.to_path_buf(),
            });
        }

        if is_empty_dir(path, &mut self.memo) {
            self.folders.push(EmptyFolderHit {
                path: path.to_path_buf(),
                name: name.to_string(),
                parent: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            });
            // An empty directory's (empty) children are covered by this
            // hit; do not list them separately.
            return false;
        }

        true
    }
}

/// Bottom-up emptiness test: no files here and every subdirectory is
/// itself empty. Short-circuits on the first file found. Unreadable
/// directories count as non-empty so nothing unknown gets deleted.
/// Memoized so shared subtrees are only walked once per scan.
fn is_empty_dir(path: &Path, memo: &mut HashMap<PathBuf, bool>) -> bool {
    if let Some(&known) = memo.get(path) {
        return known;
    }

    let verdict = check_empty(path, memo);
    memo.insert(path.to_path_buf(), verdict);
    verdict
}

fn check_empty(path: &Path, memo: &mut HashMap<PathBuf, bool>) -> bool {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return false,
    };

    for entry in entries {
        let Ok(entry) = entry else {
            return false;
        };
        let entry_path = entry.path();
        match std::fs::metadata(&entry_path) {
            Ok(metadata) if metadata.is_dir() => {
                if !is_empty_dir(&entry_path, memo) {
                    return false;
                }
            }
            // Files, symlink targets, and anything unstattable all
            // disqualify the tree.
            _ => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reports_only_truly_empty_dirs() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("empty1")).unwrap();
        fs::create_dir(temp.path().join("hasfile")).unwrap();
        fs::write(temp.path().join("hasfile/x.txt"), b"content").unwrap();

        let scanner = EmptyFolderScanner::new();
        let report = scanner.scan(&EmptyScanOptions::new(temp.path()));

        assert_eq!(report.count, 1);
        assert_eq!(report.folders[0].path, temp.path().join("empty1"));
        assert_eq!(report.folders[0].name, "empty1");
        assert_eq!(report.folders[0].parent, temp.path());
    }

    #[test]
    fn test_nested_empty_tree_reported_once_at_top() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("outer/inner/deepest")).unwrap();

        let scanner = EmptyFolderScanner::new();
        let report = scanner.scan(&EmptyScanOptions::new(temp.path()));

        assert_eq!(report.count, 1);
        assert_eq!(report.folders[0].path, temp.path().join("outer"));
    }

    #[test]
    fn test_deep_file_disqualifies_whole_chain() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b/c")).unwrap();
        fs::write(temp.path().join("a/b/c/file.txt"), b"x").unwrap();

        let scanner = EmptyFolderScanner::new();
        let report = scanner.scan(&EmptyScanOptions::new(temp.path()));

        assert_eq!(report.count, 0);
    }

    #[test]
    fn test_skip_list_dirs_not_reported() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::create_dir(temp.path().join("node_modules")).unwrap();
        fs::create_dir(temp.path().join("plain")).unwrap();

        let scanner = EmptyFolderScanner::new();
        let report = scanner.scan(&EmptyScanOptions::new(temp.path()));

        assert_eq!(report.count, 1);
        assert_eq!(report.folders[0].name, "plain");
    }

    #[test]
    fn test_scan_is_idempotent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("empty_a")).unwrap();
        fs::create_dir_all(temp.path().join("full/sub")).unwrap();
        fs::write(temp.path().join("full/keep.txt"), b"k").unwrap();

        let scanner = EmptyFolderScanner::new();
        let first = scanner.scan(&EmptyScanOptions::new(temp.path()));
        let second = scanner.scan(&EmptyScanOptions::new(temp.path()));

        let paths = |r: &EmptyScanReport| r.folders.iter().map(|f| f.path.clone()).collect::<Vec<_>>();
        assert_eq!(paths(&first), paths(&second));
        // full/sub is empty, full is not
        assert!(paths(&first).contains(&temp.path().join("full/sub")));
        assert!(paths(&first).contains(&temp.path().join("empty_a")));
        assert_eq!(first.count, 2);
    }
}
