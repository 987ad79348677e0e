//! The shared directory-traversal primitive.
//!
//! Every scanner drives the same depth-first, pre-order walk over
//! `std::fs::read_dir`. Entries are visited in the order the OS returns
//! them, with no additional sorting, so a scan of an unchanged tree is
//! deterministic. Per-entry stat/readdir failures are swallowed and
//! traversal continues with the remaining siblings; a single unreadable
//! subtree never aborts a scan.
//!
//! Symbolic links are not followed and there is no dedicated cycle
//! detection; the depth limit (default 20) is the primary defense.
//! This is a known limitation, not a guarantee.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use reclaim_core::{CancelFlag, ScanError};

/// Default depth cap applied when a scanner has no tighter bound.
pub const DEFAULT_MAX_DEPTH: u32 = 20;

/// Receives traversal events from [`TreeWalker::walk`].
pub trait WalkVisitor {
    /// Called for every regular file that passed the exclusion filter.
    fn visit_file(&mut self, path: &Path, metadata: &Metadata);

    /// Called for every directory entry before it is opened. Return
    /// `false` to skip the directory entirely (it is never read, so an
    /// unreadable or irrelevant subtree costs nothing).
    fn enter_dir(&mut self, _path: &Path, _name: &str) -> bool {
        true
    }
}

/// Exclusion predicate combining compiled globs with case-insensitive
/// substring fragments.
///
/// User-supplied patterns containing glob metacharacters are compiled
/// as case-insensitive globs against the full path; a malformed glob is
/// a configuration bug and fails construction eagerly. Plain entries
/// (and the platform system-exclude table) match as lowercase
/// substrings of the full path.
#[derive(Debug, Default)]
pub struct ExcludeFilter {
    globs: Option<GlobSet>,
    substrings: Vec<String>,
}

impl ExcludeFilter {
    /// A filter that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a filter from user-supplied patterns.
    pub fn new(patterns: &[String]) -> Result<Self, ScanError> {
        let mut builder = GlobSetBuilder::new();
        let mut has_globs = false;
        let mut substrings = Vec::new();

        for pattern in patterns {
            if pattern.contains(['*', '?', '[']) {
                let glob = GlobBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ScanError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                builder.add(glob);
                has_globs = true;
            } else {
                substrings.push(pattern.to_lowercase());
            }
        }

        let globs = if has_globs {
            Some(builder.build().map_err(|e| ScanError::InvalidPattern {
                pattern: patterns.join(", "),
                message: e.to_string(),
            })?)
        } else {
            None
        };

        Ok(Self { globs, substrings })
    }

    /// Add substring fragments (e.g. the platform system excludes).
    pub fn add_substrings<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.substrings
            .extend(fragments.into_iter().map(|s| s.into().to_lowercase()));
    }

    /// Check whether a path is excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if !self.substrings.is_empty() {
            let lower = path.to_string_lossy().to_lowercase();
            if self.substrings.iter().any(|s| lower.contains(s)) {
                return true;
            }
        }
        if let Some(globs) = &self.globs {
            if globs.is_match(path) {
                return true;
            }
        }
        false
    }
}

/// Depth-first, pre-order directory walker with cooperative
/// cancellation.
#[derive(Debug)]
pub struct TreeWalker {
    max_depth: u32,
    exclude: ExcludeFilter,
    cancel: CancelFlag,
}

impl TreeWalker {
    /// Create a walker.
    pub fn new(max_depth: u32, exclude: ExcludeFilter, cancel: CancelFlag) -> Self {
        Self {
            max_depth,
            exclude,
            cancel,
        }
    }

    /// Walk `root`, reporting entries to `visitor`.
    ///
    /// The cancellation flag is polled at every directory entry, so a
    /// stop request takes effect within one directory's worth of work
    /// regardless of subtree size. A missing or unreadable root is a
    /// no-op.
    pub fn walk<V: WalkVisitor>(&self, root: &Path, visitor: &mut V) {
        self.walk_dir(root, 0, visitor);
    }

    fn walk_dir<V: WalkVisitor>(&self, dir: &Path, depth: u32, visitor: &mut V) {
        if self.cancel.is_cancelled() {
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        for entry in entries {
            if self.cancel.is_cancelled() {
                return;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(path = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            if self.exclude.is_excluded(&path) {
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping entry without file type");
                    continue;
                }
            };

            if file_type.is_file() {
                match entry.metadata() {
                    Ok(metadata) => visitor.visit_file(&path, &metadata),
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "skipping unstattable file");
                    }
                }
            } else if file_type.is_dir() {
                let name = entry.file_name().to_string_lossy().to_string();
                if visitor.enter_dir(&path, &name) && depth < self.max_depth {
                    self.walk_dir(&path, depth + 1, visitor);
                }
            }
            // Symlinks are neither followed nor reported.
        }
    }
}

/// Enumerate the per-profile scan targets of a dynamic path: the
/// immediate subdirectories of `base` (one per user profile, skipping
/// dotted names and `All Users`), each joined with `subpath` and kept
/// only if the result exists.
pub fn per_profile_paths(base: &Path, subpath: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut targets = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || name == "All Users" {
            continue;
        }
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let target = entry.path().join(subpath);
        if target.is_dir() {
            targets.push(target);
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Collector {
        files: Vec<PathBuf>,
        dirs: Vec<PathBuf>,
        refuse: Option<String>,
    }

    impl Collector {
        fn new() -> Self {
            Self {
                files: Vec::new(),
                dirs: Vec::new(),
                refuse: None,
            }
        }
    }

    impl WalkVisitor for Collector {
        fn visit_file(&mut self, path: &Path, _metadata: &Metadata) {
            self.files.push(path.to_path_buf());
        }

        fn enter_dir(&mut self, path: &Path, name: &str) -> bool {
            self.dirs.push(path.to_path_buf());
            self.refuse.as_deref() != Some(name)
        }
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::create_dir(root.join("sub/deeper")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/b.txt"), "bb").unwrap();
        fs::write(root.join("sub/deeper/c.txt"), "ccc").unwrap();
        temp
    }

    #[test]
    fn test_walk_visits_all_files() {
        let temp = fixture();
        let walker = TreeWalker::new(DEFAULT_MAX_DEPTH, ExcludeFilter::empty(), CancelFlag::new());
        let mut collector = Collector::new();
        walker.walk(temp.path(), &mut collector);

        assert_eq!(collector.files.len(), 3);
        assert_eq!(collector.dirs.len(), 2);
    }

    #[test]
    fn test_max_depth_stops_descent() {
        let temp = fixture();
        let walker = TreeWalker::new(1, ExcludeFilter::empty(), CancelFlag::new());
        let mut collector = Collector::new();
        walker.walk(temp.path(), &mut collector);

        // a.txt and sub/b.txt are within depth 1; sub/deeper is seen
        // as an entry but never opened.
        assert_eq!(collector.files.len(), 2);
    }

    #[test]
    fn test_enter_dir_false_skips_subtree() {
        let temp = fixture();
        let walker = TreeWalker::new(DEFAULT_MAX_DEPTH, ExcludeFilter::empty(), CancelFlag::new());
        let mut collector = Collector::new();
        collector.refuse = Some("sub".to_string());
        walker.walk(temp.path(), &mut collector);

        assert_eq!(collector.files.len(), 1);
    }

    #[test]
    fn test_cancel_returns_immediately() {
        let temp = fixture();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let walker = TreeWalker::new(DEFAULT_MAX_DEPTH, ExcludeFilter::empty(), cancel);
        let mut collector = Collector::new();
        walker.walk(temp.path(), &mut collector);

        assert!(collector.files.is_empty());
        assert!(collector.dirs.is_empty());
    }

    struct CancelAfter {
        flag: CancelFlag,
        seen: usize,
        limit: usize,
    }

    impl WalkVisitor for CancelAfter {
        fn visit_file(&mut self, _path: &Path, _metadata: &Metadata) {
            self.seen += 1;
            if self.seen >= self.limit {
                self.flag.cancel();
            }
        }
    }

    #[test]
    fn test_mid_scan_cancel_is_bounded() {
        let temp = TempDir::new().unwrap();
        for i in 0..200 {
            fs::write(temp.path().join(format!("f{i:03}.bin")), b"x").unwrap();
        }

        let cancel = CancelFlag::new();
        let walker = TreeWalker::new(DEFAULT_MAX_DEPTH, ExcludeFilter::empty(), cancel.clone());
        let mut visitor = CancelAfter {
            flag: cancel,
            seen: 0,
            limit: 5,
        };
        walker.walk(temp.path(), &mut visitor);

        // The flag is polled per entry, so the walk stops right after
        // the visitor requests it instead of finishing the tree.
        assert_eq!(visitor.seen, 5);
    }

    #[test]
    fn test_exclude_substring_filter() {
        let temp = fixture();
        let mut exclude = ExcludeFilter::empty();
        exclude.add_substrings(["deeper"]);
        let walker = TreeWalker::new(DEFAULT_MAX_DEPTH, exclude, CancelFlag::new());
        let mut collector = Collector::new();
        walker.walk(temp.path(), &mut collector);

        assert_eq!(collector.files.len(), 2);
        assert_eq!(collector.dirs.len(), 1);
    }

    #[test]
    fn test_exclude_glob_filter() {
        let filter = ExcludeFilter::new(&["*.txt".to_string()]).unwrap();
        assert!(filter.is_excluded(Path::new("/tmp/a.TXT")));
        assert!(!filter.is_excluded(Path::new("/tmp/a.bin")));
    }

    #[test]
    fn test_malformed_glob_is_rejected() {
        let result = ExcludeFilter::new(&["[broken".to_string()]);
        assert!(matches!(result, Err(ScanError::InvalidPattern { .. })));
    }

    #[test]
    fn test_per_profile_paths() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("alice/FileStorage/Cache")).unwrap();
        fs::create_dir_all(base.join("bob/FileStorage/Cache")).unwrap();
        fs::create_dir_all(base.join("carol")).unwrap();
        fs::create_dir_all(base.join("All Users/FileStorage/Cache")).unwrap();
        fs::create_dir_all(base.join(".hidden/FileStorage/Cache")).unwrap();

        let mut targets = per_profile_paths(base, Path::new("FileStorage/Cache"));
        targets.sort();
        assert_eq!(
            targets,
            vec![
                base.join("alice/FileStorage/Cache"),
                base.join("bob/FileStorage/Cache"),
            ]
        );
    }
}
