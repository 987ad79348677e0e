//! Filesystem scan engine for reclaim.
//!
//! Four scanners built on one traversal primitive:
//!
//! - [`JunkScanner`] - categorized junk files, driven by the
//!   `reclaim-rules` registry
//! - [`LargeFileScanner`] - files over a size threshold, with type and
//!   directory statistics
//! - [`EmptyFolderScanner`] - recursively-empty directories
//! - [`DuplicateScanner`] - size+name candidate groups, optionally
//!   confirmed by bounded-prefix content hash
//!
//! Every scan is a fresh, synchronous, single-threaded depth-first
//! traversal: entries are visited in the order the OS returns them, so
//! results for an unchanged tree are deterministic, and a shared
//! [`CancelFlag`](reclaim_core::CancelFlag) is polled at every
//! directory entry for cooperative cancellation. Per-item I/O errors
//! are swallowed; a cancelled scan returns partial data, not an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use reclaim_core::LargeScanOptions;
//! use reclaim_rules::PathRules;
//! use reclaim_scan::LargeFileScanner;
//!
//! let scanner = LargeFileScanner::new(PathRules::new());
//! let report = scanner.scan(&LargeScanOptions::new("/")).unwrap();
//! println!("{} large files", report.file_count);
//! ```
//!
//! # Progress monitoring
//!
//! Each scanner broadcasts its own progress event type:
//!
//! ```rust,no_run
//! use reclaim_rules::PathRules;
//! use reclaim_scan::JunkScanner;
//!
//! let scanner = JunkScanner::new(&PathRules::new()).unwrap();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         eprintln!("{} ({}%)", progress.category, progress.percentage);
//!     }
//! });
//! ```

mod duplicates;
mod empty;
mod junk;
mod large;
mod progress;
mod walker;

pub use duplicates::{DuplicateGroup, DuplicateScanReport, DuplicateScanner};
pub use empty::{EmptyFolderHit, EmptyFolderScanner, EmptyScanReport};
pub use junk::{JunkCategoryResult, JunkScanReport, JunkScanner};
pub use large::{DirectoryStat, LargeFileHit, LargeFileScanner, LargeScanReport, TypeStat};
pub use progress::{
    DuplicateScanProgress, EmptyScanProgress, JunkScanProgress, LargeScanProgress,
};
pub use walker::{DEFAULT_MAX_DEPTH, ExcludeFilter, TreeWalker, WalkVisitor, per_profile_paths};

// Re-export core types for convenience
pub use reclaim_core::{
    CancelFlag, DuplicateScanOptions, EmptyScanOptions, FileHit, LargeScanOptions, ScanError,
};
