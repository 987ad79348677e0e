//! Scan progress events.
//!
//! Each scanner owns a broadcast channel and emits its own event type
//! at the granularity that fits it: the junk scan reports per category
//! (categories number in the dozens, files in the thousands), the
//! large-file scan is time-throttled, the empty-folder and duplicate
//! scans report every N items. Within one scan, counters are
//! monotonically non-decreasing.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress for a junk scan, emitted after each category completes.
#[derive(Debug, Clone)]
pub struct JunkScanProgress {
    /// Categories finished so far.
    pub current: usize,
    /// Total number of categories.
    pub total: usize,
    /// Display name of the category just finished.
    pub category: String,
    /// Whole-percent completion over categories.
    pub percentage: u32,
    /// Files matched so far, across categories.
    pub total_scanned: usize,
    /// Bytes matched so far, across categories.
    pub total_size: u64,
}

/// Progress for a large-file scan, throttled to ~5 events per second.
#[derive(Debug, Clone)]
pub struct LargeScanProgress {
    /// Files stat()ed so far.
    pub scanned_files: u64,
    /// Directories entered so far.
    pub scanned_dirs: u64,
    /// Directory currently being scanned, truncated for display.
    pub current_path: String,
    /// Candidates found so far.
    pub found_large_files: usize,
}

/// Progress for an empty-folder scan, emitted every 50 directories.
#[derive(Debug, Clone)]
pub struct EmptyScanProgress {
    /// Directories examined so far.
    pub scanned_dirs: u64,
    /// Empty folders found so far.
    pub found_empty: usize,
    /// Directory currently being examined.
    pub current_path: PathBuf,
}

/// Progress for a duplicate scan, emitted every 200 files.
#[derive(Debug, Clone)]
pub struct DuplicateScanProgress {
    /// Files examined so far.
    pub scanned_files: u64,
    /// Directory currently being scanned.
    pub current_path: PathBuf,
    /// Candidate groups (two or more members) so far.
    pub potential_duplicates: usize,
}

/// Time-based rate limiter for progress emission.
#[derive(Debug)]
pub(crate) struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true (and arms the timer) when enough time has passed
    /// since the last accepted event.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
