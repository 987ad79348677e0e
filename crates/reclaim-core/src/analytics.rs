//! Disk-usage history for trend reporting.
//!
//! The usage history is an injected store interface rather than
//! module-level state: whoever hosts the engine decides where snapshots
//! live (memory, a history database, nothing at all).

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

/// One point-in-time measurement of a volume's usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// When the snapshot was taken.
    pub taken_at: DateTime<Local>,
    /// Volume root the snapshot describes.
    pub volume: String,
    /// Total capacity in bytes.
    pub total: u64,
    /// Free bytes.
    pub free: u64,
    /// Used bytes.
    pub used: u64,
}

impl UsageSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn now(volume: impl Into<String>, total: u64, free: u64) -> Self {
        Self {
            taken_at: Local::now(),
            volume: volume.into(),
            total,
            free,
            used: total.saturating_sub(free),
        }
    }
}

/// Store for cumulative disk-usage history.
pub trait AnalyticsStore {
    /// Append one snapshot.
    fn append(&mut self, snapshot: UsageSnapshot);

    /// Snapshots taken within the last `days` days, oldest first.
    fn recent_window(&self, days: i64) -> Vec<UsageSnapshot>;
}

/// Bounded in-memory analytics store.
#[derive(Debug)]
pub struct MemoryAnalyticsStore {
    snapshots: VecDeque<UsageSnapshot>,
    max_entries: usize,
}

impl Default for MemoryAnalyticsStore {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl MemoryAnalyticsStore {
    /// Create a store keeping at most `max_entries` snapshots.
    pub fn new(max_entries: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(max_entries.min(1000)),
            max_entries,
        }
    }

    /// Get the number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl AnalyticsStore for MemoryAnalyticsStore {
    fn append(&mut self, snapshot: UsageSnapshot) {
        if self.snapshots.len() >= self.max_entries {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    fn recent_window(&self, days: i64) -> Vec<UsageSnapshot> {
        let cutoff = Local::now() - Duration::days(days);
        self.snapshots
            .iter()
            .filter(|s| s.taken_at >= cutoff)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_window() {
        let mut store = MemoryAnalyticsStore::new(10);
        store.append(UsageSnapshot::now("/", 1000, 400));
        store.append(UsageSnapshot::now("/", 1000, 300));

        let window = store.recent_window(1);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].used, 600);
        assert_eq!(window[1].used, 700);
    }

    #[test]
    fn test_old_snapshots_fall_out_of_window() {
        let mut store = MemoryAnalyticsStore::new(10);
        let mut stale = UsageSnapshot::now("/", 1000, 500);
        stale.taken_at = Local::now() - Duration::days(30);
        store.append(stale);
        store.append(UsageSnapshot::now("/", 1000, 100));

        assert_eq!(store.len(), 2);
        assert_eq!(store.recent_window(7).len(), 1);
    }

    #[test]
    fn test_capacity_bound() {
        let mut store = MemoryAnalyticsStore::new(3);
        for i in 0..5u64 {
            store.append(UsageSnapshot::now("/", 1000, i));
        }
        assert_eq!(store.len(), 3);
        // Oldest entries were dropped
        let window = store.recent_window(1);
        assert_eq!(window.first().unwrap().free, 2);
    }
}
