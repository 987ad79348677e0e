//! Cooperative cancellation flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared stop flag polled by the scanners at every directory entry.
///
/// Cancellation is cooperative only: no in-flight syscall is
/// interrupted, and a cancelled scan returns whatever it accumulated so
/// far rather than an error. Clones share the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the operation holding this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clear the flag. Called by a scanner at the start of each scan so
    /// a stale stop request from a previous run does not abort the new
    /// one.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
