//! Progress and outcome types for mutation operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use reclaim_core::{ItemError, format_size};

/// Progress for an ongoing delete/trash/move batch, emitted per item.
#[derive(Debug, Clone)]
pub struct MutationProgress {
    /// Items attempted so far, including the current one.
    pub current: usize,
    /// Total items in the batch.
    pub total: usize,
    /// Name of the item just processed.
    pub file: String,
    /// Whole-percent completion.
    pub percentage: u32,
}

impl MutationProgress {
    pub(crate) fn new(current: usize, total: usize, file: String) -> Self {
        Self {
            current,
            total,
            file,
            percentage: ((current * 100) / total.max(1)) as u32,
        }
    }
}

/// Final accounting for a delete/trash batch.
///
/// Every item is attempted independently; a batch never partial-fails
/// as a whole, and each failed item appears exactly once in `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    /// Items successfully deleted or moved.
    pub deleted_count: usize,
    /// Bytes reclaimed.
    pub freed_size: u64,
    /// Human-readable reclaimed size.
    pub freed_size_formatted: String,
    /// One entry per failed item.
    pub errors: Vec<ItemError>,
}

impl MutationOutcome {
    pub(crate) fn new(deleted_count: usize, freed_size: u64, errors: Vec<ItemError>) -> Self {
        Self {
            deleted_count,
            freed_size,
            freed_size_formatted: format_size(freed_size),
            errors,
        }
    }

    /// Check whether every item succeeded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of moving one file into a category directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// Original location.
    pub source: PathBuf,
    /// Where the file was (or would have been) placed, after any
    /// collision renaming.
    pub target: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final accounting for a categorized move batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeOutcome {
    /// One record per source file, in input order.
    pub results: Vec<MoveRecord>,
    pub succeeded: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(MutationProgress::new(1, 4, String::new()).percentage, 25);
        assert_eq!(MutationProgress::new(4, 4, String::new()).percentage, 100);
        // An empty batch must not divide by zero.
        assert_eq!(MutationProgress::new(0, 0, String::new()).percentage, 0);
    }

    #[test]
    fn test_outcome_success() {
        assert!(MutationOutcome::new(3, 100, vec![]).is_success());
        assert!(
            !MutationOutcome::new(2, 100, vec![ItemError::new("/x", "gone")]).is_success()
        );
    }
}
