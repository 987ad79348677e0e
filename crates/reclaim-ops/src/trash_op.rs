//! Async move-to-trash pipeline.
//!
//! Uses the OS trash via the `trash` crate; there is no custom trash
//! implementation, and restoration is owned by the OS, so trash moves
//! produce no undo records here.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::warn;

use reclaim_core::ItemError;

use crate::OPERATION_CHANNEL_SIZE;
use crate::delete::MutateResult;
use crate::progress::{MutationOutcome, MutationProgress};

/// Start an async move-to-trash operation.
///
/// Same per-item independent-failure policy as deletion: one failed
/// item is recorded and the batch continues.
pub fn start_move_to_trash(paths: Vec<PathBuf>) -> mpsc::Receiver<MutateResult> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        trash_impl(paths, tx).await;
    });

    rx
}

async fn trash_impl(paths: Vec<PathBuf>, tx: mpsc::Sender<MutateResult>) {
    let total = paths.len();
    let mut moved = 0usize;
    let mut freed = 0u64;
    let mut errors = Vec::new();

    for (index, path) in paths.into_iter().enumerate() {
        let target = path.clone();
        let result = tokio::task::spawn_blocking(move || trash_one(&target))
            .await
            .map_err(|e| format!("Task failed: {e}"));

        match result {
            Ok(Ok(size)) => {
                moved += 1;
                freed += size;
            }
            Ok(Err(message)) | Err(message) => {
                warn!(path = %path.display(), error = %message, "trash failed");
                errors.push(ItemError::new(path.clone(), message));
            }
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let _ = tx
            .send(MutateResult::Progress(MutationProgress::new(
                index + 1,
                total,
                name,
            )))
            .await;
    }

    let _ = tx
        .send(MutateResult::Complete(MutationOutcome::new(
            moved, freed, errors,
        )))
        .await;
}

fn trash_one(path: &Path) -> Result<u64, String> {
    let size = entry_size(path);
    trash::delete(path).map_err(|e| e.to_string())?;
    Ok(size)
}

/// Size of a file, or the recursive size of a directory.
pub(crate) fn entry_size(path: &Path) -> u64 {
    if path.is_dir() {
        dir_size(path)
    } else {
        fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}

fn dir_size(dir: &Path) -> u64 {
    let mut size = 0u64;
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                size += dir_size(&path);
            } else if let Ok(metadata) = fs::metadata(&path) {
                size += metadata.len();
            }
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let mut rx = start_move_to_trash(vec![]);
        let mut outcome = None;
        while let Some(result) = rx.recv().await {
            if let MutateResult::Complete(o) = result {
                outcome = Some(o);
            }
        }
        let outcome = outcome.unwrap();
        assert_eq!(outcome.deleted_count, 0);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_missing_path_is_recorded() {
        let mut rx = start_move_to_trash(vec![PathBuf::from("/nonexistent/reclaim/x.tmp")]);
        let mut outcome = None;
        while let Some(result) = rx.recv().await {
            if let MutateResult::Complete(o) = result {
                outcome = Some(o);
            }
        }
        let outcome = outcome.unwrap();
        assert_eq!(outcome.deleted_count, 0);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_entry_size_recurses() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("a.bin"), vec![0u8; 10]).unwrap();
        fs::write(temp.path().join("sub/b.bin"), vec![0u8; 20]).unwrap();

        assert_eq!(entry_size(temp.path()), 30);
        assert_eq!(entry_size(&temp.path().join("a.bin")), 10);
    }
}
