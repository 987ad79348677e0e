//! Async delete pipeline with per-item progress.
//!
//! Files are deleted one at a time; each failure is retried once after
//! clearing the permission bits, then recorded. A path that vanished
//! between scan and delete is a recorded error, never a batch abort.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::warn;

use reclaim_core::ItemError;

use crate::progress::{MutationOutcome, MutationProgress};
use crate::OPERATION_CHANNEL_SIZE;

/// Result sent through the channel during delete/trash operations.
#[derive(Debug)]
pub enum MutateResult {
    /// Progress update.
    Progress(MutationProgress),
    /// The operation completed.
    Complete(MutationOutcome),
}

/// Start an async file-delete operation.
///
/// Returns a receiver for progress updates and the final outcome.
pub fn start_delete_files(paths: Vec<PathBuf>) -> mpsc::Receiver<MutateResult> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        delete_impl(paths, tx, delete_file).await;
    });

    rx
}

/// Start an async recursive-delete of directories (used for empty
/// folders). Same per-item independent-failure policy as file deletes.
pub fn start_delete_folders(paths: Vec<PathBuf>) -> mpsc::Receiver<MutateResult> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        delete_impl(paths, tx, delete_folder).await;
    });

    rx
}

async fn delete_impl(
    paths: Vec<PathBuf>,
    tx: mpsc::Sender<MutateResult>,
    delete_one: fn(&Path) -> Result<u64, String>,
) {
    let total = paths.len();
    let mut deleted = 0usize;
    let mut freed = 0u64;
    let mut errors = Vec::new();

    for (index, path) in paths.into_iter().enumerate() {
        let target = path.clone();
        let result = tokio::task::spawn_blocking(move || delete_one(&target))
            .await
            .map_err(|e| format!("Task failed: {e}"));

        match result {
            Ok(Ok(size)) => {
                deleted += 1;
                freed += size;
            }
            Ok(Err(message)) | Err(message) => {
                warn!(path = %path.display(), error = %message, "delete failed");
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
            deleted, freed, errors,
        )))
        .await;
}

/// Delete one file, capturing its size for the freed-bytes tally.
///
/// On failure the permission bits are reset and the unlink retried
/// once; the original error is reported if the retry fails too.
fn delete_file(path: &Path) -> Result<u64, String> {
    let metadata = fs::metadata(path).map_err(|e| e.to_string())?;
    let size = metadata.len();

    match fs::remove_file(path) {
        Ok(()) => Ok(size),
        Err(first) => {
            let mut permissions = metadata.permissions();
            set_writable(&mut permissions);
            if fs::set_permissions(path, permissions).is_ok() && fs::remove_file(path).is_ok() {
                return Ok(size);
            }
            Err(first.to_string())
        }
    }
}

/// Recursively delete one directory tree.
fn delete_folder(path: &Path) -> Result<u64, String> {
    if !path.is_dir() {
        return Err("Not a directory".to_string());
    }
    fs::remove_dir_all(path).map_err(|e| e.to_string())?;
    Ok(0)
}

#[cfg(unix)]
fn set_writable(permissions: &mut fs::Permissions) {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(0o666);
}

#[cfg(not(unix))]
fn set_writable(permissions: &mut fs::Permissions) {
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn drain(mut rx: mpsc::Receiver<MutateResult>) -> (usize, MutationOutcome) {
        let mut progress_events = 0;
        while let Some(result) = rx.recv().await {
            match result {
                MutateResult::Progress(_) => progress_events += 1,
                MutateResult::Complete(outcome) => return (progress_events, outcome),
            }
        }
        unreachable!("channel closed without completion");
    }

    #[tokio::test]
    async fn test_delete_reports_freed_bytes() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.tmp");
        let b = temp.path().join("b.tmp");
        fs::write(&a, vec![0u8; 100]).unwrap();
        fs::write(&b, vec![0u8; 50]).unwrap();

        let (progress_events, outcome) = drain(start_delete_files(vec![a.clone(), b.clone()])).await;

        assert_eq!(progress_events, 2);
        assert_eq!(outcome.deleted_count, 2);
        assert_eq!(outcome.freed_size, 150);
        assert!(outcome.errors.is_empty());
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[tokio::test]
    async fn test_missing_path_is_per_item_error() {
        let temp = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..5 {
            let path = temp.path().join(format!("f{i}.tmp"));
            if i != 2 {
                fs::write(&path, b"data").unwrap();
            }
            paths.push(path);
        }

        let (_, outcome) = drain(start_delete_files(paths.clone())).await;

        assert_eq!(outcome.deleted_count, 4);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].path, paths[2]);
    }

    #[tokio::test]
    async fn test_empty_batch_completes() {
        let (progress_events, outcome) = drain(start_delete_files(vec![])).await;
        assert_eq!(progress_events, 0);
        assert_eq!(outcome.deleted_count, 0);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_delete_folders_partial_failure() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("empty");
        fs::create_dir(&real).unwrap();
        let ghost = temp.path().join("ghost");

        let (_, outcome) = drain(start_delete_folders(vec![real.clone(), ghost])).await;

        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(!real.exists());
    }

    #[test]
    fn test_delete_file_clears_readonly() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("readonly.tmp");
        fs::write(&path, b"data").unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let freed = delete_file(&path).unwrap();
        assert_eq!(freed, 4);
        assert!(!path.exists());
    }
}
