//! Async categorized-move pipeline.
//!
//! Moves selected files into per-category subdirectories of a base
//! path. A name collision at the target is resolved by probing
//! `name_1`, `name_2`, ... before the extension until a free name is
//! found, so a move is never silently destructive. Successful moves are
//! reversible: the caller feeds the per-item records into an
//! [`UndoStore`](crate::UndoStore).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use crate::OPERATION_CHANNEL_SIZE;
use crate::progress::{CategorizeOutcome, MoveRecord, MutationProgress};
use crate::trash_op::entry_size;

/// One category's worth of files to move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMove {
    /// Category directory name under the base path.
    pub category: String,
    /// Files to move into it.
    pub sources: Vec<PathBuf>,
}

/// Result sent through the channel during a categorized move.
#[derive(Debug)]
pub enum CategorizeResult {
    /// Progress update.
    Progress(MutationProgress),
    /// The operation completed.
    Complete(CategorizeOutcome),
}

/// Start an async categorized move of files under `base`.
pub fn start_move_to_categories(
    base: PathBuf,
    moves: Vec<CategoryMove>,
) -> mpsc::Receiver<CategorizeResult> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        categorize_impl(base, moves, tx).await;
    });

    rx
}

async fn categorize_impl(
    base: PathBuf,
    moves: Vec<CategoryMove>,
    tx: mpsc::Sender<CategorizeResult>,
) {
    let total: usize = moves.iter().map(|m| m.sources.len()).sum();
    let mut results: Vec<MoveRecord> = Vec::with_capacity(total);
    let mut current = 0usize;

    for group in moves {
        let category_dir = base.join(&group.category);
        let dir_error = fs::create_dir_all(&category_dir)
            .err()
            .map(|e| format!("Failed to create category directory: {e}"));

        for source in group.sources {
            current += 1;

            let record = if let Some(message) = &dir_error {
                MoveRecord {
                    target: category_dir.join(file_name(&source)),
                    source,
                    success: false,
                    error: Some(message.clone()),
                }
            } else {
                let target = collision_free_target(&category_dir.join(file_name(&source)));
                let source_clone = source.clone();
                let target_clone = target.clone();
                let result =
                    tokio::task::spawn_blocking(move || move_item(&source_clone, &target_clone))
                        .await
                        .map_err(|e| format!("Task failed: {e}"));

                match result {
                    Ok(Ok(())) => MoveRecord {
                        source,
                        target,
                        success: true,
                        error: None,
                    },
                    Ok(Err(message)) | Err(message) => {
                        warn!(path = %source.display(), error = %message, "move failed");
                        MoveRecord {
                            source,
                            target,
                            success: false,
                            error: Some(message),
                        }
                    }
                }
            };

            let name = file_name(&record.source);
            results.push(record);
            let _ = tx
                .send(CategorizeResult::Progress(MutationProgress::new(
                    current, total, name,
                )))
                .await;
        }
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    let failed = results.len() - succeeded;
    let _ = tx
        .send(CategorizeResult::Complete(CategorizeOutcome {
            results,
            succeeded,
            failed,
        }))
        .await;
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Find a target path that does not collide with an existing file.
///
/// `report.pdf` probes `report_1.pdf`, `report_2.pdf`, ... and returns
/// the first free name.
pub fn collision_free_target(target: &Path) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }

    let parent = target.parent().unwrap_or(Path::new(""));
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = target.extension().map(|e| e.to_string_lossy().to_string());

    let mut counter = 1u32;
    loop {
        let candidate_name = match &extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = parent.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move one item: rename fast path, copy + remove fallback for
/// cross-filesystem moves.
fn move_item(source: &Path, target: &Path) -> Result<(), String> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    if source.is_dir() {
        copy_dir_recursive(source, target)?;
        fs::remove_dir_all(source).map_err(|e| format!("Failed to remove source: {e}"))?;
    } else {
        fs::copy(source, target).map_err(|e| format!("Failed to copy: {e}"))?;
        fs::remove_file(source).map_err(|e| format!("Failed to remove source: {e}"))?;
    }

    Ok(())
}

fn copy_dir_recursive(source: &Path, target: &Path) -> Result<(), String> {
    fs::create_dir_all(target).map_err(|e| format!("Failed to create directory: {e}"))?;

    let entries = fs::read_dir(source).map_err(|e| format!("Failed to read directory: {e}"))?;
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {e}"))?;
        let path = entry.path();
        let target_path = target.join(entry.file_name());

        if path.is_dir() {
            copy_dir_recursive(&path, &target_path)?;
        } else {
            fs::copy(&path, &target_path).map_err(|e| format!("Failed to copy file: {e}"))?;
        }
    }

    Ok(())
}

/// Size of the files a categorized move would relocate. Used by
/// callers that report reclaimed-from-here numbers.
pub fn planned_size(moves: &[CategoryMove]) -> u64 {
    moves
        .iter()
        .flat_map(|m| m.sources.iter())
        .map(|p| entry_size(p))
        .sum()
}
