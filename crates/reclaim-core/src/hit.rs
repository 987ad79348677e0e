//! File hit snapshots.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::format::{format_date, format_size};

/// An immutable snapshot of one file found during a scan.
///
/// Taken at stat() time; no live handle is retained. The size and
/// timestamp may be stale by the time the file is deleted, so the
/// mutation pipeline re-stats targets and treats "already gone" as a
/// recorded per-item error rather than a batch failure.
///
/// Field names are a JSON contract with the consuming UI/report layer;
/// keep them stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHit {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name without the directory.
    pub name: String,
    /// Size in bytes at stat() time.
    pub size: u64,
    /// Human-readable size.
    pub size_formatted: String,
    /// Lowercased extension including the leading dot, or empty.
    pub extension: String,
    /// Modification time.
    pub modified: DateTime<Local>,
    /// Modification time as `YYYY-MM-DD`.
    pub modified_formatted: String,
    /// The containing directory.
    pub directory: PathBuf,
}

impl FileHit {
    /// Build a hit from a path and its already-fetched metadata.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let modified_at = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let size = metadata.len();

        Self {
            path: path.to_path_buf(),
            name,
            size,
            size_formatted: format_size(size),
            extension,
            modified: modified_at.into(),
            modified_formatted: format_date(modified_at),
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        }
    }
}
