//! Display formatting helpers shared by the result types.

use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Format a byte count in human-readable binary units.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a modification time as `YYYY-MM-DD` for display fields.
pub fn format_date(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d").to_string()
}

/// Shorten a long path for progress display, keeping the start and the
/// tail around an ellipsis.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_len || max_len < 24 {
        return path.to_string();
    }
    let head: String = chars[..20].iter().collect();
    let tail: String = chars[chars.len() - (max_len - 23)..].iter().collect();
    format!("{head}...{tail}")
}
