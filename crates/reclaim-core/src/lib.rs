//! Core types and traits for reclaim.
//!
//! This crate provides the fundamental data structures shared by the
//! scanning and mutation engines: file hit snapshots, scan options,
//! cancellation, error types and formatting helpers.

mod analytics;
mod cancel;
mod config;
mod error;
mod format;
mod hit;

pub use analytics::{AnalyticsStore, MemoryAnalyticsStore, UsageSnapshot};
pub use cancel::CancelFlag;
pub use config::{
    DuplicateScanOptions, DuplicateScanOptionsBuilder, EmptyScanOptions, EmptyScanOptionsBuilder,
    LargeScanOptions, LargeScanOptionsBuilder,
};
pub use error::{ItemError, ScanError};
pub use format::{format_date, format_size, truncate_path};
pub use hit::FileHit;
