//! Scan option types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default minimum size for the large-file scan: 100 MiB.
pub const DEFAULT_LARGE_MIN_SIZE: u64 = 100 * 1024 * 1024;

/// Default minimum size for the duplicate scan: 1 MiB.
pub const DEFAULT_DUPLICATE_MIN_SIZE: u64 = 1024 * 1024;

/// Options for a large-file scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(rename_all = "camelCase")]
pub struct LargeScanOptions {
    /// Root path (volume root or any directory) to scan.
    pub root: PathBuf,

    /// Minimum file size in bytes to report.
    #[builder(default = "DEFAULT_LARGE_MIN_SIZE")]
    #[serde(default = "default_large_min_size")]
    pub min_size: u64,

    /// Maximum traversal depth below each scanned root.
    #[builder(default = "15")]
    #[serde(default = "default_large_depth")]
    pub max_depth: u32,

    /// Extra exclude patterns on top of the platform system excludes.
    /// Entries containing glob metacharacters are compiled as
    /// case-insensitive globs; plain entries match as case-insensitive
    /// path substrings.
    #[builder(default)]
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Restrict reported hits to one type bucket (by key). Does not
    /// change traversal; filtering happens at match time.
    #[builder(default)]
    #[serde(default)]
    pub type_filter: Option<String>,
}

fn default_large_min_size() -> u64 {
    DEFAULT_LARGE_MIN_SIZE
}

fn default_large_depth() -> u32 {
    15
}

impl LargeScanOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(&self.root)
    }
}

impl LargeScanOptions {
    /// Create a new options builder.
    pub fn builder() -> LargeScanOptionsBuilder {
        LargeScanOptionsBuilder::default()
    }

    /// Create options with defaults for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            min_size: DEFAULT_LARGE_MIN_SIZE,
            max_depth: 15,
            exclude_paths: Vec::new(),
            type_filter: None,
        }
    }
}

/// Options for a duplicate-file scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(rename_all = "camelCase")]
pub struct DuplicateScanOptions {
    /// Root path to scan.
    pub root: PathBuf,

    /// Minimum file size in bytes to consider.
    #[builder(default = "DEFAULT_DUPLICATE_MIN_SIZE")]
    #[serde(default = "default_duplicate_min_size")]
    pub min_size: u64,

    /// Maximum traversal depth.
    #[builder(default = "10")]
    #[serde(default = "default_duplicate_depth")]
    pub max_depth: u32,

    /// Confirm size+name candidate groups with a bounded-prefix content
    /// hash. Slower but far fewer false positives.
    #[builder(default = "false")]
    #[serde(default)]
    pub use_hash: bool,
}

fn default_duplicate_min_size() -> u64 {
    DEFAULT_DUPLICATE_MIN_SIZE
}

fn default_duplicate_depth() -> u32 {
    10
}

impl DuplicateScanOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(&self.root)
    }
}

impl DuplicateScanOptions {
    /// Create a new options builder.
    pub fn builder() -> DuplicateScanOptionsBuilder {
        DuplicateScanOptionsBuilder::default()
    }

    /// Create options with defaults for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            min_size: DEFAULT_DUPLICATE_MIN_SIZE,
            max_depth: 10,
            use_hash: false,
        }
    }
}

/// Options for an empty-folder scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(rename_all = "camelCase")]
pub struct EmptyScanOptions {
    /// Root path to scan.
    pub root: PathBuf,

    /// Maximum traversal depth. Also the primary defense against
    /// symlink cycles; there is no dedicated cycle detection.
    #[builder(default = "20")]
    #[serde(default = "default_empty_depth")]
    pub max_depth: u32,
}

fn default_empty_depth() -> u32 {
    20
}

impl EmptyScanOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(&self.root)
    }
}

impl EmptyScanOptions {
    /// Create a new options builder.
    pub fn builder() -> EmptyScanOptionsBuilder {
        EmptyScanOptionsBuilder::default()
    }

    /// Create options with defaults for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: 20,
        }
    }
}

fn validate_root(root: &Option<PathBuf>) -> Result<(), String> {
    match root {
        Some(path) if path.as_os_str().is_empty() => Err("Root path cannot be empty".to_string()),
        Some(_) => Ok(()),
        None => Err("Root path is required".to_string()),
    }
}
