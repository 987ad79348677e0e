//! Junk file scanner.
//!
//! Drives one walk per registered category (plus the per-profile
//! dynamic locations) and aggregates matched files per category. An
//! inaccessible or missing root is a skip, never a scan failure; the
//! scan only returns what was accessible.

use std::time::SystemTime;

use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use reclaim_core::{CancelFlag, FileHit, ScanError, format_size};
use reclaim_rules::{
    CompiledCategory, JunkCategoryDef, PathRules, compile_categories, group_display_name,
    junk_categories,
};

use crate::progress::JunkScanProgress;
use crate::walker::{ExcludeFilter, TreeWalker, WalkVisitor, per_profile_paths};

/// Depth limit below each category scan path.
const CATEGORY_MAX_DEPTH: u32 = 5;

/// Progress channel capacity.
const PROGRESS_CHANNEL_SIZE: usize = 100;

/// Everything found for one category in one scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunkCategoryResult {
    /// Category machine key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Display icon.
    pub icon: String,
    /// Group key.
    pub group: String,
    /// Group display name.
    pub group_name: String,
    /// What this category cleans.
    pub description: String,
    /// Caveat for categories that are not safe by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Whether the category is safe to clean without review.
    pub safe_to_clean: bool,
    /// Matched files.
    pub files: Vec<FileHit>,
    /// Sum of matched file sizes. Recomputed from `files`, never
    /// cached.
    pub total_size: u64,
    /// Human-readable total.
    pub total_size_formatted: String,
    /// Number of matched files.
    pub file_count: usize,
}

impl JunkCategoryResult {
    fn from_def(def: &JunkCategoryDef) -> Self {
        Self {
            key: def.key.to_string(),
            name: def.name.to_string(),
            icon: def.icon.to_string(),
            group: def.group.to_string(),
            group_name: group_display_name(def.group).to_string(),
            description: def.description.to_string(),
            warning: def.warning.map(str::to_string),
            safe_to_clean: def.safe_to_clean,
            files: Vec::new(),
            total_size: 0,
            total_size_formatted: format_size(0),
            file_count: 0,
        }
    }

    fn finalize(&mut self) {
        self.total_size = self.files.iter().map(|f| f.size).sum();
        self.total_size_formatted = format_size(self.total_size);
        self.file_count = self.files.len();
    }
}

/// Result of a full junk scan, keyed by category in table order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunkScanReport {
    /// Per-category results in registry order.
    pub categories: IndexMap<String, JunkCategoryResult>,
    /// Files matched across all categories.
    pub total_files: usize,
    /// Bytes matched across all categories.
    pub total_size: u64,
    /// Human-readable total.
    pub total_size_formatted: String,
}

/// Scanner over the junk category registry.
pub struct JunkScanner {
    categories: Vec<CompiledCategory>,
    progress_tx: broadcast::Sender<JunkScanProgress>,
    cancel: CancelFlag,
}

impl JunkScanner {
    /// Build a scanner for the platform's full category registry.
    ///
    /// Fails eagerly if any category pattern does not compile.
    pub fn new(rules: &PathRules) -> Result<Self, ScanError> {
        Self::with_categories(junk_categories(rules))
    }

    /// Build a scanner over an explicit category list.
    pub fn with_categories(defs: Vec<JunkCategoryDef>) -> Result<Self, ScanError> {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Ok(Self {
            categories: compile_categories(defs)?,
            progress_tx,
            cancel: CancelFlag::new(),
        })
    }

    /// Subscribe to category-level progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<JunkScanProgress> {
        self.progress_tx.subscribe()
    }

    /// The flag a controller can set to stop the running scan.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Scan every category and return per-category results.
    ///
    /// A cancelled scan returns the categories finished so far.
    pub fn scan(&self) -> JunkScanReport {
        self.cancel.reset();

        let total = self.categories.len();
        let mut categories = IndexMap::with_capacity(total);
        let mut total_files = 0usize;
        let mut total_size = 0u64;

        for (index, category) in self.categories.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }

            let mut result = JunkCategoryResult::from_def(&category.def);

            for path in &category.def.scan_paths {
                if !path.is_dir() {
                    // Most categories are platform- or app-conditional.
                    continue;
                }
                self.scan_category_path(category, path, &mut result.files);
            }

            for dynamic in &category.def.dynamic_paths {
                for target in per_profile_paths(&dynamic.base, &dynamic.per_profile_subpath) {
                    self.scan_category_path(category, &target, &mut result.files);
                }
            }

            result.finalize();
            total_files += result.file_count;
            total_size += result.total_size;

            let _ = self.progress_tx.send(JunkScanProgress {
                current: index + 1,
                total,
                category: result.name.clone(),
                percentage: (((index + 1) * 100) / total.max(1)) as u32,
                total_scanned: total_files,
                total_size,
            });

            categories.insert(result.key.clone(), result);
        }

        JunkScanReport {
            categories,
            total_files,
            total_size,
            total_size_formatted: format_size(total_size),
        }
    }

    fn scan_category_path(
        &self,
        category: &CompiledCategory,
        root: &std::path::Path,
        out: &mut Vec<FileHit>,
    ) {
        debug!(category = category.def.key, path = %root.display(), "scanning");
        let walker = TreeWalker::new(
            CATEGORY_MAX_DEPTH,
            ExcludeFilter::empty(),
            self.cancel.clone(),
        );
        let mut visitor = CategoryVisitor { category, out };
        walker.walk(root, &mut visitor);
    }
}

struct CategoryVisitor<'a> {
    category: &'a CompiledCategory,
    out: &'a mut Vec<FileHit>,
}

impl WalkVisitor for CategoryVisitor<'_> {
    fn visit_file(&mut self, path: &std::path::Path, metadata: &std::fs::Metadata) {
        let hit = FileHit::from_metadata(path, metadata);
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if self
            .category
            .matches_file(&hit.name, &hit.extension, modified)
        {
            self.out.push(hit);
        }
    }
}
