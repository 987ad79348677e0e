//! Junk classification over the category tables.

use std::time::SystemTime;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use reclaim_core::ScanError;

use crate::categories::JunkCategoryDef;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// A category definition with its name globs compiled.
///
/// Compilation happens once per scan, before any traversal; a pattern
/// that fails to compile is a configuration bug and fails the whole
/// operation eagerly.
#[derive(Debug)]
pub struct CompiledCategory {
    /// The underlying definition.
    pub def: JunkCategoryDef,
    patterns: Option<GlobSet>,
}

impl CompiledCategory {
    /// Compile one definition.
    pub fn compile(def: JunkCategoryDef) -> Result<Self, ScanError> {
        let patterns = if def.name_patterns.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &def.name_patterns {
                let glob = GlobBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ScanError::InvalidPattern {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })?;
                builder.add(glob);
            }
            Some(
                builder
                    .build()
                    .map_err(|e| ScanError::InvalidPattern {
                        pattern: def.name_patterns.join(", "),
                        message: e.to_string(),
                    })?,
            )
        };
        Ok(Self { def, patterns })
    }

    /// Decide whether a file belongs to this category.
    ///
    /// A file matches when its extension is in the allowlist (or the
    /// allowlist is empty), or its name matches a glob. With no
    /// extension filter and no globs every file under the category's
    /// paths matches. A `min_age_days` gate excludes files newer than
    /// the threshold regardless of the name match.
    pub fn matches_file(&self, name: &str, ext: &str, modified: SystemTime) -> bool {
        let ext_ok = self.def.extensions.is_empty()
            || self
                .def
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext));
        let pattern_ok = self.patterns.as_ref().is_some_and(|set| set.is_match(name));
        if !(ext_ok || pattern_ok) {
            return false;
        }

        if let Some(days) = self.def.min_age_days {
            let old_enough = modified
                .elapsed()
                .map(|age| age.as_secs() >= days * SECONDS_PER_DAY)
                .unwrap_or(false);
            if !old_enough {
                return false;
            }
        }

        true
    }
}

/// Compile a whole registry, preserving table order.
pub fn compile_categories(
    defs: Vec<JunkCategoryDef>,
) -> Result<Vec<CompiledCategory>, ScanError> {
    defs.into_iter().map(CompiledCategory::compile).collect()
}
