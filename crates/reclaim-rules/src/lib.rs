//! Platform path tables and file classification rules for reclaim.
//!
//! Everything in this crate is static or derived configuration data:
//! which directories each cleanup feature looks at per platform
//! ([`PathRules`]), which files count as junk for each category
//! ([`JunkCategoryDef`] plus the [`classify`] matcher), and which
//! display bucket a large file falls into ([`file_types`]).
//!
//! No scanner logic lives here; the scan engine consumes these tables
//! and the tables can be swapped per target OS without touching it.

mod categories;
mod classify;
mod file_types;
mod platform;

pub use categories::{
    CategoryGroup, DynamicPath, JunkCategoryDef, category_groups, group_display_name,
    junk_categories,
};
pub use classify::{CompiledCategory, compile_categories};
pub use file_types::{LargeFileTypeDef, classify_extension, file_type_def, file_types};
pub use platform::{PathRules, Platform};
