//! Bulk deletion and move pipeline for reclaim.
//!
//! Every destructive operation follows the same shape: a `start_*`
//! function spawns the work and returns an `mpsc` receiver of progress
//! updates followed by one completion message. Items are processed
//! sequentially and fail independently; a batch never aborts because
//! one path is gone or unreadable, and every failed item appears
//! exactly once in the outcome's error list.
//!
//! - [`start_delete_files`] - unlink with a permission-fix retry
//! - [`start_delete_folders`] - recursive delete for empty folders
//! - [`start_move_to_trash`] - OS trash via the `trash` crate
//! - [`start_move_to_categories`] - collision-safe categorized moves,
//!   the only reversible operation; feed its records to an
//!   [`UndoStore`]

mod categorize;
mod delete;
mod progress;
mod trash_op;
mod undo;

pub use categorize::{
    CategorizeResult, CategoryMove, collision_free_target, planned_size, start_move_to_categories,
};
pub use delete::{MutateResult, start_delete_files, start_delete_folders};
pub use progress::{CategorizeOutcome, MoveRecord, MutationOutcome, MutationProgress};
pub use trash_op::start_move_to_trash;
pub use undo::{MemoryUndoStore, MoveBatch, UndoRecord, UndoStore, undo_moves};

/// Default channel buffer size for operation progress updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
