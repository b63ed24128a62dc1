//! Prelude module for common imports.
//!
//! ```ignore
//! use tola_listdiff::prelude::*;
//! ```

// Element capability
pub use crate::diffable::Diffable;

// Algorithms
pub use crate::algo::{diff, diff_paths, DiffMode};

// Results
pub use crate::changeset::{
    Changeset, IndexDiff, IndexPath, Move, MoveIndex, MovePath, PathDiff,
};

// Error
pub use crate::error::{ListDiffError, ListDiffResult};
