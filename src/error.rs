//! Error types for tola-listdiff.
//!
//! Inputs themselves never fail: empty sequences and duplicate identities are
//! valid. The variants below signal API misuse or a broken internal invariant.

use thiserror::Error;

/// Errors that can occur while diffing two sequences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListDiffError {
    /// Identity mode was requested for elements without a stable address.
    #[error("identity comparison requires shared elements, `{type_name}` has no stable address")]
    IdentityUnsupported {
        /// Element type that was diffed
        type_name: &'static str,
    },

    /// A dual-occurring identity ran out of old positions during matching.
    #[error("position stack exhausted while matching new index {new_index}")]
    StackUnderflow {
        /// New-side position being matched
        new_index: usize,
    },

    /// The classified operations do not account for the sequence lengths.
    #[error(
        "inconsistent diff: {old_count} old + {inserts} inserts - {deletes} deletes != {new_count} new"
    )]
    Conservation {
        /// Length of the old sequence
        old_count: usize,
        /// Length of the new sequence
        new_count: usize,
        /// Number of inserts produced
        inserts: usize,
        /// Number of deletes produced
        deletes: usize,
    },
}

/// Result type alias for diff operations.
pub type ListDiffResult<T> = Result<T, ListDiffError>;

impl ListDiffError {
    /// Create an identity-mode misuse error for element type `T`.
    pub fn identity_unsupported<T: ?Sized>() -> Self {
        Self::IdentityUnsupported {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Whether this error reports a broken internal invariant rather than misuse.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::StackUnderflow { .. } | Self::Conservation { .. })
    }
}
