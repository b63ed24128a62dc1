//! tola-listdiff - Linear-time Diffing of Ordered Collections
//!
//! ## Core Concepts
//!
//! **Identity vs. content**: every element reports an identity (which logical
//! item it is) and a content equality (whether that item changed). Equal
//! identities across the two snapshots are matched; the rest become inserts
//! and deletes.
//!
//! **Moves by rank**: a matched element is only reported as moved when its
//! rank among surviving elements changed, not when surrounding inserts and
//! deletes merely shift it.
//!
//! ## Modules
//! - `diffable`: the `Diffable` element capability and built-in impls
//! - `algo`: indexing, matching and resolving phases, entry points
//! - `changeset`: result types and the batch-update transform
//! - `error`: error types
//!
//! ## Usage
//!
//! ```
//! use tola_listdiff::{diff, DiffMode, MoveIndex};
//!
//! let old = ["a", "b", "c"];
//! let new = ["c", "a", "b"];
//!
//! let result = diff(&old, &new, DiffMode::Equality).unwrap();
//! assert!(result.inserts().is_empty());
//! assert_eq!(result.moves()[0], MoveIndex::new(2, 0));
//! assert_eq!(result.new_index_for(&"c".to_string()), Some(0));
//!
//! // Batch consumers get deletes + inserts instead of updates
//! let batch = result.for_batch_updates();
//! assert!(batch.updates().is_empty());
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Element capability trait and built-in impls
pub mod diffable;

/// Algorithms: index, match, resolve
pub mod algo;

/// Diff results
pub mod changeset;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

pub use diffable::Diffable;

pub use algo::{diff, diff_paths, DiffMode};

pub use changeset::{Changeset, IndexDiff, IndexPath, Move, MoveIndex, MovePath, PathDiff};

pub use error::{ListDiffError, ListDiffResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(IndexDiff<u64>: Send, Sync, Clone);
    assert_impl_all!(PathDiff<String>: Send, Sync, Clone);
    assert_impl_all!(ListDiffError: Send, Sync, std::error::Error);

    /// Element with a small identity space so duplicates are common.
    #[derive(Debug, Clone, PartialEq)]
    struct Cell {
        key: u8,
        value: u8,
    }

    impl Diffable for Cell {
        type Id = u8;

        fn diff_identifier(&self) -> u8 {
            self.key
        }

        fn is_equal_to_diffable(&self, other: &Self) -> bool {
            self.value == other.value
        }
    }

    fn cells() -> impl Strategy<Value = Vec<Cell>> {
        prop::collection::vec((0u8..6, 0u8..3).prop_map(|(key, value)| Cell { key, value }), 0..24)
    }

    proptest! {
        #[test]
        fn prop_conservation(old in cells(), new in cells()) {
            let result = diff(&old, &new, DiffMode::Equality).unwrap();
            prop_assert!(result.is_consistent());
            prop_assert_eq!(old.len() + result.inserts().len(), new.len() + result.deletes().len());
        }

        #[test]
        fn prop_positions_in_bounds_and_disjoint(old in cells(), new in cells()) {
            let result = diff(&old, &new, DiffMode::Equality).unwrap();
            prop_assert!(result.inserts().iter().all(|&i| i < new.len()));
            prop_assert!(result.deletes().iter().all(|&i| i < old.len()));
            prop_assert!(result.updates().is_disjoint(result.deletes()));

            let from: BTreeSet<usize> = result.moves().iter().map(|m| m.from).collect();
            let to: BTreeSet<usize> = result.moves().iter().map(|m| m.to).collect();
            prop_assert_eq!(from.len(), result.moves().len());
            prop_assert!(from.is_disjoint(result.deletes()));
            prop_assert!(to.is_disjoint(result.inserts()));
        }

        #[test]
        fn prop_identical_copy_has_no_changes(old in cells()) {
            let copy = old.clone();
            let result = diff(&old, &copy, DiffMode::Equality).unwrap();
            prop_assert!(!result.has_changes());
        }

        #[test]
        fn prop_lookup_round_trip(old in cells(), new in cells()) {
            let result = diff(&old, &new, DiffMode::Equality).unwrap();
            for (i, cell) in new.iter().enumerate() {
                let at = result.new_index_for(&cell.key).unwrap();
                prop_assert_eq!(new[at].key, cell.key);
                prop_assert!(at >= i);
            }
            for cell in &old {
                let at = result.old_index_for(&cell.key).unwrap();
                prop_assert_eq!(old[at].key, cell.key);
            }
        }

        #[test]
        fn prop_batch_updates_are_safe(old in cells(), new in cells()) {
            let result = diff(&old, &new, DiffMode::Equality).unwrap();
            let batch = result.for_batch_updates();
            prop_assert!(batch.updates().is_empty());
            prop_assert!(batch.is_consistent());

            let again = batch.for_batch_updates();
            prop_assert_eq!(again.inserts(), batch.inserts());
            prop_assert_eq!(again.deletes(), batch.deletes());
            prop_assert_eq!(again.moves(), batch.moves());
        }

        #[test]
        fn prop_unique_reorder_only_moves(
            keys in prop::collection::btree_set(any::<u16>(), 0..32),
            seed in any::<u64>(),
        ) {
            let old: Vec<u16> = keys.into_iter().collect();
            let mut new = old.clone();
            for i in (1..new.len()).rev() {
                let j = (seed.wrapping_mul(i as u64 + 1) >> 7) as usize % (i + 1);
                new.swap(i, j);
            }

            let result = diff(&old, &new, DiffMode::Equality).unwrap();
            prop_assert!(result.inserts().is_empty());
            prop_assert!(result.deletes().is_empty());
            prop_assert!(result.updates().is_empty());
            prop_assert_eq!(result.moves().is_empty(), old == new);
        }

        #[test]
        fn prop_batch_updates_with_duplicates_stay_consistent(old in cells(), new in cells()) {
            let batch = diff(&old, &new, DiffMode::Equality).unwrap().for_batch_updates();
            prop_assert_eq!(old.len() + batch.inserts().len(), new.len() + batch.deletes().len());
            prop_assert!(batch.inserts().iter().all(|&i| i < new.len()));
            prop_assert!(batch.deletes().iter().all(|&i| i < old.len()));
        }
    }

    #[tokio::test]
    async fn test_concurrent_invocations() {
        let handles: Vec<_> = (0..8u32)
            .map(|n| {
                tokio::spawn(async move {
                    let old: Vec<u32> = (0..64).collect();
                    let new: Vec<u32> = (n..64 + n).rev().collect();
                    diff(&old, &new, DiffMode::Equality).map(|r| (n, r.inserts().len(), r.deletes().len()))
                })
            })
            .collect();

        for handle in handles {
            let (n, inserts, deletes) = handle.await.unwrap().unwrap();
            assert_eq!(inserts, n as usize);
            assert_eq!(deletes, n as usize);
        }
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let result: IndexDiff<u8> = diff(&[1u8, 2], &[2u8], DiffMode::default()).unwrap();
        assert_eq!(result.change_count(), 1);
        assert_eq!(result.to_string(), "Changeset { 0 inserts, 1 deletes, 0 updates, 0 moves }");
    }
}
