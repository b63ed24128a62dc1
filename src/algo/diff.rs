//! List Diff Entry Points
//!
//! Computes inserts, deletes, updates and moves between two ordered
//! sequences in linear time.
//!
//! # Algorithm
//!
//! 1. Index: one entry per identity, one record per element
//!    (new forward, old in reverse)
//! 2. Match: pair occurrences through each identity's position stack,
//!    flag content changes under the chosen [`DiffMode`]
//! 3. Resolve: running delete/insert offsets separate real moves from
//!    shifts caused by surrounding edits
//!
//! # Complexity
//!
//! - Time: O(n + m)
//! - Space: O(n + m)
//!
//! # Example
//!
//! ```
//! use tola_listdiff::{diff, DiffMode};
//!
//! let result = diff(&["a", "b", "c"], &["a", "c", "d"], DiffMode::Equality).unwrap();
//! assert_eq!(result.deletes().iter().copied().collect::<Vec<_>>(), vec![1]);
//! assert_eq!(result.inserts().iter().copied().collect::<Vec<_>>(), vec![2]);
//! assert!(result.moves().is_empty());
//! ```

use crate::changeset::{Changeset, IndexDiff, Operations, PathDiff};
use crate::diffable::Diffable;
use crate::error::{ListDiffError, ListDiffResult};

use super::matcher::match_records;
use super::resolve::{Coordinates, Flat, Sections, resolve};
use super::table::build;

// =============================================================================
// DiffMode
// =============================================================================

/// How paired occurrences are compared for content changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiffMode {
    /// Compare with [`Diffable::is_equal_to_diffable`].
    ///
    /// Pairs that are the same shared instance skip the comparison.
    #[default]
    Equality,
    /// Compare instance addresses; any two distinct instances count as updated.
    ///
    /// Only valid for elements that report [`Diffable::instance_addr`],
    /// such as `&T`, `Rc<T>` and `Arc<T>`.
    Identity,
}

impl DiffMode {
    /// Name used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equality => "equality",
            Self::Identity => "identity",
        }
    }
}

/// Reject identity mode for elements without an instance address.
pub(crate) fn check_mode<T: Diffable>(old: &[T], new: &[T], mode: DiffMode) -> ListDiffResult<()> {
    if mode == DiffMode::Identity
        && old.iter().chain(new).any(|item| item.instance_addr().is_none())
    {
        return Err(ListDiffError::identity_unsupported::<T>());
    }
    Ok(())
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two sequences into flat index operations.
///
/// Deletes and updates index into `old`, inserts into `new`, moves go from
/// an `old` index to a `new` index.
///
/// # Errors
///
/// [`ListDiffError::IdentityUnsupported`] when `mode` is
/// [`DiffMode::Identity`] and an element has no instance address.
pub fn diff<T: Diffable>(old: &[T], new: &[T], mode: DiffMode) -> ListDiffResult<IndexDiff<T::Id>> {
    run(old, new, mode, &Flat)
}

/// Diff two sequences that live in sections of a larger collection.
///
/// Old positions are reported in `from_section` and new positions in
/// `to_section`; the two sections may differ.
///
/// # Errors
///
/// Same as [`diff`].
///
/// # Example
///
/// ```
/// use tola_listdiff::{diff_paths, DiffMode, IndexPath};
///
/// let result = diff_paths(0, 1, &[1, 2], &[2, 3], DiffMode::Equality).unwrap();
/// assert!(result.deletes().contains(&IndexPath::new(0, 0)));
/// assert!(result.inserts().contains(&IndexPath::new(1, 1)));
/// ```
pub fn diff_paths<T: Diffable>(
    from_section: usize,
    to_section: usize,
    old: &[T],
    new: &[T],
    mode: DiffMode,
) -> ListDiffResult<PathDiff<T::Id>> {
    let coords = Sections {
        from: from_section,
        to: to_section,
    };
    run(old, new, mode, &coords)
}

// =============================================================================
// Internal
// =============================================================================

fn run<T, C>(old: &[T], new: &[T], mode: DiffMode, coords: &C) -> ListDiffResult<Changeset<T::Id, C::Pos>>
where
    T: Diffable,
    C: Coordinates,
{
    check_mode(old, new, mode)?;

    let result = if old.is_empty() || new.is_empty() {
        tracing::trace!(old = old.len(), new = new.len(), "one side empty, skipping match");
        one_sided(old, new, coords)
    } else {
        let mut table = build(old, new);
        match_records(&mut table, old, new, mode)?;
        resolve(&table, coords)?
    };

    tracing::debug!(
        old = old.len(),
        new = new.len(),
        mode = mode.as_str(),
        inserts = result.inserts().len(),
        deletes = result.deletes().len(),
        updates = result.updates().len(),
        moves = result.moves().len(),
        "list diff"
    );

    Ok(result)
}

/// Every old position deleted and every new position inserted.
///
/// Only used when at least one side is empty, where that is exact.
fn one_sided<T, C>(old: &[T], new: &[T], coords: &C) -> Changeset<T::Id, C::Pos>
where
    T: Diffable,
    C: Coordinates,
{
    let mut ops = Operations::default();
    for (i, item) in old.iter().enumerate() {
        ops.deletes.insert(coords.old_pos(i));
        ops.old_map.insert(item.diff_identifier(), coords.old_pos(i));
    }
    for (i, item) in new.iter().enumerate() {
        ops.inserts.insert(coords.new_pos(i));
        ops.new_map.insert(item.diff_identifier(), coords.new_pos(i));
    }
    Changeset::from_operations(ops, old.len(), new.len())
}

// =============================================================================
// Tests
// =============================================================================
