//! Diff results.
//!
//! A [`Changeset`] holds the classified operations between two sequences plus
//! identity lookups for both sides. The coordinate type `C` is either a flat
//! index ([`IndexDiff`]) or a sectioned [`IndexPath`] ([`PathDiff`]).
//!
//! # Coordinate spaces
//!
//! ```text
//! deletes, updates, move.from  -> positions in old
//! inserts, move.to             -> positions in new
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

// =============================================================================
// Coordinates
// =============================================================================

/// Two-level position: an item inside a named section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    /// Outer level, chosen by the caller per side
    pub section: usize,
    /// Position inside the section
    pub item: usize,
}

impl IndexPath {
    /// Create an index path.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.item)
    }
}

/// A matched element whose rank among surviving elements changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move<C> {
    /// Position in the old sequence
    pub from: C,
    /// Position in the new sequence
    pub to: C,
}

impl<C> Move<C> {
    /// Create a move.
    #[inline]
    pub const fn new(from: C, to: C) -> Self {
        Self { from, to }
    }
}

impl<C: fmt::Display> fmt::Display for Move<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Flat move between integer positions.
pub type MoveIndex = Move<usize>;

/// Move between sectioned positions.
pub type MovePath = Move<IndexPath>;

// =============================================================================
// Changeset
// =============================================================================

/// Classified operations that turn an old sequence into a new one.
///
/// Built once by [`diff`](crate::diff) or [`diff_paths`](crate::diff_paths)
/// and never mutated afterwards. Lookup maps store positions, not elements;
/// when an identity occurs several times on one side the map holds its last
/// position.
#[derive(Debug, Clone)]
#[must_use]
pub struct Changeset<K, C = usize> {
    inserts: BTreeSet<C>,
    deletes: BTreeSet<C>,
    updates: BTreeSet<C>,
    /// Partner position in new for every update
    update_targets: BTreeMap<C, C>,
    moves: Vec<Move<C>>,
    old_map: FxHashMap<K, C>,
    new_map: FxHashMap<K, C>,
    old_count: usize,
    new_count: usize,
}

/// Changeset over flat integer positions.
pub type IndexDiff<K> = Changeset<K, usize>;

/// Changeset over sectioned positions.
pub type PathDiff<K> = Changeset<K, IndexPath>;

/// Operation sets collected by the resolver.
#[derive(Debug)]
pub(crate) struct Operations<K, C> {
    pub inserts: BTreeSet<C>,
    pub deletes: BTreeSet<C>,
    pub updates: BTreeSet<C>,
    pub update_targets: BTreeMap<C, C>,
    pub moves: Vec<Move<C>>,
    pub old_map: FxHashMap<K, C>,
    pub new_map: FxHashMap<K, C>,
}

impl<K, C: Ord + Copy> Operations<K, C> {
    /// Record a content change of the pair `from -> to`.
    pub fn record_update(&mut self, from: C, to: C) {
        self.updates.insert(from);
        self.update_targets.insert(from, to);
    }
}

impl<K, C> Default for Operations<K, C> {
    fn default() -> Self {
        Self {
            inserts: BTreeSet::new(),
            deletes: BTreeSet::new(),
            updates: BTreeSet::new(),
            update_targets: BTreeMap::new(),
            moves: Vec::new(),
            old_map: FxHashMap::default(),
            new_map: FxHashMap::default(),
        }
    }
}

impl<K, C> Changeset<K, C>
where
    K: Hash + Eq + Clone,
    C: Ord + Copy,
{
    pub(crate) fn from_operations(ops: Operations<K, C>, old_count: usize, new_count: usize) -> Self {
        Self {
            inserts: ops.inserts,
            deletes: ops.deletes,
            updates: ops.updates,
            update_targets: ops.update_targets,
            moves: ops.moves,
            old_map: ops.old_map,
            new_map: ops.new_map,
            old_count,
            new_count,
        }
    }

    /// Positions in the new sequence that were inserted.
    #[inline]
    pub fn inserts(&self) -> &BTreeSet<C> {
        &self.inserts
    }

    /// Positions in the old sequence that were deleted.
    #[inline]
    pub fn deletes(&self) -> &BTreeSet<C> {
        &self.deletes
    }

    /// Positions in the old sequence whose content changed.
    #[inline]
    pub fn updates(&self) -> &BTreeSet<C> {
        &self.updates
    }

    /// Moves in the order they were discovered (ascending `to`).
    #[inline]
    pub fn moves(&self) -> &[Move<C>] {
        &self.moves
    }

    /// Position of `id` in the old sequence.
    #[inline]
    pub fn old_position(&self, id: &K) -> Option<C> {
        self.old_map.get(id).copied()
    }

    /// Position of `id` in the new sequence.
    #[inline]
    pub fn new_position(&self, id: &K) -> Option<C> {
        self.new_map.get(id).copied()
    }

    /// Length of the old sequence.
    #[inline]
    pub fn old_count(&self) -> usize {
        self.old_count
    }

    /// Length of the new sequence.
    #[inline]
    pub fn new_count(&self) -> usize {
        self.new_count
    }

    /// Whether `old + inserts - deletes == new` holds.
    pub fn is_consistent(&self) -> bool {
        self.old_count + self.inserts.len() == self.new_count + self.deletes.len()
    }

    /// Whether any operation was produced.
    pub fn has_changes(&self) -> bool {
        self.change_count() > 0
    }

    /// Total number of inserts, deletes, updates and moves.
    pub fn change_count(&self) -> usize {
        self.inserts.len() + self.deletes.len() + self.updates.len() + self.moves.len()
    }

    /// Rewrite updates into deletes and inserts.
    ///
    /// Consumers that apply deletes, inserts and moves as one batch cannot
    /// also reload a position that is the source of a move. An updated move
    /// becomes `delete(from) + insert(to)` and leaves the move list; every
    /// other update becomes a delete at its old position plus an insert at
    /// the new position it was matched with.
    /// The returned changeset has no updates.
    pub fn for_batch_updates(&self) -> Self {
        let mut inserts = self.inserts.clone();
        let mut deletes = self.deletes.clone();

        let moves = self
            .moves
            .iter()
            .filter(|mv| !self.updates.contains(&mv.from))
            .copied()
            .collect();

        for (&from, &to) in &self.update_targets {
            deletes.insert(from);
            inserts.insert(to);
        }

        Self {
            inserts,
            deletes,
            updates: BTreeSet::new(),
            update_targets: BTreeMap::new(),
            moves,
            old_map: self.old_map.clone(),
            new_map: self.new_map.clone(),
            old_count: self.old_count,
            new_count: self.new_count,
        }
    }
}

impl<K> IndexDiff<K>
where
    K: Hash + Eq + Clone,
{
    /// Index of `id` in the old sequence.
    #[inline]
    pub fn old_index_for(&self, id: &K) -> Option<usize> {
        self.old_position(id)
    }

    /// Index of `id` in the new sequence.
    #[inline]
    pub fn new_index_for(&self, id: &K) -> Option<usize> {
        self.new_position(id)
    }
}

impl<K> PathDiff<K>
where
    K: Hash + Eq + Clone,
{
    /// Index path of `id` in the old section.
    #[inline]
    pub fn old_index_path_for(&self, id: &K) -> Option<IndexPath> {
        self.old_position(id)
    }

    /// Index path of `id` in the new section.
    #[inline]
    pub fn new_index_path_for(&self, id: &K) -> Option<IndexPath> {
        self.new_position(id)
    }
}

impl<K, C> fmt::Display for Changeset<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Changeset {{ {} inserts, {} deletes, {} updates, {} moves }}",
            self.inserts.len(),
            self.deletes.len(),
            self.updates.len(),
            self.moves.len()
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn changeset(
        old_count: usize,
        new_count: usize,
        build: impl FnOnce(&mut Operations<u32, usize>),
    ) -> IndexDiff<u32> {
        let mut ops = Operations::default();
        build(&mut ops);
        Changeset::from_operations(ops, old_count, new_count)
    }

    #[test]
    fn test_empty_changeset() {
        let cs = changeset(0, 0, |_| {});
        assert!(!cs.has_changes());
        assert_eq!(cs.change_count(), 0);
        assert!(cs.is_consistent());
        assert_eq!(cs.to_string(), "Changeset { 0 inserts, 0 deletes, 0 updates, 0 moves }");
    }

    #[test]
    fn test_lookup_maps() {
        let cs = changeset(2, 2, |ops| {
            ops.old_map.insert(10, 0);
            ops.old_map.insert(20, 1);
            ops.new_map.insert(20, 0);
            ops.new_map.insert(10, 1);
            ops.moves.push(Move::new(1, 0));
        });
        assert_eq!(cs.old_index_for(&10), Some(0));
        assert_eq!(cs.new_index_for(&10), Some(1));
        assert_eq!(cs.new_index_for(&30), None);
        assert_eq!(cs.change_count(), 1);
    }

    #[test]
    fn test_consistency_check() {
        let cs = changeset(3, 3, |ops| {
            ops.inserts.insert(0);
        });
        assert!(!cs.is_consistent());
    }

    #[test]
    fn test_batch_updates_split_updated_moves() {
        // old [1:"a", 2:"b"], new [2:"B", 1:"a"]
        let cs = changeset(2, 2, |ops| {
            ops.record_update(1, 0);
            ops.moves.push(Move::new(1, 0));
            ops.moves.push(Move::new(0, 1));
            ops.old_map.extend([(1, 0), (2, 1)]);
            ops.new_map.extend([(2, 0), (1, 1)]);
        });

        let batch = cs.for_batch_updates();
        assert!(batch.updates().is_empty());
        assert_eq!(batch.deletes().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(batch.inserts().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(batch.moves(), &[Move::new(0, 1)]);
        assert!(batch.is_consistent());

        // Receiver untouched
        assert_eq!(cs.updates().len(), 1);
        assert_eq!(cs.moves().len(), 2);
    }

    #[test]
    fn test_batch_updates_split_plain_updates() {
        // old [1:"a", 2:"b"], new [1:"A", 2:"b"]
        let cs = changeset(2, 2, |ops| {
            ops.record_update(0, 0);
            ops.old_map.extend([(1, 0), (2, 1)]);
            ops.new_map.extend([(1, 0), (2, 1)]);
        });

        let batch = cs.for_batch_updates();
        assert!(batch.updates().is_empty());
        assert!(batch.moves().is_empty());
        assert_eq!(batch.deletes().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(batch.inserts().iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_batch_updates_follow_matched_partner() {
        // old [k:"a"], new [k:"b", k:"b"]: the update pairs old 0 with new 0
        let cs = changeset(1, 2, |ops| {
            ops.record_update(0, 0);
            ops.inserts.insert(1);
            ops.old_map.insert(9, 0);
            ops.new_map.insert(9, 1);
        });

        let batch = cs.for_batch_updates();
        assert_eq!(batch.deletes().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(batch.inserts().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(batch.is_consistent());
    }

    #[test]
    fn test_batch_updates_idempotent() {
        let cs = changeset(3, 3, |ops| {
            ops.inserts.insert(2);
            ops.deletes.insert(0);
            ops.moves.push(Move::new(2, 0));
        });

        let batch = cs.for_batch_updates();
        assert_eq!(batch.inserts(), cs.inserts());
        assert_eq!(batch.deletes(), cs.deletes());
        assert_eq!(batch.moves(), cs.moves());

        let again = batch.for_batch_updates();
        assert_eq!(again.inserts(), batch.inserts());
        assert_eq!(again.moves(), batch.moves());
    }

    #[test]
    fn test_index_path_ordering_and_display() {
        let a = IndexPath::new(0, 5);
        let b = IndexPath::new(1, 0);
        assert!(a < b);
        assert_eq!(a.to_string(), "0.5");
        assert_eq!(Move::new(a, b).to_string(), "0.5 -> 1.0");
        assert_eq!(MoveIndex::new(3, 1).to_string(), "3 -> 1");
    }
}
