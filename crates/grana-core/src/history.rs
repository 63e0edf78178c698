//! Parameter snapshot history
//!
//! Undo/redo over immutable [`EditParams`] snapshots. Snapshots are copied
//! by value into the stack and never mutated in place once stored.

use crate::models::EditParams;

/// An ordered sequence of parameter snapshots with a current-index pointer.
///
/// Invariants: the snapshot list is never empty (it is seeded with the
/// default state) and `index` always points inside it. Mutation must be
/// serialized by the owner; the session is the single writer.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    snapshots: Vec<EditParams>,
    index: usize,
}

impl HistoryStack {
    /// Create a history seeded with the given initial state.
    pub fn new(initial: EditParams) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
        }
    }

    /// Record a snapshot.
    ///
    /// A snapshot equal to the last stored one is dropped (de-dup). If the
    /// pointer sits behind the tail, the redo branch is discarded first:
    /// undoing and then editing invalidates everything after the pointer.
    pub fn commit(&mut self, params: EditParams) {
        if self.index != self.snapshots.len() - 1 {
            self.snapshots.truncate(self.index + 1);
        }

        if self.snapshots.last() == Some(&params) {
            return;
        }

        self.snapshots.push(params);
        self.index = self.snapshots.len() - 1;
    }

    /// Step the pointer back one snapshot. No-op at the oldest snapshot.
    pub fn undo(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    /// Step the pointer forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) {
        if self.index < self.snapshots.len() - 1 {
            self.index += 1;
        }
    }

    /// The snapshot under the pointer.
    pub fn current(&self) -> &EditParams {
        &self.snapshots[self.index]
    }

    /// Whether undo would do anything.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether redo would do anything.
    pub fn can_redo(&self) -> bool {
        self.index < self.snapshots.len() - 1
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: the stack is seeded at construction and never drained.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(EditParams::default())
    }
}
