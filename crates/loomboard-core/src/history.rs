//! Undo/redo history.
//!
//! Exactly one entry per committed local transaction: a single shape sync is
//! one entry, a delete-all of forty shapes is also one entry. Entries hold
//! the before/after value for every key the transaction touched, so undo and
//! redo are plain writes that replicate like any other edit. Remote ops never
//! enter the history.

use crate::shapes::ShapeRecord;

/// Maximum retained history depth; older entries are discarded.
const MAX_HISTORY: usize = 50;

/// One key's before/after within a transaction.
#[derive(Debug, Clone)]
pub struct RecordChange {
    pub key: String,
    pub before: Option<ShapeRecord>,
    pub after: Option<ShapeRecord>,
}

/// Everything a single committed transaction changed.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub changes: Vec<RecordChange>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh local transaction. Any redo tail is invalidated.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.undo.push(entry);
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop()
    }

    /// Park an undone entry on the redo stack.
    pub fn stash_redo(&mut self, entry: HistoryEntry) {
        self.redo.push(entry);
    }

    /// Put a redone entry back on the undo stack without clearing redo.
    pub fn stash_undo(&mut self, entry: HistoryEntry) {
        self.undo.push(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo.len()
    }
}
