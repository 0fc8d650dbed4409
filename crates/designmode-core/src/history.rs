//! Scene-scoped undo log of container property snapshots.
//!
//! One entry per discrete edit, pushed before the mutation is applied.
//! Restoration is positional: an entry addresses its container by layer and
//! sibling index, not by identity, so the stack must be cleared whenever the
//! scene is rebuilt.

use crate::store::LayoutRecord;

/// Maximum number of undo entries to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Which child list of the scene a container lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// The window layer.
    Windows,
    /// Direct scene children (pictures and other sprites).
    Root,
}

/// Positional address of a container within the active scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub layer: LayerKind,
    pub index: usize,
}

/// One undo entry: where to restore, and what.
#[derive(Debug, Clone)]
pub struct ChangeEntry {
    pub slot: SlotRef,
    pub snapshot: LayoutRecord,
}

/// LIFO undo log for the active scene.
#[derive(Debug, Default)]
pub struct ChangeStack {
    entries: Vec<ChangeEntry>,
}

impl ChangeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; the oldest entry falls off past the history limit.
    pub fn push(&mut self, slot: SlotRef, snapshot: LayoutRecord) {
        self.entries.push(ChangeEntry { slot, snapshot });
        if self.entries.len() > MAX_UNDO_HISTORY {
            self.entries.remove(0);
        }
    }

    pub fn pop(&mut self) -> Option<ChangeEntry> {
        self.entries.pop()
    }

    /// Drop every entry; called on scene transitions.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
