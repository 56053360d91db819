//! Undo and redo stacks.
//!
//! Both stacks keep the most recent entry at the end. The undo stack only
//! holds applied commands and the redo stack only holds reverted ones; the
//! engine maintains that by moving entries between them after each
//! successful revert or reapply.

use super::window::CoalescenceWindow;
use crate::core::Command;
use uuid::Uuid;

/// A command owned by the history, tagged with a stable id for events.
pub(crate) struct Entry {
    pub(crate) id: Uuid,
    pub(crate) command: Box<dyn Command>,
}

impl Entry {
    pub(crate) fn new(command: Box<dyn Command>) -> Self {
        Self {
            id: Uuid::new_v4(),
            command,
        }
    }

    pub(crate) fn description(&self) -> String {
        self.command.description()
    }

    pub(crate) fn is_noop(&self) -> bool {
        self.command.is_noop()
    }
}

/// Everything the engine mutates, kept behind one lock.
pub(crate) struct Stacks {
    pub(crate) undo: Vec<Entry>,
    pub(crate) redo: Vec<Entry>,
    pub(crate) window: CoalescenceWindow,
}

impl Stacks {
    pub(crate) fn new(window: CoalescenceWindow) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            window,
        }
    }

    /// Pop undo entries until one is not a no-op.
    ///
    /// Skipped no-ops are dropped; they never reach the redo stack.
    pub(crate) fn pop_undoable(&mut self) -> Option<Entry> {
        while let Some(entry) = self.undo.pop() {
            if entry.is_noop() {
                tracing::debug!(
                    target: "rewind::engine",
                    command_id = %entry.id,
                    "discarding no-op entry during undo"
                );
                continue;
            }
            return Some(entry);
        }
        None
    }

    /// Wipe both stacks.
    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn undo_count(&self) -> usize {
        self.undo.iter().filter(|entry| !entry.is_noop()).count()
    }

    pub(crate) fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        self.undo
            .iter()
            .rev()
            .filter(|entry| !entry.is_noop())
            .take(limit)
            .map(Entry::description)
            .collect()
    }

    pub(crate) fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        self.redo
            .iter()
            .rev()
            .take(limit)
            .map(Entry::description)
            .collect()
    }
}
