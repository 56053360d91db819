//! Informational lifecycle events emitted by the history engine.
//!
//! Events are plain values: the engine builds one after each state change
//! and hands it to whatever observer is attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What happened to the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEventKind {
    /// A command was applied and pushed onto the undo stack.
    Added,
    /// A command was absorbed by the top of the undo stack.
    Coalesced,
    /// The top of the undo stack was cancelled out by a new command.
    Dropped,
    /// A command was applied and wiped both stacks.
    Cleared,
    /// A command was applied but changed nothing.
    Noop,
    /// A command was reverted and moved onto the redo stack.
    Undid,
    /// A command was reapplied and moved back onto the undo stack.
    Redid,
    /// The top of the undo stack was discarded without reverting it.
    Popped,
    /// Both stacks were emptied by an explicit reset.
    Reset,
}

impl HistoryEventKind {
    /// Short verb phrase for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "added to undo stack",
            Self::Coalesced => "coalesced",
            Self::Dropped => "dropped by coalescence",
            Self::Cleared => "executed and cleared history",
            Self::Noop => "was a no-op",
            Self::Undid => "undone",
            Self::Redid => "redone",
            Self::Popped => "popped without undo",
            Self::Reset => "history reset",
        }
    }
}

impl fmt::Display for HistoryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Record of a single history change.
///
/// # Example
///
/// ```rust
/// use rewind::core::{HistoryEvent, HistoryEventKind};
/// use uuid::Uuid;
///
/// let event = HistoryEvent::new(HistoryEventKind::Added, Some(Uuid::new_v4()), "Insert 'a'");
/// assert_eq!(event.to_string(), "Insert 'a': added to undo stack");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// What happened
    pub kind: HistoryEventKind,
    /// Id of the command involved; `None` for whole-history events
    pub command_id: Option<Uuid>,
    /// Description of the command at the time of the event
    pub description: String,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
}

impl HistoryEvent {
    /// Create an event stamped with the current time.
    pub fn new(
        kind: HistoryEventKind,
        command_id: Option<Uuid>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            command_id,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for HistoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_description_and_label() {
        let event = HistoryEvent::new(HistoryEventKind::Undid, None, "Move node");
        assert_eq!(event.to_string(), "Move node: undone");
    }

    #[test]
    fn event_serializes_correctly() {
        let id = Uuid::new_v4();
        let event = HistoryEvent::new(HistoryEventKind::Coalesced, Some(id), "Insert 'ab'");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"coalesced\""));

        let deserialized: HistoryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn timestamp_is_recent() {
        let before = Utc::now();
        let event = HistoryEvent::new(HistoryEventKind::Noop, None, "Nothing");
        assert!(event.timestamp >= before);
    }
}
