//! History engine errors.

use crate::core::BoxError;
use std::fmt;
use thiserror::Error;

/// Which command operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandOperation {
    /// First-time apply during `execute`
    Apply,
    /// Reverse during `undo`
    Revert,
    /// Reapply during `redo`
    Reapply,
}

impl fmt::Display for CommandOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Apply => "apply",
            Self::Revert => "revert",
            Self::Reapply => "reapply",
        })
    }
}

/// Errors returned by history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Another execute, undo or redo is still in flight. Nothing changed.
    #[error("History is busy: cannot {operation} while another operation is in flight")]
    Busy { operation: &'static str },

    /// A command's own operation failed. The failing step left the stacks
    /// as they were.
    #[error("Command '{description}' failed to {operation}: {source}")]
    Command {
        operation: CommandOperation,
        description: String,
        #[source]
        source: BoxError,
    },
}

impl HistoryError {
    /// Whether this is a concurrency violation.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
