//! `tracing` output for history events.

use super::HistoryObserver;
use crate::core::HistoryEvent;

/// Observer that logs every event at `INFO` under the `rewind::history`
/// target.
///
/// This is what the builder attaches when the configuration is verbose and
/// no other observer was supplied.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl HistoryObserver for TracingObserver {
    fn on_event(&self, event: &HistoryEvent) {
        match event.command_id {
            Some(command_id) => tracing::info!(
                target: "rewind::history",
                kind = ?event.kind,
                command_id = %command_id,
                description = %event.description,
                "{}",
                event.kind
            ),
            None => tracing::info!(
                target: "rewind::history",
                kind = ?event.kind,
                description = %event.description,
                "{}",
                event.kind
            ),
        }
    }
}
