//! Observers for history lifecycle events.
//!
//! The engine never prints anything itself. It hands every
//! [`HistoryEvent`] to the observers attached at construction time:
//!
//! - [`TracingObserver`] writes structured `tracing` records
//! - any `Fn(&HistoryEvent)` closure
//! - [`ChannelObserver`] forwards events into a tokio channel

mod log;

pub use log::TracingObserver;

use crate::core::HistoryEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Sink for informational history events.
///
/// Observers are called synchronously after the engine has finished the
/// state change being reported, never while internal locks are held.
pub trait HistoryObserver: Send + Sync {
    /// Receive one event.
    fn on_event(&self, event: &HistoryEvent);
}

impl<F> HistoryObserver for F
where
    F: Fn(&HistoryEvent) + Send + Sync,
{
    fn on_event(&self, event: &HistoryEvent) {
        self(event)
    }
}

/// Observer that forwards events into an unbounded tokio channel.
///
/// Events sent after the receiver is dropped are discarded.
///
/// # Example
///
/// ```rust
/// use rewind::core::{HistoryEvent, HistoryEventKind};
/// use rewind::observe::{ChannelObserver, HistoryObserver};
///
/// let (observer, mut events) = ChannelObserver::channel();
/// observer.on_event(&HistoryEvent::new(HistoryEventKind::Reset, None, "history"));
///
/// let received = events.try_recv().unwrap();
/// assert_eq!(received.kind, HistoryEventKind::Reset);
/// ```
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    sender: UnboundedSender<HistoryEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiver its events arrive on.
    pub fn channel() -> (Self, UnboundedReceiver<HistoryEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Wrap an existing sender.
    pub fn from_sender(sender: UnboundedSender<HistoryEvent>) -> Self {
        Self { sender }
    }
}

impl HistoryObserver for ChannelObserver {
    fn on_event(&self, event: &HistoryEvent) {
        // A closed receiver means nobody is listening any more.
        let _ = self.sender.send(event.clone());
    }
}
