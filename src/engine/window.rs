//! Coalescence window state.
//!
//! The window is a deadline owned by one engine. Arming it replaces any
//! earlier deadline and barriering discards it, so at most one window is
//! ever pending and engines never share one.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WindowState {
    Barriered,
    Eligible { until: Instant },
}

/// Tracks whether the top of the undo stack may absorb the next command.
#[derive(Debug)]
pub(crate) struct CoalescenceWindow {
    length: Option<Duration>,
    state: WindowState,
}

impl CoalescenceWindow {
    /// A barriered window. `None` disables coalescence for good.
    pub(crate) fn new(length: Option<Duration>) -> Self {
        Self {
            length,
            state: WindowState::Barriered,
        }
    }

    /// Open (or restart) the window from now.
    pub(crate) fn arm(&mut self) {
        self.state = match self.length {
            Some(length) => WindowState::Eligible {
                until: Instant::now() + length,
            },
            None => WindowState::Barriered,
        };
    }

    pub(crate) fn barrier(&mut self) {
        self.state = WindowState::Barriered;
    }

    /// Eligible and the deadline has not passed.
    pub(crate) fn is_open(&self) -> bool {
        match self.state {
            WindowState::Eligible { until } => Instant::now() < until,
            WindowState::Barriered => false,
        }
    }
}
