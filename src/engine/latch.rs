//! Busy latch enforcing at most one in-flight mutating operation.

use super::error::HistoryError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Test-and-set flag over the whole engine.
#[derive(Debug, Default)]
pub(crate) struct BusyLatch {
    held: AtomicBool,
}

impl BusyLatch {
    /// Take the latch, or fail immediately if someone else holds it.
    ///
    /// The check and the set are one atomic step, so two callers can never
    /// both succeed.
    pub(crate) fn try_acquire(
        &self,
        operation: &'static str,
    ) -> Result<BusyGuard<'_>, HistoryError> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { latch: self })
            .map_err(|_| HistoryError::Busy { operation })
    }

    /// Fail if the latch is held, without taking it.
    pub(crate) fn ensure_idle(&self, operation: &'static str) -> Result<(), HistoryError> {
        if self.is_held() {
            Err(HistoryError::Busy { operation })
        } else {
            Ok(())
        }
    }

    pub(crate) fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases the latch when dropped, whichever way the operation ends.
#[derive(Debug)]
pub(crate) struct BusyGuard<'a> {
    latch: &'a BusyLatch,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.latch.held.store(false, Ordering::Release);
    }
}
