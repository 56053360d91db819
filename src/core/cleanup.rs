//! Cleanup hook run after undo and redo.
//!
//! Presentation code usually needs to refresh after history is rewound or
//! replayed, whatever the command was. The hook keeps that refresh in one
//! place instead of repeating it in every command's revert and reapply.

use std::fmt;
use std::sync::Arc;

/// Zero-argument callback invoked once after every completed undo or redo.
///
/// # Example
///
/// ```rust
/// use rewind::core::Cleanup;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let refreshes = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&refreshes);
/// let cleanup = Cleanup::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// cleanup.run();
/// assert_eq!(refreshes.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Cleanup {
    hook: Arc<dyn Fn() + Send + Sync>,
}

impl Cleanup {
    /// Wrap a callback.
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Cleanup {
            hook: Arc::new(hook),
        }
    }

    /// A hook that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Invoke the hook.
    pub fn run(&self) {
        (self.hook)()
    }
}

impl Default for Cleanup {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleanup(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn run_invokes_hook_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cleanup = Cleanup::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cleanup.run();
        cleanup.run();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clones_share_the_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cleanup = Cleanup::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let cloned = cleanup.clone();
        cleanup.run();
        cloned.run();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_is_noop() {
        Cleanup::default().run();
    }
}
