//! Builder for constructing history engines.

use crate::config::HistoryConfig;
use crate::core::Cleanup;
use crate::engine::History;
use crate::observe::{HistoryObserver, TracingObserver};
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing a [`History`] with a fluent API.
///
/// Without an explicit observer, a verbose configuration gets a
/// [`TracingObserver`]; `quiet()` turns event output off entirely.
pub struct HistoryBuilder {
    config: HistoryConfig,
    cleanup: Cleanup,
    observers: Vec<Arc<dyn HistoryObserver>>,
}

impl HistoryBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::from_config(HistoryConfig::default())
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: HistoryConfig) -> Self {
        Self {
            config,
            cleanup: Cleanup::noop(),
            observers: Vec::new(),
        }
    }

    /// Set the coalescence window.
    ///
    /// Precision is whole milliseconds; a window shorter than one
    /// millisecond disables coalescence.
    pub fn coalescence_window(mut self, window: Duration) -> Self {
        self.config.coalescence_window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        self
    }

    /// Set the coalescence window in milliseconds. Zero or negative disables
    /// coalescence.
    pub fn coalescence_window_ms(mut self, window_ms: i64) -> Self {
        self.config.coalescence_window_ms = window_ms;
        self
    }

    /// Never coalesce commands.
    pub fn disable_coalescence(self) -> Self {
        self.coalescence_window_ms(0)
    }

    /// Set the hook run after every undo and redo.
    pub fn cleanup<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.cleanup = Cleanup::new(hook);
        self
    }

    /// Attach an observer. Attaching one makes the engine verbose.
    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: HistoryObserver + 'static,
    {
        self.observers.push(Arc::new(observer));
        self.config.verbose = true;
        self
    }

    /// Detach all observers and stop emitting events.
    pub fn quiet(mut self) -> Self {
        self.observers.clear();
        self.config.verbose = false;
        self
    }

    /// Build the engine.
    pub fn build(self) -> History {
        let Self {
            config,
            cleanup,
            mut observers,
        } = self;

        if config.verbose && observers.is_empty() {
            observers.push(Arc::new(TracingObserver));
        }

        History::from_parts(config, cleanup, observers)
    }
}

impl Default for HistoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HistoryEvent;

    #[test]
    fn default_builder_uses_default_config() {
        let history = HistoryBuilder::new().build();
        assert_eq!(history.config(), &HistoryConfig::default());
    }

    #[test]
    fn window_duration_is_stored_in_millis() {
        let history = HistoryBuilder::new()
            .coalescence_window(Duration::from_millis(1500))
            .quiet()
            .build();
        assert_eq!(history.config().coalescence_window_ms, 1500);
    }

    #[test]
    fn sub_millisecond_window_disables_coalescence() {
        let history = HistoryBuilder::new()
            .coalescence_window(Duration::from_micros(400))
            .build();
        assert_eq!(history.config().coalescence_window(), None);
    }

    #[test]
    fn disable_coalescence_zeroes_window() {
        let history = HistoryBuilder::new().disable_coalescence().build();
        assert_eq!(history.config().coalescence_window_ms, 0);
    }

    #[test]
    fn quiet_turns_verbose_off() {
        let history = HistoryBuilder::new()
            .observer(|_: &HistoryEvent| {})
            .quiet()
            .build();
        assert!(!history.config().verbose);
    }

    #[test]
    fn observer_turns_verbose_on() {
        let config = HistoryConfig::default().with_verbose(false);
        let history = HistoryBuilder::from_config(config)
            .observer(|_: &HistoryEvent| {})
            .build();
        assert!(history.config().verbose);
    }
}
