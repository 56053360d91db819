//! Engine configuration.
//!
//! `HistoryConfig` holds the serialisable options. Runtime-only options
//! (cleanup hook, observers) go through [`crate::builder::HistoryBuilder`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default inactivity needed to end coalescence eligibility.
pub const DEFAULT_COALESCENCE_WINDOW_MS: i64 = 3000;

/// Serialisable history engine options.
///
/// Every field has a default, so partial documents load fine.
///
/// # Example
///
/// ```rust
/// use rewind::config::HistoryConfig;
/// use std::time::Duration;
///
/// let config = HistoryConfig::default();
/// assert_eq!(config.coalescence_window(), Some(Duration::from_millis(3000)));
/// assert!(config.verbose);
///
/// let disabled = HistoryConfig::default().with_coalescence_window_ms(0);
/// assert_eq!(disabled.coalescence_window(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Milliseconds of inactivity that end coalescence eligibility.
    /// Zero or negative disables coalescence entirely.
    pub coalescence_window_ms: i64,

    /// Whether lifecycle events are logged when no observer is supplied
    pub verbose: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            coalescence_window_ms: DEFAULT_COALESCENCE_WINDOW_MS,
            verbose: true,
        }
    }
}

impl HistoryConfig {
    /// Set the coalescence window in milliseconds.
    pub fn with_coalescence_window_ms(mut self, window_ms: i64) -> Self {
        self.coalescence_window_ms = window_ms;
        self
    }

    /// Set whether events are logged by default.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The coalescence window, or `None` when coalescence is disabled.
    pub fn coalescence_window(&self) -> Option<Duration> {
        u64::try_from(self.coalescence_window_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
