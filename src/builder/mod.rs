//! Builder API for ergonomic history construction.
//!
//! `HistoryConfig` carries what can be loaded from a file; the builder adds
//! the runtime pieces (cleanup hook, observers) on top of it.

mod history;

pub use history::HistoryBuilder;
