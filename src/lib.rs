//! Rewind: an async undo/redo engine
//!
//! Rewind sequences reversible commands into an undo stack and a redo stack.
//! Commands are handed to the engine as factories, so nothing outside the
//! engine ever holds a live command that it could apply or revert out of
//! turn.
//!
//! # Core Concepts
//!
//! - **Command**: apply, revert and reapply, each async, via the `Command` trait
//! - **Coalescence**: rapid successive commands merge into one undo step
//! - **Exclusivity**: only one execute, undo or redo is in flight at a time
//! - **Events**: lifecycle notifications go to pluggable observers
//!
//! # Example
//!
//! ```rust
//! use rewind::core::{ApplyOutcome, BoxError, Command};
//! use rewind::{async_trait, History};
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! struct Add {
//!     total: Arc<AtomicI64>,
//!     amount: i64,
//! }
//!
//! #[async_trait]
//! impl Command for Add {
//!     fn description(&self) -> String {
//!         format!("Add {}", self.amount)
//!     }
//!
//!     fn is_noop(&self) -> bool {
//!         self.amount == 0
//!     }
//!
//!     async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
//!         self.total.fetch_add(self.amount, Ordering::SeqCst);
//!         Ok(ApplyOutcome::Add)
//!     }
//!
//!     async fn revert(&mut self) -> Result<(), BoxError> {
//!         self.total.fetch_sub(self.amount, Ordering::SeqCst);
//!         Ok(())
//!     }
//!
//!     async fn reapply(&mut self) -> Result<(), BoxError> {
//!         self.total.fetch_add(self.amount, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let total = Arc::new(AtomicI64::new(0));
//! let history = History::builder().quiet().build();
//!
//! for amount in [5, 7] {
//!     let total = Arc::clone(&total);
//!     history.execute(move || Add { total, amount }).await.unwrap();
//! }
//! assert_eq!(total.load(Ordering::SeqCst), 12);
//! assert_eq!(history.undo_count(), 2);
//!
//! history.undo().await.unwrap();
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! assert_eq!(history.redo_description().as_deref(), Some("Add 7"));
//! # });
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod observe;

// Re-export commonly used types
pub use async_trait::async_trait;
pub use builder::HistoryBuilder;
pub use config::HistoryConfig;
pub use core::{ApplyOutcome, BoxError, Coalesce, Coalescence, Command, HistoryEvent};
pub use engine::{Executed, History, HistoryError};
pub use observe::{ChannelObserver, HistoryObserver, TracingObserver};
