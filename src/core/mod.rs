//! Core history types.
//!
//! This module contains the vocabulary shared by the engine and by command
//! authors:
//! - The `Command` trait and its optional `Coalesce` capability
//! - Apply and coalescence outcomes
//! - Lifecycle events and the cleanup hook
//!
//! Nothing here touches the stacks; that is the engine's job.

mod cleanup;
mod command;
mod event;

pub use cleanup::Cleanup;
pub use command::{ApplyOutcome, AsAny, BoxError, Coalesce, Coalescence, Command};
pub use event::{HistoryEvent, HistoryEventKind};
