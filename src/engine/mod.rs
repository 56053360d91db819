//! The history engine.
//!
//! This module is the imperative shell around the command vocabulary in
//! [`crate::core`]: it owns the undo and redo stacks, runs commands, decides
//! coalescence and enforces that only one mutating operation is in flight.
//!
//! # Key Concepts
//!
//! - **Stacks**: most recent entry last; a new command wipes the redo stack
//! - **Coalescence window**: after a command is added, the next command may
//!   merge into it until the window passes quietly or a barrier is raised
//! - **Busy latch**: `execute`, `undo` and `redo` reject instead of queueing
//!   while another one is in flight

mod error;
mod history;
mod latch;
mod stacks;
mod window;

pub use error::{CommandOperation, HistoryError};
pub use history::{Executed, History};
