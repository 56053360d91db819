//! The command contract driven by the history engine.
//!
//! A command is a unit of undoable work that knows how to apply itself for
//! the first time, revert itself, and reapply itself after a revert. The
//! engine owns every command it constructs; callers only hand it a factory.

use async_trait::async_trait;
use std::any::Any;
use std::fmt;

/// Boxed error returned by command operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of applying a command for the first time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplyOutcome {
    /// The command changed state and belongs on the undo stack.
    Add,

    /// The command changed state in a way that makes earlier history unsafe
    /// to rewind past. Both stacks are wiped.
    Clear,

    /// The command changed nothing. Neither stack is touched.
    Noop,
}

/// Result of offering a new command to the incumbent top of the undo stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coalescence {
    /// The commands cannot merge; the candidate executes on its own.
    Immiscible,

    /// The incumbent absorbed the candidate's effect. The candidate is never
    /// applied.
    Coalesced,

    /// The candidate cancels the incumbent out. Both leave history.
    Undone,
}

/// Object-safe access to [`Any`] for command downcasting.
///
/// Implemented for every `'static` type; command authors never implement it
/// by hand.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability for commands that can absorb the command executed after them.
///
/// Exposed through [`Command::as_coalescer`]. Coalescence is synchronous and
/// may mutate the receiver, including its description and no-op status.
///
/// The candidate is never applied when the answer is
/// [`Coalescence::Coalesced`] or [`Coalescence::Undone`], so the receiver
/// is responsible for bringing state to the combined result itself. After
/// `Coalesced`, reverting the receiver must undo both effects.
pub trait Coalesce {
    /// Try to merge `candidate` into `self`.
    fn coalesce(&mut self, candidate: &dyn Command) -> Coalescence;
}

/// A reversible unit of work.
///
/// `revert` must restore the exact pre-apply state and `reapply` the exact
/// post-apply state. Failures are returned to whoever triggered the engine
/// operation; the engine does not retry.
///
/// # Example
///
/// ```rust
/// use rewind::core::{ApplyOutcome, BoxError, Command};
/// use rewind::async_trait;
/// use std::sync::{Arc, Mutex};
///
/// struct Push {
///     list: Arc<Mutex<Vec<i32>>>,
///     value: i32,
/// }
///
/// #[async_trait]
/// impl Command for Push {
///     fn description(&self) -> String {
///         format!("Push {}", self.value)
///     }
///
///     async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
///         self.list.lock().unwrap().push(self.value);
///         Ok(ApplyOutcome::Add)
///     }
///
///     async fn revert(&mut self) -> Result<(), BoxError> {
///         self.list.lock().unwrap().pop();
///         Ok(())
///     }
///
///     async fn reapply(&mut self) -> Result<(), BoxError> {
///         self.list.lock().unwrap().push(self.value);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Command: AsAny + Send {
    /// Human-readable description. Re-read on every query.
    fn description(&self) -> String;

    /// Whether the command currently has no effect.
    ///
    /// Coalescence can reduce a command to a no-op after it was added, so
    /// the engine asks again every time it needs the answer.
    ///
    /// Default implementation returns `false`.
    fn is_noop(&self) -> bool {
        false
    }

    /// Apply the command for the first time.
    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError>;

    /// Reverse a previous apply or reapply.
    async fn revert(&mut self) -> Result<(), BoxError>;

    /// Reapply after a revert.
    async fn reapply(&mut self) -> Result<(), BoxError>;

    /// The coalescence capability, if this command has one.
    ///
    /// Default implementation returns `None`.
    fn as_coalescer(&mut self) -> Option<&mut dyn Coalesce> {
        None
    }
}

impl dyn Command {
    /// Downcast to a concrete command type.
    pub fn downcast_ref<T: Command>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check the concrete type without borrowing it.
    pub fn is<T: Command>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("description", &self.description())
            .field("is_noop", &self.is_noop())
            .finish()
    }
}
