//! History engine that drives commands through the undo and redo stacks.

use super::error::{CommandOperation, HistoryError};
use super::latch::BusyLatch;
use super::stacks::{Entry, Stacks};
use super::window::CoalescenceWindow;
use crate::builder::HistoryBuilder;
use crate::config::HistoryConfig;
use crate::core::{
    ApplyOutcome, BoxError, Cleanup, Coalescence, Command, HistoryEvent, HistoryEventKind,
};
use crate::observe::HistoryObserver;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// What `execute` did with the new command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Executed {
    /// Applied and pushed onto the undo stack
    Added,
    /// Absorbed by the top of the undo stack without being applied
    Coalesced,
    /// Cancelled out the top of the undo stack; both left history
    Dropped,
    /// Applied, and both stacks were wiped
    Cleared,
    /// Applied, but nothing changed
    Noop,
}

impl Executed {
    fn event_kind(self) -> HistoryEventKind {
        match self {
            Self::Added => HistoryEventKind::Added,
            Self::Coalesced => HistoryEventKind::Coalesced,
            Self::Dropped => HistoryEventKind::Dropped,
            Self::Cleared => HistoryEventKind::Cleared,
            Self::Noop => HistoryEventKind::Noop,
        }
    }
}

/// Undo/redo engine.
///
/// All operations take `&self`; share the engine with `Arc<History>`. At
/// most one `execute`, `undo` or `redo` runs at a time: a second call while
/// one is in flight fails with [`HistoryError::Busy`] instead of waiting.
///
/// # Example
///
/// ```rust
/// use rewind::core::{ApplyOutcome, BoxError, Command};
/// use rewind::{async_trait, History};
/// use std::sync::{Arc, Mutex};
///
/// struct Append {
///     text: Arc<Mutex<String>>,
///     suffix: &'static str,
/// }
///
/// #[async_trait]
/// impl Command for Append {
///     fn description(&self) -> String {
///         format!("Append '{}'", self.suffix)
///     }
///
///     async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
///         self.text.lock().unwrap().push_str(self.suffix);
///         Ok(ApplyOutcome::Add)
///     }
///
///     async fn revert(&mut self) -> Result<(), BoxError> {
///         let mut text = self.text.lock().unwrap();
///         let keep = text.len() - self.suffix.len();
///         text.truncate(keep);
///         Ok(())
///     }
///
///     async fn reapply(&mut self) -> Result<(), BoxError> {
///         self.apply().await.map(|_| ())
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let text = Arc::new(Mutex::new(String::new()));
/// let history = History::builder().quiet().build();
///
/// let target = Arc::clone(&text);
/// history.execute(move || Append { text: target, suffix: "hello" }).await.unwrap();
/// assert_eq!(*text.lock().unwrap(), "hello");
///
/// history.undo().await.unwrap();
/// assert_eq!(*text.lock().unwrap(), "");
/// assert_eq!(history.redo_description().as_deref(), Some("Append 'hello'"));
///
/// history.redo().await.unwrap();
/// assert_eq!(*text.lock().unwrap(), "hello");
/// # });
/// ```
pub struct History {
    stacks: Mutex<Stacks>,
    latch: BusyLatch,
    cleanup: Cleanup,
    observers: Vec<Arc<dyn HistoryObserver>>,
    config: HistoryConfig,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stacks = self.stacks();
        f.debug_struct("History")
            .field("undo_depth", &stacks.undo.len())
            .field("redo_depth", &stacks.redo.len())
            .field("coalescing", &stacks.window.is_open())
            .field("busy", &self.latch.is_held())
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish()
    }
}

impl History {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        HistoryBuilder::new().build()
    }

    /// Create an engine from a configuration, with no cleanup hook.
    pub fn with_config(config: HistoryConfig) -> Self {
        HistoryBuilder::from_config(config).build()
    }

    /// Start building an engine.
    pub fn builder() -> HistoryBuilder {
        HistoryBuilder::new()
    }

    pub(crate) fn from_parts(
        config: HistoryConfig,
        cleanup: Cleanup,
        observers: Vec<Arc<dyn HistoryObserver>>,
    ) -> Self {
        let window = CoalescenceWindow::new(config.coalescence_window());
        Self {
            stacks: Mutex::new(Stacks::new(window)),
            latch: BusyLatch::default(),
            cleanup,
            observers,
            config,
        }
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Construct a command with `factory` and run it through the history.
    ///
    /// The factory is only called once the engine has committed to running
    /// the command, and the command never leaves the engine. If the
    /// coalescence window is open, the top of the undo stack gets the first
    /// chance to absorb the new command; otherwise the command is applied
    /// and its [`ApplyOutcome`] decides what happens to the stacks.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Busy`] if another operation is in flight. The
    ///   factory is not called.
    /// - [`HistoryError::Command`] if `apply` fails. The stacks are left as
    ///   they were.
    pub async fn execute<C, F>(&self, factory: F) -> Result<Executed, HistoryError>
    where
        F: FnOnce() -> C,
        C: Command + 'static,
    {
        let _busy = self.latch.try_acquire("execute")?;
        let mut entry = Entry::new(Box::new(factory()));

        if let Some(executed) = self.offer_to_incumbent(&entry) {
            return Ok(executed);
        }

        let outcome = match entry.command.apply().await {
            Ok(outcome) => outcome,
            Err(source) => {
                return Err(self.command_failed(CommandOperation::Apply, &entry, source));
            }
        };

        let id = entry.id;
        let description = entry.description();
        let executed = {
            let mut stacks = self.stacks();
            match outcome {
                ApplyOutcome::Add => {
                    stacks.undo.push(entry);
                    stacks.redo.clear();
                    stacks.window.arm();
                    Executed::Added
                }
                ApplyOutcome::Clear => {
                    stacks.clear();
                    stacks.window.barrier();
                    Executed::Cleared
                }
                ApplyOutcome::Noop => Executed::Noop,
            }
        };

        self.emit(executed.event_kind(), Some(id), description);
        Ok(executed)
    }

    /// Undo the most recent command.
    ///
    /// Returns the number of levels undone (0 or 1).
    pub async fn undo(&self) -> Result<usize, HistoryError> {
        self.undo_levels(1).await
    }

    /// Undo up to `levels` commands.
    ///
    /// Entries that have become no-ops are discarded on the way without
    /// counting as a level. Coalescence is barriered afterwards, and the
    /// cleanup hook runs once the loop completes. Returns the number of
    /// levels undone.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Busy`] if another operation is in flight.
    /// - [`HistoryError::Command`] if a `revert` fails. The failing entry
    ///   stays on the undo stack; entries undone before it stay undone.
    pub async fn undo_levels(&self, levels: usize) -> Result<usize, HistoryError> {
        let _busy = self.latch.try_acquire("undo")?;

        let mut undone = 0;
        while undone < levels {
            let Some(mut entry) = self.stacks().pop_undoable() else {
                break;
            };

            if let Err(source) = entry.command.revert().await {
                let error = self.command_failed(CommandOperation::Revert, &entry, source);
                let mut stacks = self.stacks();
                stacks.undo.push(entry);
                stacks.window.barrier();
                return Err(error);
            }

            let id = entry.id;
            let description = entry.description();
            self.stacks().redo.push(entry);
            self.emit(HistoryEventKind::Undid, Some(id), description);
            undone += 1;
        }

        self.finish_rewind();
        Ok(undone)
    }

    /// Redo the most recently undone command.
    ///
    /// Returns the number of levels redone (0 or 1).
    pub async fn redo(&self) -> Result<usize, HistoryError> {
        self.redo_levels(1).await
    }

    /// Redo up to `levels` commands.
    ///
    /// Redo entries are replayed as they are, without a no-op check.
    /// Afterwards coalescence is barriered and the cleanup hook runs.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Busy`] if another operation is in flight.
    /// - [`HistoryError::Command`] if a `reapply` fails. The failing entry
    ///   stays on the redo stack; entries redone before it stay redone.
    pub async fn redo_levels(&self, levels: usize) -> Result<usize, HistoryError> {
        let _busy = self.latch.try_acquire("redo")?;

        let mut redone = 0;
        while redone < levels {
            let Some(mut entry) = self.stacks().redo.pop() else {
                break;
            };

            if let Err(source) = entry.command.reapply().await {
                let error = self.command_failed(CommandOperation::Reapply, &entry, source);
                let mut stacks = self.stacks();
                stacks.redo.push(entry);
                stacks.window.barrier();
                return Err(error);
            }

            let id = entry.id;
            let description = entry.description();
            self.stacks().undo.push(entry);
            self.emit(HistoryEventKind::Redid, Some(id), description);
            redone += 1;
        }

        self.finish_rewind();
        Ok(redone)
    }

    /// Discard the top undo entry without reverting it.
    ///
    /// Meant for the rare command whose effect cannot be reversed while the
    /// history beneath it is still valid. A command that regularly needs this
    /// should report [`ApplyOutcome::Clear`] or [`ApplyOutcome::Noop`]
    /// instead. Returns the description of the removed command.
    ///
    /// # Errors
    ///
    /// [`HistoryError::Busy`] if an execute, undo or redo is in flight.
    pub fn pop(&self) -> Result<Option<String>, HistoryError> {
        self.latch.ensure_idle("pop")?;

        let popped = self.stacks().undo.pop();
        Ok(popped.map(|entry| {
            let description = entry.description();
            self.emit(HistoryEventKind::Popped, Some(entry.id), description.clone());
            description
        }))
    }

    /// Empty both stacks without reverting or reapplying anything.
    ///
    /// # Errors
    ///
    /// [`HistoryError::Busy`] if an execute, undo or redo is in flight.
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.latch.ensure_idle("clear")?;

        self.stacks().clear();
        self.emit(HistoryEventKind::Reset, None, "history");
        Ok(())
    }

    /// Stop the next command from coalescing with the current top entry.
    ///
    /// Safe to call at any time, including while an operation is in flight.
    pub fn coalescence_barrier(&self) {
        self.stacks().window.barrier();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of undo entries that are not currently no-ops.
    pub fn undo_count(&self) -> usize {
        self.stacks().undo_count()
    }

    /// Number of redo entries.
    pub fn redo_count(&self) -> usize {
        self.stacks().redo.len()
    }

    /// Description of the top-most undo entry that is not a no-op.
    pub fn undo_description(&self) -> Option<String> {
        self.stacks()
            .undo
            .iter()
            .rev()
            .find(|entry| !entry.is_noop())
            .map(Entry::description)
    }

    /// Description of the top redo entry.
    pub fn redo_description(&self) -> Option<String> {
        self.stacks().redo.last().map(Entry::description)
    }

    /// Descriptions of undoable commands, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        self.stacks().undo_descriptions(limit)
    }

    /// Descriptions of redoable commands, most recent first.
    pub fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        self.stacks().redo_descriptions(limit)
    }

    /// Whether `undo` would revert something.
    pub fn can_undo(&self) -> bool {
        self.undo_count() > 0
    }

    /// Whether `redo` would reapply something.
    pub fn can_redo(&self) -> bool {
        self.redo_count() > 0
    }

    /// Whether an execute, undo or redo is in flight.
    pub fn is_busy(&self) -> bool {
        self.latch.is_held()
    }

    /// Whether the next command may coalesce with the top undo entry.
    pub fn is_coalescing(&self) -> bool {
        self.stacks().window.is_open()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn stacks(&self) -> MutexGuard<'_, Stacks> {
        self.stacks.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            tracing::warn!(target: "rewind::engine", "history lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Let the top undo entry try to absorb `candidate`.
    ///
    /// Returns `None` when the candidate still has to be applied. The
    /// incumbent is taken off the stack while it decides so that no lock is
    /// held during command code.
    fn offer_to_incumbent(&self, candidate: &Entry) -> Option<Executed> {
        let mut incumbent = {
            let mut stacks = self.stacks();
            if !stacks.window.is_open() {
                return None;
            }
            stacks.undo.pop()?
        };

        let verdict = incumbent
            .command
            .as_coalescer()
            .map(|coalescer| coalescer.coalesce(&*candidate.command));

        let id = incumbent.id;
        let description = incumbent.description();
        match verdict {
            None | Some(Coalescence::Immiscible) => {
                self.stacks().undo.push(incumbent);
                None
            }
            Some(Coalescence::Coalesced) => {
                {
                    let mut stacks = self.stacks();
                    stacks.undo.push(incumbent);
                    stacks.window.arm();
                }
                self.emit(HistoryEventKind::Coalesced, Some(id), description);
                Some(Executed::Coalesced)
            }
            Some(Coalescence::Undone) => {
                // The window is left as it was: the entry beneath stays a
                // candidate until the window passes or is barriered.
                drop(incumbent);
                self.emit(HistoryEventKind::Dropped, Some(id), description);
                Some(Executed::Dropped)
            }
        }
    }

    fn finish_rewind(&self) {
        self.stacks().window.barrier();
        self.cleanup.run();
    }

    fn command_failed(
        &self,
        operation: CommandOperation,
        entry: &Entry,
        source: BoxError,
    ) -> HistoryError {
        let description = entry.description();
        tracing::warn!(
            target: "rewind::engine",
            command_id = %entry.id,
            %operation,
            description = %description,
            error = %source,
            "command operation failed"
        );
        HistoryError::Command {
            operation,
            description,
            source,
        }
    }

    fn emit(
        &self,
        kind: HistoryEventKind,
        command_id: Option<Uuid>,
        description: impl Into<String>,
    ) {
        if self.observers.is_empty() {
            return;
        }
        let event = HistoryEvent::new(kind, command_id, description);
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}
