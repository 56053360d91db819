//! A tiny text buffer driven through the history engine.
//!
//! Run with `cargo run --example text_editor`. Set `RUST_LOG` to change the
//! log level.

use rewind::core::{ApplyOutcome, BoxError, Coalesce, Coalescence, Command};
use rewind::{async_trait, ChannelObserver, History, TracingObserver};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Buffer = Arc<Mutex<String>>;

/// Appends text to the end of the buffer.
struct Append {
    buffer: Buffer,
    text: String,
}

#[async_trait]
impl Command for Append {
    fn description(&self) -> String {
        format!("Type '{}'", self.text)
    }

    fn is_noop(&self) -> bool {
        self.text.is_empty()
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        if self.text.is_empty() {
            return Ok(ApplyOutcome::Noop);
        }
        self.reapply().await?;
        Ok(ApplyOutcome::Add)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
        let keep = buffer
            .len()
            .checked_sub(self.text.len())
            .ok_or("buffer is shorter than the typed text")?;
        buffer.truncate(keep);
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
        buffer.push_str(&self.text);
        Ok(())
    }

    fn as_coalescer(&mut self) -> Option<&mut dyn Coalesce> {
        Some(self)
    }
}

impl Coalesce for Append {
    fn coalesce(&mut self, candidate: &dyn Command) -> Coalescence {
        let Some(next) = candidate.downcast_ref::<Append>() else {
            return Coalescence::Immiscible;
        };
        let Ok(mut buffer) = self.buffer.lock() else {
            return Coalescence::Immiscible;
        };
        buffer.push_str(&next.text);
        self.text.push_str(&next.text);
        Coalescence::Coalesced
    }
}

/// Replaces the whole buffer.
struct Replace {
    buffer: Buffer,
    text: String,
    previous: Option<String>,
}

#[async_trait]
impl Command for Replace {
    fn description(&self) -> String {
        format!("Replace with '{}'", self.text)
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
        if *buffer == self.text {
            return Ok(ApplyOutcome::Noop);
        }
        self.previous = Some(std::mem::replace(&mut *buffer, self.text.clone()));
        Ok(ApplyOutcome::Add)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        let previous = self.previous.clone().ok_or("nothing to restore")?;
        *self.buffer.lock().map_err(|e| e.to_string())? = previous;
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        *self.buffer.lock().map_err(|e| e.to_string())? = self.text.clone();
        Ok(())
    }
}

fn append(buffer: &Buffer, text: &str) -> impl FnOnce() -> Append {
    let buffer = Arc::clone(buffer);
    let text = text.to_string();
    move || Append { buffer, text }
}

fn replace(buffer: &Buffer, text: &str) -> impl FnOnce() -> Replace {
    let buffer = Arc::clone(buffer);
    let text = text.to_string();
    move || Replace {
        buffer,
        text,
        previous: None,
    }
}

fn contents(buffer: &Buffer) -> String {
    buffer.lock().map(|b| b.clone()).unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,rewind=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let (channel, mut events) = ChannelObserver::channel();
    let history = History::builder()
        .coalescence_window(Duration::from_millis(200))
        .observer(TracingObserver)
        .observer(channel)
        .cleanup(|| info!("cleanup after rewind"))
        .build();

    let buffer: Buffer = Arc::new(Mutex::new(String::new()));

    info!("typing quickly: keystrokes merge into one step");
    for word in ["Hello", ",", " world"] {
        history.execute(append(&buffer, word)).await?;
    }
    info!(
        buffer = %contents(&buffer),
        undo_levels = history.undo_count(),
        "after typing"
    );

    info!("pausing past the window starts a new step");
    tokio::time::sleep(Duration::from_millis(250)).await;
    history.execute(append(&buffer, "!")).await?;

    history.coalescence_barrier();
    history.execute(replace(&buffer, "Goodbye")).await?;
    info!(undo = ?history.undo_descriptions(10), "undo stack, most recent first");

    let undone = history.undo_levels(2).await?;
    info!(undone, buffer = %contents(&buffer), "after undoing twice");

    let redone = history.redo().await?;
    info!(redone, buffer = %contents(&buffer), redo = ?history.redo_descriptions(10), "after one redo");

    // Replacing with identical text changes nothing and keeps the redo stack.
    history.execute(replace(&buffer, &contents(&buffer))).await?;
    info!(can_redo = history.can_redo(), "after a no-op");

    drop(history);
    while let Some(event) = events.recv().await {
        info!(kind = event.kind.label(), "observed: {}", event);
    }

    Ok(())
}
