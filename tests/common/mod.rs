//! Commands over a small shared document, used by the integration tests.

#![allow(dead_code)]

use rewind::core::{ApplyOutcome, BoxError, Coalesce, Coalescence, Command};
use rewind::{async_trait, History};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct Document {
    pub text: String,
    pub title: String,
    pub bold: bool,
    pub published: Vec<String>,
}

pub type SharedDoc = Arc<Mutex<Document>>;

pub fn new_doc() -> SharedDoc {
    Arc::new(Mutex::new(Document::default()))
}

pub fn text(doc: &SharedDoc) -> String {
    doc.lock().unwrap().text.clone()
}

pub fn quiet_history(window_ms: i64) -> History {
    History::builder()
        .coalescence_window_ms(window_ms)
        .quiet()
        .build()
}

/// Inserts text at a byte offset. Absorbs typing and backspacing at its end.
pub struct Type {
    doc: SharedDoc,
    at: usize,
    text: String,
}

impl Type {
    pub fn new(doc: &SharedDoc, at: usize, text: &str) -> Self {
        Self {
            doc: Arc::clone(doc),
            at,
            text: text.to_string(),
        }
    }

    fn end(&self) -> usize {
        self.at + self.text.len()
    }
}

#[async_trait]
impl Command for Type {
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
        let range = self.at..self.end();
        self.doc.lock().unwrap().text.replace_range(range, "");
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        self.doc.lock().unwrap().text.insert_str(self.at, &self.text);
        Ok(())
    }

    fn as_coalescer(&mut self) -> Option<&mut dyn Coalesce> {
        Some(self)
    }
}

impl Coalesce for Type {
    fn coalesce(&mut self, candidate: &dyn Command) -> Coalescence {
        if let Some(next) = candidate.downcast_ref::<Type>() {
            if next.at == self.end() {
                self.doc.lock().unwrap().text.insert_str(next.at, &next.text);
                self.text.push_str(&next.text);
                return Coalescence::Coalesced;
            }
        }
        if let Some(backspace) = candidate.downcast_ref::<Backspace>() {
            if backspace.at == self.end() && !self.text.is_empty() {
                self.text.pop();
                self.doc.lock().unwrap().text.remove(self.end());
                return Coalescence::Coalesced;
            }
        }
        Coalescence::Immiscible
    }
}

/// Deletes the character before a byte offset.
pub struct Backspace {
    doc: SharedDoc,
    at: usize,
    removed: Option<char>,
}

impl Backspace {
    pub fn new(doc: &SharedDoc, at: usize) -> Self {
        Self {
            doc: Arc::clone(doc),
            at,
            removed: None,
        }
    }
}

#[async_trait]
impl Command for Backspace {
    fn description(&self) -> String {
        match self.removed {
            Some(c) => format!("Delete '{}'", c),
            None => "Delete".to_string(),
        }
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        if self.at == 0 {
            return Ok(ApplyOutcome::Noop);
        }
        let removed = self.doc.lock().unwrap().text.remove(self.at - 1);
        self.removed = Some(removed);
        Ok(ApplyOutcome::Add)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        let removed = self.removed.ok_or("nothing was deleted")?;
        self.doc.lock().unwrap().text.insert(self.at - 1, removed);
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        self.doc.lock().unwrap().text.remove(self.at - 1);
        Ok(())
    }
}

/// Sets the document title. Has no coalescence capability.
pub struct Rename {
    doc: SharedDoc,
    title: String,
    previous: String,
}

impl Rename {
    pub fn new(doc: &SharedDoc, title: &str) -> Self {
        Self {
            doc: Arc::clone(doc),
            title: title.to_string(),
            previous: String::new(),
        }
    }
}

#[async_trait]
impl Command for Rename {
    fn description(&self) -> String {
        format!("Rename to '{}'", self.title)
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        let mut doc = self.doc.lock().unwrap();
        if doc.title == self.title {
            return Ok(ApplyOutcome::Noop);
        }
        self.previous = std::mem::replace(&mut doc.title, self.title.clone());
        Ok(ApplyOutcome::Add)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        self.doc.lock().unwrap().title = self.previous.clone();
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        self.doc.lock().unwrap().title = self.title.clone();
        Ok(())
    }
}

/// Flips bold. A second toggle straight after cancels the first.
pub struct ToggleBold {
    doc: SharedDoc,
}

impl ToggleBold {
    pub fn new(doc: &SharedDoc) -> Self {
        Self {
            doc: Arc::clone(doc),
        }
    }

    fn flip(&self) {
        let mut doc = self.doc.lock().unwrap();
        doc.bold = !doc.bold;
    }
}

#[async_trait]
impl Command for ToggleBold {
    fn description(&self) -> String {
        "Toggle bold".to_string()
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        self.flip();
        Ok(ApplyOutcome::Add)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        self.flip();
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        self.flip();
        Ok(())
    }

    fn as_coalescer(&mut self) -> Option<&mut dyn Coalesce> {
        Some(self)
    }
}

impl Coalesce for ToggleBold {
    fn coalesce(&mut self, candidate: &dyn Command) -> Coalescence {
        if candidate.is::<ToggleBold>() {
            self.flip();
            Coalescence::Undone
        } else {
            Coalescence::Immiscible
        }
    }
}

/// Sends the text somewhere it cannot be taken back from.
pub struct Publish {
    doc: SharedDoc,
}

impl Publish {
    pub fn new(doc: &SharedDoc) -> Self {
        Self {
            doc: Arc::clone(doc),
        }
    }
}

#[async_trait]
impl Command for Publish {
    fn description(&self) -> String {
        "Publish".to_string()
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        let mut doc = self.doc.lock().unwrap();
        let snapshot = doc.text.clone();
        doc.published.push(snapshot);
        Ok(ApplyOutcome::Clear)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        Err("published text cannot be withdrawn".into())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        Err("published text cannot be withdrawn".into())
    }
}

/// Suspends in `apply` until its gate is opened.
pub struct Gated {
    gate: Arc<Notify>,
    applies: Arc<AtomicUsize>,
}

impl Gated {
    pub fn new(gate: &Arc<Notify>, applies: &Arc<AtomicUsize>) -> Self {
        Self {
            gate: Arc::clone(gate),
            applies: Arc::clone(applies),
        }
    }
}

#[async_trait]
impl Command for Gated {
    fn description(&self) -> String {
        "Gated".to_string()
    }

    async fn apply(&mut self) -> Result<ApplyOutcome, BoxError> {
        self.gate.notified().await;
        self.applies.fetch_add(1, Ordering::SeqCst);
        Ok(ApplyOutcome::Add)
    }

    async fn revert(&mut self) -> Result<(), BoxError> {
        self.gate.notified().await;
        Ok(())
    }

    async fn reapply(&mut self) -> Result<(), BoxError> {
        self.gate.notified().await;
        Ok(())
    }
}
