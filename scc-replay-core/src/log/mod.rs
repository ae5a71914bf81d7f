//! Event Log
//!
//! The append-only record of everything the engine did during a run.
//!
//! # Overview
//!
//! The log is the canonical, replayable history of a computation:
//!
//! - Events are appended strictly in algorithmic order.
//! - An appended event is never rewritten or removed. The only way to shrink
//!   the log is to clear it when a fresh run starts.
//! - Readers address events by zero-based index.
//!
//! Only the engine appends. Everyone else gets a shared reference, so the
//! mutating methods are crate-private.

mod event;

pub use event::{Event, Pass};

use serde::Serialize;

/// Ordered, append-only sequence of [`Event`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at `index`.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// The most recently appended event.
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Iterate over events in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// All events as a slice.
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
