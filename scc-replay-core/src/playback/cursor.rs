//! Playback cursor.

use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};
use crate::log::{Event, EventLog};

/// Result of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome<'a> {
    /// The cursor moved; this is the event now under it.
    Moved(&'a Event),
    /// Already on the last event (or the log is empty).
    NoMoreSteps,
    /// Already on the first event (or the log is empty).
    AtStart,
}

impl<'a> StepOutcome<'a> {
    /// The event under the cursor after a successful move.
    pub fn event(&self) -> Option<&'a Event> {
        match self {
            StepOutcome::Moved(event) => Some(event),
            _ => None,
        }
    }

    /// Whether the cursor moved.
    pub fn moved(&self) -> bool {
        matches!(self, StepOutcome::Moved(_))
    }
}

/// A read position into an [`EventLog`].
///
/// The cursor stores only an index. Every operation borrows the log it
/// navigates, so it works equally on a finished log and on one that is still
/// growing. Moving the cursor never touches the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackCursor {
    position: usize,
}

impl PlaybackCursor {
    /// A cursor on the first event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance by one event.
    pub fn step_forward<'a>(&mut self, log: &'a EventLog) -> StepOutcome<'a> {
        match log.get(self.position + 1) {
            Some(event) => {
                self.position += 1;
                StepOutcome::Moved(event)
            }
            None => StepOutcome::NoMoreSteps,
        }
    }

    /// Retreat by one event.
    pub fn step_backward<'a>(&mut self, log: &'a EventLog) -> StepOutcome<'a> {
        if self.position == 0 {
            return StepOutcome::AtStart;
        }
        match log.get(self.position - 1) {
            Some(event) => {
                self.position -= 1;
                StepOutcome::Moved(event)
            }
            None => StepOutcome::AtStart,
        }
    }

    /// Jump to `index`. Out-of-range indices leave the cursor where it was.
    pub fn seek<'a>(&mut self, log: &'a EventLog, index: usize) -> Result<&'a Event> {
        let event = log.get(index).ok_or(ReplayError::OutOfRange {
            index,
            len: log.len(),
        })?;
        self.position = index;
        Ok(event)
    }

    /// The event under the cursor, or `None` for an empty log.
    pub fn current<'a>(&self, log: &'a EventLog) -> Option<&'a Event> {
        log.get(self.position)
    }

    /// Whether the cursor is on the last recorded event.
    pub fn at_end(&self, log: &EventLog) -> bool {
        self.position + 1 >= log.len()
    }

    /// Move back to the first event.
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}
