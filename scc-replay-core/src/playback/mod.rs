//! Playback
//!
//! Navigation over an already (or partially) produced [`EventLog`].
//!
//! - [`PlaybackCursor`] is a single read position, moved one event at a time
//!   or by seeking.
//! - [`Frame`] reconstructs what the algorithm state looked like at any
//!   position.
//!
//! Nothing in this module calls the engine or mutates the log.
//!
//! [`EventLog`]: crate::log::EventLog

mod cursor;
mod frame;

pub use cursor::{PlaybackCursor, StepOutcome};
pub use frame::{Focus, Frame, VertexStatus};
