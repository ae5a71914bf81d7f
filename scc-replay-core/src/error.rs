//! Error Types
//!
//! Every fallible operation in the crate returns [`ReplayError`]. Structural
//! errors are reported to the immediate caller and leave the session exactly
//! as it was; nothing in the crate retries on its own.
//!
//! Navigation boundaries (stepping past either end of the log) are not
//! errors. They are reported through [`StepOutcome`](crate::playback::StepOutcome).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Errors reported by the engine, the playback layer and the scheduler.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A computation was requested on an empty or malformed graph.
    #[error("invalid graph state: {0}")]
    InvalidGraphState(String),

    /// The graph was resized between a suspension and the matching resume.
    #[error(
        "graph changed during execution: run started with {expected_vertices} vertices \
         and {expected_edges} edges, graph now has {found_vertices} vertices and {found_edges} edges"
    )]
    GraphChangedDuringExecution {
        expected_vertices: usize,
        expected_edges: usize,
        found_vertices: usize,
        found_edges: usize,
    },

    /// The graph cannot be replaced while a computation is suspended.
    #[error("computation in progress; reset before replacing the graph")]
    ComputationInProgress,

    /// A cursor seek fell outside `[0, len)`.
    #[error("index {index} is out of range for an event log of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A configuration value the session cannot work with.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A non-positive auto-play delay.
    #[error("delay must be positive, got {0} ms")]
    InvalidDelay(i64),

    /// The command is not accepted while auto-play is running.
    #[error("auto-play is running; stop it first")]
    SchedulerRunning,

    /// The controlling task has shut down.
    #[error("session task is no longer running")]
    SessionClosed,

    /// Loading or saving a persisted graph failed.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Failures while persisting or restoring a graph.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("msgpack encode: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    #[error("msgpack decode: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The payload decoded but does not describe a valid graph.
    #[error("malformed graph: {0}")]
    Malformed(String),
}
