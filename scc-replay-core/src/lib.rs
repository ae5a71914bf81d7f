//! SCC Replay Core
//!
//! This crate provides a resumable strongly-connected-components engine with
//! a replayable event log. It implements:
//!
//! - Kosaraju's algorithm, split into three resumable phases
//! - An append-only log of every step the algorithm takes
//! - A playback cursor and state reconstruction for any step
//! - A throttled, cancellable auto-play scheduler on tokio
//!
//! Rendering is left to the caller: everything the crate exposes is
//! structured data (events, frames, progress), never pre-formatted text.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Adjacency-list graph, generator and persistence
//! - `log`: Event types and the append-only event log
//! - `engine`: The phased Kosaraju engine
//! - `playback`: Cursor navigation and frame reconstruction
//! - `session`: The context object owning graph, engine and cursor
//! - `scheduler`: The session task, auto-play ticker and handle
//!
//! # Example
//!
//! ```rust,ignore
//! use scc_replay_core::prelude::*;
//!
//! let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 0), (1, 3)])?;
//! let (handle, _task) = scheduler::spawn(Session::with_graph(SessionConfig::default(), graph)?);
//!
//! handle.subscribe(|p| println!("{}/{} {:?}", p.cursor + 1, p.total, p.description()));
//! handle.start(250).await?;
//! handle.wait_until_settled().await?;
//!
//! let snapshot = handle.snapshot().await?;
//! println!("components: {:?}", snapshot.components);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod log;
pub mod playback;
pub mod scheduler;
pub mod session;

pub use error::{ReplayError, Result, SerializationError};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::engine::{Component, ExecutionPhase, RunOutcome, SccEngine, SuspendHandle};
    pub use crate::error::{ReplayError, Result};
    pub use crate::graph::{Graph, GraphGenerator, VertexId};
    pub use crate::log::{Event, EventLog, Pass};
    pub use crate::playback::{Frame, PlaybackCursor, StepOutcome};
    pub use crate::scheduler::{self, Navigation, SchedulerState, SessionHandle, Snapshot};
    pub use crate::session::{Progress, Session};
}
