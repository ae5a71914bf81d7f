//! Messages accepted by the session task.

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::oneshot;

use super::SchedulerState;
use crate::engine::{Component, ExecutionPhase, RunOutcome};
use crate::error::Result;
use crate::graph::Graph;
use crate::log::EventLog;
use crate::playback::Frame;
use crate::session::Progress;

type Reply<T> = oneshot::Sender<Result<T>>;

/// Owned result of a manual step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved(Progress),
    NoMoreSteps,
    AtStart,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: SchedulerState,
    pub phase: ExecutionPhase,
    pub complete: bool,
    pub progress: Progress,
    pub components: Vec<Component>,
    pub resume_point: Option<usize>,
    /// Why the last auto-play run ended early, if it did.
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub(crate) enum Command {
    Start {
        delay_ms: i64,
        reply: Reply<Progress>,
    },
    Stop {
        reply: oneshot::Sender<Option<usize>>,
    },
    StartOrResume {
        reply: Reply<RunOutcome>,
    },
    RunPhase {
        reply: Reply<ExecutionPhase>,
    },
    StepForward {
        reply: Reply<Navigation>,
    },
    StepBackward {
        reply: Reply<Navigation>,
    },
    Seek {
        index: usize,
        reply: Reply<Progress>,
    },
    Reset {
        reply: Reply<()>,
    },
    SetGraph {
        graph: Graph,
        reply: Reply<()>,
    },
    Generate {
        vertex_count: usize,
        reply: Reply<()>,
    },
    Load {
        path: PathBuf,
        reply: Reply<()>,
    },
    Save {
        path: PathBuf,
        reply: Reply<()>,
    },
    Graph {
        reply: oneshot::Sender<Graph>,
    },
    Events {
        reply: oneshot::Sender<EventLog>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Frame {
        step: Option<usize>,
        reply: Reply<Frame>,
    },
    /// Sent by the ticker of auto-play run `run`.
    Tick {
        run: u64,
    },
}
