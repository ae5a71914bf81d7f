//! Execution Scheduler
//!
//! Runs a [`Session`] on its own tokio task and drives auto-play.
//!
//! # Architecture
//!
//! ```text
//!  SessionHandle ──Command──▶ session task ◀──Tick── ticker task
//!        ▲                      │  (owns Session)
//!        └──── oneshot reply ───┘
//! ```
//!
//! - The **session task** is the only place session state changes. It
//!   processes commands strictly in arrival order.
//! - The **ticker** is spawned for each auto-play run. It sleeps for the
//!   delay, then sends a `Tick`. It computes nothing itself.
//! - A `SessionHandle` is cheap to clone and can be used from any task.
//!
//! # State Machine
//!
//! `Idle → Running → (Idle | Stopped)`.
//!
//! - `start` moves to `Running`. An empty log is filled first; a finished
//!   run whose cursor is on the last event starts over from scratch.
//! - Each tick advances the cursor by one event. If the cursor is on the
//!   last produced event but the engine is suspended between phases, the
//!   next phase runs before advancing.
//! - Reaching the end of a complete log moves to `Idle`.
//! - `stop` moves to `Stopped` and returns the cursor as the resumption
//!   point. Ticks that were already queued belong to the old run and are
//!   dropped, so nothing advances after `stop` returns.
//!
//! While `Running`, commands that move the cursor or replace the graph fail
//! with [`ReplayError::SchedulerRunning`].

mod command;
mod controller;
mod observer;
mod ticker;

pub use command::{Navigation, Snapshot};
pub use observer::ObserverId;

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use self::command::Command;
use self::controller::Controller;
use self::observer::Observers;
use crate::engine::{ExecutionPhase, RunOutcome};
use crate::error::{ReplayError, Result};
use crate::graph::Graph;
use crate::log::EventLog;
use crate::playback::Frame;
use crate::session::{Progress, Session};

/// Auto-play state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Move `session` onto its own task.
///
/// Must be called from within a tokio runtime. The join handle yields the
/// session back once every [`SessionHandle`] has been dropped.
pub fn spawn(session: Session) -> (SessionHandle, JoinHandle<Session>) {
    let (tx, rx) = mpsc::channel(session.config().command_capacity.max(1));
    let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);
    let observers = Observers::default();
    let default_delay_ms = session.config().default_delay_ms;

    let controller = Controller::new(session, state_tx, observers.clone(), tx.downgrade());
    let task = tokio::spawn(controller.run(rx));

    let handle = SessionHandle {
        commands: tx,
        state: state_rx,
        observers,
        default_delay_ms,
    };
    (handle, task)
}

/// Cloneable front door to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<SchedulerState>,
    observers: Observers,
    default_delay_ms: u64,
}

impl SessionHandle {
    /// Begin auto-play, advancing one event every `delay_ms` milliseconds.
    ///
    /// Returns the position playback starts from.
    pub async fn start(&self, delay_ms: i64) -> Result<Progress> {
        self.request(|reply| Command::Start { delay_ms, reply }).await?
    }

    /// Begin auto-play with the configured default delay.
    pub async fn start_default(&self) -> Result<Progress> {
        let delay_ms = i64::try_from(self.default_delay_ms).unwrap_or(i64::MAX);
        self.start(delay_ms).await
    }

    /// Stop auto-play and return the resumption point.
    ///
    /// Returns the last recorded resumption point (or `None`) when auto-play
    /// was not running.
    pub async fn stop(&self) -> Result<Option<usize>> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Run the engine until it completes or honours a suspend request.
    pub async fn start_or_resume(&self) -> Result<RunOutcome> {
        self.request(|reply| Command::StartOrResume { reply }).await?
    }

    /// Run exactly one engine phase.
    pub async fn run_phase(&self) -> Result<ExecutionPhase> {
        self.request(|reply| Command::RunPhase { reply }).await?
    }

    pub async fn step_forward(&self) -> Result<Navigation> {
        self.request(|reply| Command::StepForward { reply }).await?
    }

    pub async fn step_backward(&self) -> Result<Navigation> {
        self.request(|reply| Command::StepBackward { reply }).await?
    }

    pub async fn seek(&self, index: usize) -> Result<Progress> {
        self.request(|reply| Command::Seek { index, reply }).await?
    }

    /// Drop the graph, the log and any suspended run.
    pub async fn reset(&self) -> Result<()> {
        self.request(|reply| Command::Reset { reply }).await?
    }

    pub async fn set_graph(&self, graph: Graph) -> Result<()> {
        self.request(|reply| Command::SetGraph { graph, reply }).await?
    }

    /// Replace the graph with a random one of `vertex_count` vertices.
    pub async fn generate(&self, vertex_count: usize) -> Result<()> {
        self.request(|reply| Command::Generate {
            vertex_count,
            reply,
        })
        .await?
    }

    pub async fn load(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.request(|reply| Command::Load { path, reply }).await?
    }

    pub async fn save(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.request(|reply| Command::Save { path, reply }).await?
    }

    pub async fn graph(&self) -> Result<Graph> {
        self.request(|reply| Command::Graph { reply }).await
    }

    /// A copy of the log produced so far.
    pub async fn events(&self) -> Result<EventLog> {
        self.request(|reply| Command::Events { reply }).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Algorithm state at `step`, or at the cursor when `None`.
    pub async fn frame(&self, step: Option<usize>) -> Result<Frame> {
        self.request(|reply| Command::Frame { step, reply }).await?
    }

    /// Current auto-play state.
    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Wait until auto-play is no longer running and return the new state.
    pub async fn wait_until_settled(&self) -> Result<SchedulerState> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| *s != SchedulerState::Running)
            .await
            .map_err(|_| ReplayError::SessionClosed)?;
        Ok(*settled)
    }

    /// Register a callback invoked after every automatic cursor move.
    pub fn subscribe<F>(&self, notify: F) -> ObserverId
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.observers.subscribe(notify)
    }

    /// Register an observer that forwards progress into a channel.
    ///
    /// Dropping the receiver unregisters the observer on the next advance.
    pub fn subscribe_channel(&self) -> (ObserverId, mpsc::UnboundedReceiver<Progress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.observers.subscribe_channel(tx), rx)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| ReplayError::SessionClosed)?;
        response.await.map_err(|_| ReplayError::SessionClosed)
    }
}
