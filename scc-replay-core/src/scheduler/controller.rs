//! The session task.
//!
//! Owns the [`Session`] and applies every command in arrival order. This is
//! the single writer: the ticker only requests advances, and manual
//! navigation is refused while auto-play is running.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use super::command::{Command, Navigation, Snapshot};
use super::observer::Observers;
use super::ticker::Ticker;
use super::SchedulerState;
use crate::engine::{ExecutionPhase, RunOutcome};
use crate::error::{ReplayError, Result};
use crate::session::{Progress, Session};

pub(super) struct Controller {
    session: Session,
    state: watch::Sender<SchedulerState>,
    observers: Observers,
    commands: mpsc::WeakSender<Command>,
    ticker: Option<Ticker>,
    run: u64,
    resume_point: Option<usize>,
    last_error: Option<String>,
}

impl Controller {
    pub(super) fn new(
        session: Session,
        state: watch::Sender<SchedulerState>,
        observers: Observers,
        commands: mpsc::WeakSender<Command>,
    ) -> Self {
        Self {
            session,
            state,
            observers,
            commands,
            ticker: None,
            run: 0,
            resume_point: None,
            last_error: None,
        }
    }

    /// Process commands until every handle is dropped, then hand the
    /// session back.
    pub(super) async fn run(mut self, mut rx: mpsc::Receiver<Command>) -> Session {
        while let Some(command) = rx.recv().await {
            self.handle(command).await;
        }
        self.cancel_ticker();
        debug!("session task finished");
        self.session
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Start { delay_ms, reply } => {
                let _ = reply.send(self.start(delay_ms));
            }
            Command::Stop { reply } => {
                let _ = reply.send(self.stop());
            }
            Command::Tick { run } => self.tick(run),
            Command::StartOrResume { reply } => {
                let result = self.idle().and_then(|_| {
                    let fresh = !self.session.engine().is_suspended();
                    let outcome = self.session.start_or_resume()?;
                    self.after_engine_run(fresh);
                    Ok(outcome)
                });
                if let Ok(RunOutcome::Suspended(phase)) = result {
                    debug!(?phase, "run suspended between phases");
                }
                let _ = reply.send(result);
            }
            Command::RunPhase { reply } => {
                let result = self.idle().and_then(|_| {
                    let fresh = !self.session.engine().is_suspended();
                    let next = self.session.run_phase()?;
                    self.after_engine_run(fresh);
                    Ok(next)
                });
                let _ = reply.send(result);
            }
            Command::StepForward { reply } => {
                let result = self.idle().map(|_| {
                    let moved = self.session.step_forward().moved();
                    self.navigation(moved, Navigation::NoMoreSteps)
                });
                let _ = reply.send(result);
            }
            Command::StepBackward { reply } => {
                let result = self.idle().map(|_| {
                    let moved = self.session.step_backward().moved();
                    self.navigation(moved, Navigation::AtStart)
                });
                let _ = reply.send(result);
            }
            Command::Seek { index, reply } => {
                let result = self
                    .idle()
                    .and_then(|_| self.session.seek(index).map(|_| ()))
                    .map(|_| self.session.progress());
                let _ = reply.send(result);
            }
            Command::Reset { reply } => {
                let result = self.idle().map(|_| {
                    self.session.reset();
                    self.resume_point = None;
                    self.last_error = None;
                    self.set_state(SchedulerState::Idle);
                });
                let _ = reply.send(result);
            }
            Command::SetGraph { graph, reply } => {
                let result = self.idle().and_then(|_| self.session.set_graph(graph));
                let _ = reply.send(self.after_graph_change(result));
            }
            Command::Generate {
                vertex_count,
                reply,
            } => {
                let result = self
                    .idle()
                    .and_then(|_| self.session.generate(vertex_count));
                let _ = reply.send(self.after_graph_change(result));
            }
            Command::Load { path, reply } => {
                let result = match self.idle() {
                    Ok(()) => self.session.load_file(&path).await,
                    Err(e) => Err(e),
                };
                let _ = reply.send(self.after_graph_change(result));
            }
            Command::Save { path, reply } => {
                let _ = reply.send(self.session.save_file(&path).await);
            }
            Command::Graph { reply } => {
                let _ = reply.send(self.session.graph().clone());
            }
            Command::Events { reply } => {
                let _ = reply.send(self.session.log().clone());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Frame { step, reply } => {
                let result = match step {
                    Some(step) => self.session.frame_at(step),
                    None => self.session.frame(),
                };
                let _ = reply.send(result);
            }
        }
    }

    fn start(&mut self, delay_ms: i64) -> Result<Progress> {
        if delay_ms <= 0 {
            warn!(delay_ms, "rejected non-positive auto-play delay");
            return Err(ReplayError::InvalidDelay(delay_ms));
        }
        if self.current_state() == SchedulerState::Running {
            return Err(ReplayError::SchedulerRunning);
        }

        let log_empty = self.session.log().is_empty();
        let finished = self.session.engine().is_complete()
            && self.session.phase() == ExecutionPhase::NotStarted
            && self.session.at_end();
        if log_empty || finished {
            self.session.start_or_resume()?;
        }

        self.run += 1;
        self.resume_point = None;
        self.last_error = None;
        let delay = Duration::from_millis(delay_ms.unsigned_abs());
        self.ticker = Some(Ticker::spawn(delay, self.run, self.commands.clone()));
        self.set_state(SchedulerState::Running);

        let progress = self.session.progress();
        info!(
            run = self.run,
            delay_ms,
            cursor = progress.cursor,
            total = progress.total,
            "auto-play started"
        );
        self.observers.notify(&progress);
        Ok(progress)
    }

    fn stop(&mut self) -> Option<usize> {
        if self.current_state() != SchedulerState::Running {
            return self.resume_point;
        }

        self.cancel_ticker();
        let position = self.session.position();
        self.resume_point = Some(position);
        self.set_state(SchedulerState::Stopped);
        info!(run = self.run, resume_point = position, "auto-play stopped");
        Some(position)
    }

    fn tick(&mut self, run: u64) {
        if run != self.run || self.current_state() != SchedulerState::Running {
            trace!(run, current = self.run, "discarding stale tick");
            return;
        }

        let mut moved = self.session.step_forward().moved();

        if !moved && self.session.phase() != ExecutionPhase::NotStarted {
            match self.session.run_phase() {
                Ok(next) => {
                    debug!(?next, "produced next phase during auto-play");
                    moved = self.session.step_forward().moved();
                }
                Err(error) => {
                    warn!(%error, "engine failed during auto-play");
                    self.last_error = Some(error.to_string());
                }
            }
        }

        if moved {
            let progress = self.session.progress();
            trace!(cursor = progress.cursor, total = progress.total, "advanced");
            self.observers.notify(&progress);
        } else {
            self.cancel_ticker();
            self.set_state(SchedulerState::Idle);
            info!(run = self.run, events = self.session.log().len(), "auto-play reached the end");
        }
    }

    fn navigation(&self, moved: bool, boundary: Navigation) -> Navigation {
        if moved {
            Navigation::Moved(self.session.progress())
        } else {
            boundary
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.current_state(),
            phase: self.session.phase(),
            complete: self.session.engine().is_complete(),
            progress: self.session.progress(),
            components: self.session.components().to_vec(),
            resume_point: self.resume_point,
            last_error: self.last_error.clone(),
        }
    }

    /// Fails with `SchedulerRunning` while auto-play owns the cursor.
    fn idle(&self) -> Result<()> {
        if self.current_state() == SchedulerState::Running {
            debug!("command refused while auto-play is running");
            return Err(ReplayError::SchedulerRunning);
        }
        Ok(())
    }

    fn after_graph_change(&mut self, result: Result<()>) -> Result<()> {
        if result.is_ok() {
            self.resume_point = None;
            self.last_error = None;
            self.set_state(SchedulerState::Idle);
        }
        result
    }

    /// A fresh run rewinds the cursor, so a recorded resumption point no
    /// longer refers to the current log.
    fn after_engine_run(&mut self, fresh: bool) {
        if fresh {
            self.resume_point = None;
            self.last_error = None;
            self.set_state(SchedulerState::Idle);
        }
    }

    fn current_state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.send_replace(state);
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
