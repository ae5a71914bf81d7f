//! Session
//!
//! The explicit context object that owns everything mutable: the graph, the
//! engine (and therefore the event log and components), the playback cursor
//! and the configuration.
//!
//! A `Session` is synchronous and single-owner. The scheduler wraps one in a
//! task and feeds it commands, so all mutation happens in one place; tests
//! and simple callers can drive it directly.
//!
//! # Rules
//!
//! - The graph can only be replaced while no run is suspended. Reset first.
//! - A failed operation leaves the session exactly as it was.
//! - A run that starts from scratch rewinds the cursor to the first event.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::engine::{Component, ExecutionPhase, RunOutcome, SccEngine, SuspendHandle};
use crate::error::{ReplayError, Result};
use crate::graph::persist::{self, Format};
use crate::graph::{Graph, GraphGenerator};
use crate::log::{Event, EventLog};
use crate::playback::{Frame, PlaybackCursor, StepOutcome};

/// Where the cursor sits, reported after every move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Index of the event under the cursor.
    pub cursor: usize,
    /// Number of events produced so far.
    pub total: usize,
    /// The event under the cursor; `None` only for an empty log.
    pub event: Option<Event>,
}

impl Progress {
    /// Human-readable description of the current event.
    pub fn description(&self) -> Option<String> {
        self.event.as_ref().map(ToString::to_string)
    }
}

/// Graph, engine and cursor for one visualisation session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    graph: Graph,
    engine: SccEngine,
    cursor: PlaybackCursor,
    generator: GraphGenerator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Create a session with an empty graph.
    pub fn new(config: SessionConfig) -> Self {
        let generator = match config.generator_seed {
            Some(seed) => GraphGenerator::seeded(seed),
            None => GraphGenerator::from_entropy(),
        };
        Self {
            config,
            graph: Graph::default(),
            engine: SccEngine::new(),
            cursor: PlaybackCursor::new(),
            generator,
        }
    }

    /// Create a session around an existing graph.
    pub fn with_graph(config: SessionConfig, graph: Graph) -> Result<Self> {
        let mut session = Self::new(config);
        session.set_graph(graph)?;
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn engine(&self) -> &SccEngine {
        &self.engine
    }

    /// The log produced so far.
    pub fn log(&self) -> &EventLog {
        self.engine.steps_produced()
    }

    /// Components found so far.
    pub fn components(&self) -> &[Component] {
        self.engine.components()
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.engine.current_phase()
    }

    /// Handle for requesting a pause of the engine from another thread.
    pub fn suspend_handle(&self) -> SuspendHandle {
        self.engine.suspend_handle()
    }

    /// Replace the graph. Discards the previous log and rewinds the cursor.
    pub fn set_graph(&mut self, graph: Graph) -> Result<()> {
        if self.engine.is_suspended() {
            return Err(ReplayError::ComputationInProgress);
        }
        graph.validate()?;

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph replaced"
        );
        self.graph = graph;
        self.engine.reset();
        self.cursor.rewind();
        Ok(())
    }

    /// Replace the graph with a randomly generated one.
    pub fn generate(&mut self, vertex_count: usize) -> Result<()> {
        if self.engine.is_suspended() {
            return Err(ReplayError::ComputationInProgress);
        }
        let graph = self.generator.generate(vertex_count)?;
        self.set_graph(graph)
    }

    /// Replace the graph from a persisted payload.
    pub fn load_bytes(&mut self, bytes: &[u8], format: Format) -> Result<()> {
        if self.engine.is_suspended() {
            return Err(ReplayError::ComputationInProgress);
        }
        let graph = persist::from_bytes(bytes, format)?;
        self.set_graph(graph)
    }

    /// Encode the current graph.
    pub fn save_bytes(&self, format: Format) -> Result<Vec<u8>> {
        Ok(persist::to_bytes(&self.graph, format)?)
    }

    /// Replace the graph from a file.
    pub async fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.engine.is_suspended() {
            return Err(ReplayError::ComputationInProgress);
        }
        let graph = persist::load(path).await?;
        self.set_graph(graph)
    }

    /// Write the current graph to a file.
    pub async fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(persist::save(&self.graph, path).await?)
    }

    /// Drop the graph, the log and any suspended run.
    pub fn reset(&mut self) {
        self.graph = Graph::default();
        self.engine.reset();
        self.cursor.rewind();
        info!("session reset");
    }

    /// Run the engine until completion or a suspend request.
    pub fn start_or_resume(&mut self) -> Result<RunOutcome> {
        let fresh = !self.engine.is_suspended();
        let outcome = self.engine.start_or_resume(&self.graph)?;
        if fresh {
            self.cursor.rewind();
        }
        Ok(outcome)
    }

    /// Run exactly one engine phase.
    pub fn run_phase(&mut self) -> Result<ExecutionPhase> {
        let fresh = !self.engine.is_suspended();
        let next = self.engine.run_phase(&self.graph)?;
        if fresh {
            self.cursor.rewind();
        }
        Ok(next)
    }

    pub fn step_forward(&mut self) -> StepOutcome<'_> {
        self.cursor.step_forward(self.engine.steps_produced())
    }

    pub fn step_backward(&mut self) -> StepOutcome<'_> {
        self.cursor.step_backward(self.engine.steps_produced())
    }

    pub fn seek(&mut self, index: usize) -> Result<&Event> {
        self.cursor.seek(self.engine.steps_produced(), index)
    }

    /// The event under the cursor.
    pub fn current(&self) -> Option<&Event> {
        self.cursor.current(self.engine.steps_produced())
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Whether the cursor is on the last produced event.
    pub fn at_end(&self) -> bool {
        self.cursor.at_end(self.engine.steps_produced())
    }

    pub fn progress(&self) -> Progress {
        Progress {
            cursor: self.cursor.position(),
            total: self.log().len(),
            event: self.current().cloned(),
        }
    }

    /// Algorithm state at the cursor.
    pub fn frame(&self) -> Result<Frame> {
        self.frame_at(self.cursor.position())
    }

    /// Algorithm state after event `step`.
    pub fn frame_at(&self, step: usize) -> Result<Frame> {
        Frame::replay(self.log(), step, self.graph.vertex_count())
    }

    #[cfg(test)]
    pub(crate) fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::VertexStatus;

    fn scenario() -> Session {
        let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 0), (1, 3)]).unwrap();
        Session::with_graph(SessionConfig::default(), graph).unwrap()
    }

    #[test]
    fn graph_is_locked_while_suspended() {
        let mut session = scenario();
        session.run_phase().unwrap();

        assert!(matches!(
            session.set_graph(Graph::new(2)),
            Err(ReplayError::ComputationInProgress)
        ));
        assert!(matches!(
            session.generate(3),
            Err(ReplayError::ComputationInProgress)
        ));
        assert_eq!(session.graph().vertex_count(), 4);

        session.reset();
        assert!(session.graph().is_empty());
        session.set_graph(Graph::new(2)).unwrap();
    }

    #[test]
    fn failed_load_keeps_session() {
        let mut session = scenario();
        session.start_or_resume().unwrap();
        let log = session.log().clone();

        assert!(session.load_bytes(b"[[7]]", Format::Json).is_err());
        assert_eq!(session.graph().vertex_count(), 4);
        assert_eq!(session.log(), &log);
    }

    #[test]
    fn save_then_load() {
        let mut session = Session::new(SessionConfig {
            generator_seed: Some(3),
            ..SessionConfig::default()
        });
        session.generate(9).unwrap();
        let saved = session.save_bytes(Format::MsgPack).unwrap();
        let original = session.graph().clone();

        session.reset();
        session.load_bytes(&saved, Format::MsgPack).unwrap();
        assert_eq!(session.graph(), &original);
    }

    #[test]
    fn fresh_run_rewinds_cursor() {
        let mut session = scenario();
        session.start_or_resume().unwrap();
        session.seek(10).unwrap();

        session.start_or_resume().unwrap();
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn cursor_stays_put_across_resume() {
        let mut session = scenario();
        session.run_phase().unwrap();
        session.seek(5).unwrap();

        session.run_phase().unwrap();
        assert_eq!(session.position(), 5);
    }

    #[test]
    fn progress_and_frame_follow_cursor() {
        let mut session = scenario();
        assert_eq!(
            session.progress(),
            Progress {
                cursor: 0,
                total: 0,
                event: None
            }
        );

        session.start_or_resume().unwrap();
        session.step_forward();
        let progress = session.progress();
        assert_eq!(progress.cursor, 1);
        assert_eq!(progress.total, 16);
        assert_eq!(progress.description().as_deref(), Some("Visit vertex 0"));

        let frame = session.frame().unwrap();
        assert_eq!(frame.status(0), Some(VertexStatus::Visited));
    }
}
