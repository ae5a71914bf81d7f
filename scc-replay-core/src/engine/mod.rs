//! SCC Engine
//!
//! A phased implementation of Kosaraju's algorithm that records every step
//! into an [`EventLog`].
//!
//! # Algorithm
//!
//! The computation is split into three phases, each of which runs to
//! completion once started:
//!
//! 1. **Order pass.** Depth-first search over the forward graph from every
//!    unvisited vertex, in index order. Vertices are appended to the
//!    finishing order once all their neighbours are exhausted.
//! 2. **Transpose.** Build the reversed graph.
//! 3. **Component pass.** Pop vertices from the end of the finishing order;
//!    each still-unvisited vertex seeds a depth-first search over the
//!    reversed graph, and everything it reaches is one component.
//!
//! # Suspension
//!
//! [`ExecutionPhase`] records which phase runs next. The engine can stop at
//! any phase boundary and pick up later from the stored phase; the log and
//! the partial results survive the pause and are only ever appended to.
//! Suspension inside a pass is not supported.
//!
//! A pause is requested either by calling [`SccEngine::run_phase`] one phase
//! at a time, or from another thread through a [`SuspendHandle`], which
//! [`SccEngine::start_or_resume`] checks between phases.

mod dfs;
mod suspend;

pub use suspend::SuspendHandle;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReplayError, Result};
use crate::graph::{Graph, VertexId};
use crate::log::{Event, EventLog, Pass};

/// A strongly connected component, members in discovery order.
pub type Component = Vec<VertexId>;

/// Coarse checkpoint of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    /// Nothing has run yet, or the previous run finished.
    #[default]
    NotStarted,
    /// The order pass finished; the transpose is next.
    FirstPassDone,
    /// The reversed graph is built; the component pass is next.
    SecondPassPending,
}

/// How a call to [`SccEngine::start_or_resume`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All phases ran; the component list is final.
    Completed,
    /// A suspend request was honoured; the payload is the phase that runs next.
    Suspended(ExecutionPhase),
}

/// Shape of the graph a run started with, used to detect mutation while
/// suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GraphShape {
    vertices: usize,
    edges: usize,
}

impl GraphShape {
    fn of(graph: &Graph) -> Self {
        Self {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
        }
    }
}

/// Resumable Kosaraju engine.
#[derive(Debug, Default)]
pub struct SccEngine {
    phase: ExecutionPhase,
    log: EventLog,
    components: Vec<Component>,
    visited: Vec<bool>,
    order: Vec<VertexId>,
    reversed: Option<Graph>,
    shape: Option<GraphShape>,
    complete: bool,
    suspend: SuspendHandle,
}

impl SccEngine {
    /// Create an engine with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run from the stored phase until completion or until a suspend request
    /// is observed at a phase boundary.
    ///
    /// Starting from [`ExecutionPhase::NotStarted`] clears the log and the
    /// component list. On error nothing is modified.
    pub fn start_or_resume(&mut self, graph: &Graph) -> Result<RunOutcome> {
        self.check_graph(graph)?;

        loop {
            let next = self.run_phase(graph)?;
            if next == ExecutionPhase::NotStarted {
                return Ok(RunOutcome::Completed);
            }
            if self.suspend.take() {
                info!(phase = ?next, events = self.log.len(), "engine suspended");
                return Ok(RunOutcome::Suspended(next));
            }
        }
    }

    /// Execute exactly one phase and return the phase that runs next.
    ///
    /// Returns [`ExecutionPhase::NotStarted`] once the component pass has
    /// finished.
    pub fn run_phase(&mut self, graph: &Graph) -> Result<ExecutionPhase> {
        self.check_graph(graph)?;

        self.phase = match self.phase {
            ExecutionPhase::NotStarted => {
                self.begin(graph);
                self.order_pass(graph);
                ExecutionPhase::FirstPassDone
            }
            ExecutionPhase::FirstPassDone => {
                self.transpose(graph);
                ExecutionPhase::SecondPassPending
            }
            ExecutionPhase::SecondPassPending => {
                self.component_pass(graph);
                ExecutionPhase::NotStarted
            }
        };

        Ok(self.phase)
    }

    /// The log built so far.
    pub fn steps_produced(&self) -> &EventLog {
        &self.log
    }

    /// Components discovered so far. Final only once [`Self::is_complete`].
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The phase that runs next.
    pub fn current_phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Whether the last run went through all three phases.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether a run is suspended between phases.
    pub fn is_suspended(&self) -> bool {
        self.phase != ExecutionPhase::NotStarted
    }

    /// Handle other threads can use to request a pause.
    pub fn suspend_handle(&self) -> SuspendHandle {
        self.suspend.clone()
    }

    /// Drop the log, the components and any suspended run.
    pub fn reset(&mut self) {
        let suspend = self.suspend.clone();
        suspend.cancel();
        *self = Self {
            suspend,
            ..Self::default()
        };
    }

    fn check_graph(&self, graph: &Graph) -> Result<()> {
        if graph.is_empty() {
            return Err(ReplayError::InvalidGraphState(
                "graph has no vertices".to_string(),
            ));
        }
        graph.validate()?;

        if let Some(expected) = self.shape.filter(|_| self.is_suspended()) {
            let found = GraphShape::of(graph);
            if found != expected {
                return Err(ReplayError::GraphChangedDuringExecution {
                    expected_vertices: expected.vertices,
                    expected_edges: expected.edges,
                    found_vertices: found.vertices,
                    found_edges: found.edges,
                });
            }
        }
        Ok(())
    }

    fn begin(&mut self, graph: &Graph) {
        let n = graph.vertex_count();
        self.log.clear();
        self.components.clear();
        self.order.clear();
        self.order.reserve(n);
        self.visited = vec![false; n];
        self.reversed = None;
        self.shape = Some(GraphShape::of(graph));
        self.complete = false;
        debug!(vertices = n, edges = graph.edge_count(), "starting SCC run");
    }

    fn order_pass(&mut self, graph: &Graph) {
        self.log.push(Event::BeginPass { pass: Pass::First });
        for start in 0..graph.vertex_count() {
            if !self.visited[start] {
                dfs::order_pass(graph, start, &mut self.visited, &mut self.order, &mut self.log);
            }
        }
        debug!(events = self.log.len(), "order pass finished");
    }

    fn transpose(&mut self, graph: &Graph) {
        self.log.push(Event::BuildReversedGraph);
        self.reversed = Some(graph.reversed());
    }

    fn component_pass(&mut self, graph: &Graph) {
        self.log.push(Event::BeginPass { pass: Pass::Second });
        let reversed = self.reversed.take().unwrap_or_else(|| graph.reversed());
        self.visited = vec![false; graph.vertex_count()];

        while let Some(vertex) = self.order.pop() {
            if self.visited[vertex] {
                continue;
            }
            let members = dfs::collect_component(&reversed, vertex, &mut self.visited);
            self.log.push(Event::ComponentFound {
                members: members.clone(),
            });
            self.components.push(members);
        }

        self.complete = true;
        info!(
            components = self.components.len(),
            events = self.log.len(),
            "SCC run complete"
        );
    }
}
