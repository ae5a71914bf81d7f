//! Reconstruction of algorithm state at a given step.
//!
//! A [`Frame`] is what a renderer needs to draw step `k`: the status of every
//! vertex, the pass in progress, the components found so far, and what event
//! `k` itself points at. It is derived purely from the log prefix `0..=k`,
//! so scrubbing backwards never reruns the engine.

use serde::Serialize;

use crate::engine::Component;
use crate::error::{ReplayError, Result};
use crate::graph::VertexId;
use crate::log::{Event, EventLog, Pass};

/// Per-vertex state at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "component", rename_all = "snake_case")]
pub enum VertexStatus {
    Unvisited,
    /// Entered by the order pass, neighbours not yet exhausted.
    Visited,
    /// Pushed onto the finishing order.
    Finished,
    /// Member of the component with this index.
    Assigned(usize),
}

/// What the event under the cursor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Focus {
    /// A marker event with no operands.
    None,
    /// The vertex was just entered; its out-edges are the candidates.
    Visiting { vertex: VertexId },
    /// The edge was just followed.
    Traversing { from: VertexId, to: VertexId },
    /// The vertex was just pushed onto the order.
    Pushing { vertex: VertexId },
    /// The component with this index was just found.
    Component { index: usize },
}

/// Algorithm state after applying events `0..=step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    step: usize,
    pass: Option<Pass>,
    reversed_built: bool,
    statuses: Vec<VertexStatus>,
    components: Vec<Component>,
    focus: Focus,
}

impl Frame {
    /// Replay `log[0..=step]` over a graph of `vertex_count` vertices.
    pub fn replay(log: &EventLog, step: usize, vertex_count: usize) -> Result<Self> {
        if step >= log.len() {
            return Err(ReplayError::OutOfRange {
                index: step,
                len: log.len(),
            });
        }

        let mut frame = Self {
            step,
            pass: None,
            reversed_built: false,
            statuses: vec![VertexStatus::Unvisited; vertex_count],
            components: Vec::new(),
            focus: Focus::None,
        };
        for event in log.iter().take(step + 1) {
            frame.apply(event);
        }
        Ok(frame)
    }

    fn apply(&mut self, event: &Event) {
        self.focus = match event {
            Event::BeginPass { pass } => {
                self.pass = Some(*pass);
                Focus::None
            }
            Event::VisitVertex { vertex } => {
                self.set_status(*vertex, VertexStatus::Visited);
                Focus::Visiting { vertex: *vertex }
            }
            Event::TraverseEdge { from, to } => Focus::Traversing {
                from: *from,
                to: *to,
            },
            Event::PushToOrder { vertex } => {
                self.set_status(*vertex, VertexStatus::Finished);
                Focus::Pushing { vertex: *vertex }
            }
            Event::BuildReversedGraph => {
                self.reversed_built = true;
                Focus::None
            }
            Event::ComponentFound { members } => {
                let index = self.components.len();
                for &vertex in members {
                    self.set_status(vertex, VertexStatus::Assigned(index));
                }
                self.components.push(members.clone());
                Focus::Component { index }
            }
        };
    }

    fn set_status(&mut self, vertex: VertexId, status: VertexStatus) {
        if let Some(slot) = self.statuses.get_mut(vertex) {
            *slot = status;
        }
    }

    /// Index of the event this frame was built up to.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Pass in progress, `None` before the first `BeginPass`.
    pub fn pass(&self) -> Option<Pass> {
        self.pass
    }

    /// Whether the reversed graph exists at this step.
    pub fn reversed_built(&self) -> bool {
        self.reversed_built
    }

    /// Status of `vertex`.
    pub fn status(&self, vertex: VertexId) -> Option<VertexStatus> {
        self.statuses.get(vertex).copied()
    }

    /// Status of every vertex.
    pub fn statuses(&self) -> &[VertexStatus] {
        &self.statuses
    }

    /// Components found up to this step.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// What event `step` points at.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether the edge `from -> to` is emphasised at this step: the edge
    /// just traversed, or any out-edge of the vertex just entered.
    pub fn is_edge_highlighted(&self, from: VertexId, to: VertexId) -> bool {
        match self.focus {
            Focus::Visiting { vertex } => vertex == from,
            Focus::Traversing { from: f, to: t } => f == from && t == to,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SccEngine;
    use crate::graph::Graph;

    fn run() -> (Graph, SccEngine) {
        let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 0), (1, 3)]).unwrap();
        let mut engine = SccEngine::new();
        engine.start_or_resume(&graph).unwrap();
        (graph, engine)
    }

    #[test]
    fn mid_first_pass() {
        let (graph, engine) = run();
        // Step 4 is TraverseEdge 1 -> 2.
        let frame = Frame::replay(engine.steps_produced(), 4, graph.vertex_count()).unwrap();

        assert_eq!(frame.pass(), Some(Pass::First));
        assert_eq!(frame.focus(), Focus::Traversing { from: 1, to: 2 });
        assert!(frame.is_edge_highlighted(1, 2));
        assert!(!frame.is_edge_highlighted(1, 3));
        assert_eq!(frame.status(0), Some(VertexStatus::Visited));
        assert_eq!(frame.status(2), Some(VertexStatus::Unvisited));
    }

    #[test]
    fn visiting_highlights_out_edges() {
        let (graph, engine) = run();
        // Step 3 is VisitVertex 1.
        let frame = Frame::replay(engine.steps_produced(), 3, graph.vertex_count()).unwrap();
        assert!(frame.is_edge_highlighted(1, 2));
        assert!(frame.is_edge_highlighted(1, 3));
        assert!(!frame.is_edge_highlighted(0, 1));
    }

    #[test]
    fn final_frame_matches_components() {
        let (graph, engine) = run();
        let last = engine.steps_produced().len() - 1;
        let frame = Frame::replay(engine.steps_produced(), last, graph.vertex_count()).unwrap();

        assert_eq!(frame.components(), engine.components());
        assert_eq!(frame.focus(), Focus::Component { index: 1 });
        assert!(frame.reversed_built());
        assert_eq!(frame.status(3), Some(VertexStatus::Assigned(1)));
        assert_eq!(frame.status(1), Some(VertexStatus::Assigned(0)));
    }

    #[test]
    fn scrubbing_back_forgets_later_events() {
        let (graph, engine) = run();
        let late = Frame::replay(engine.steps_produced(), 14, graph.vertex_count()).unwrap();
        let early = Frame::replay(engine.steps_produced(), 11, graph.vertex_count()).unwrap();

        assert_eq!(late.components().len(), 1);
        assert!(early.components().is_empty());
        assert!(early.statuses().iter().all(|&s| s == VertexStatus::Finished));
    }

    #[test]
    fn out_of_range_step() {
        let (graph, engine) = run();
        let len = engine.steps_produced().len();
        assert!(matches!(
            Frame::replay(engine.steps_produced(), len, graph.vertex_count()),
            Err(ReplayError::OutOfRange { .. })
        ));
    }
}
