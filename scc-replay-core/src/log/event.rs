//! Algorithm events.
//!
//! An [`Event`] is one immutable record of something the engine did. Events
//! are structured so consumers can switch on the kind and operands directly;
//! the `Display` impl exists only for logs and text output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::VertexId;

/// Which depth-first pass of Kosaraju's algorithm is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    /// The order pass over the forward graph.
    First,
    /// The component pass over the reversed graph.
    Second,
}

/// One step of the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BeginPass { pass: Pass },
    VisitVertex { vertex: VertexId },
    TraverseEdge { from: VertexId, to: VertexId },
    PushToOrder { vertex: VertexId },
    BuildReversedGraph,
    ComponentFound { members: Vec<VertexId> },
}

impl Event {
    /// The vertex this event is centred on, if any.
    pub fn vertex(&self) -> Option<VertexId> {
        match self {
            Event::VisitVertex { vertex } | Event::PushToOrder { vertex } => Some(*vertex),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::BeginPass { pass: Pass::First } => write!(f, "Begin first DFS pass"),
            Event::BeginPass { pass: Pass::Second } => write!(f, "Begin second DFS pass"),
            Event::VisitVertex { vertex } => write!(f, "Visit vertex {vertex}"),
            Event::TraverseEdge { from, to } => write!(f, "Traverse edge {from} -> {to}"),
            Event::PushToOrder { vertex } => write!(f, "Push vertex {vertex} onto the order stack"),
            Event::BuildReversedGraph => write!(f, "Build reversed graph"),
            Event::ComponentFound { members } => write!(f, "Component found: {members:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_form_is_tagged() {
        let json = serde_json::to_value(Event::TraverseEdge { from: 1, to: 3 }).unwrap();
        assert_eq!(json["type"], "traverse_edge");
        assert_eq!(json["from"], 1);
        assert_eq!(json["to"], 3);

        let json = serde_json::to_value(Event::BeginPass { pass: Pass::Second }).unwrap();
        assert_eq!(json["type"], "begin_pass");
        assert_eq!(json["pass"], "second");

        let json = serde_json::to_value(Event::BuildReversedGraph).unwrap();
        assert_eq!(json["type"], "build_reversed_graph");
    }

    #[test]
    fn descriptions() {
        assert_eq!(Event::VisitVertex { vertex: 4 }.to_string(), "Visit vertex 4");
        assert_eq!(
            Event::ComponentFound { members: vec![0, 2, 1] }.to_string(),
            "Component found: [0, 2, 1]"
        );
    }

    #[test]
    fn vertex_operand() {
        assert_eq!(Event::PushToOrder { vertex: 2 }.vertex(), Some(2));
        assert_eq!(Event::TraverseEdge { from: 0, to: 1 }.vertex(), None);
    }
}
