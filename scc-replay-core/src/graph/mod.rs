//! Graph Model
//!
//! A directed graph stored as an adjacency list. Vertices are the indices
//! `0..N`; each vertex owns an ordered list of outgoing edge targets.
//!
//! # Overview
//!
//! The graph is plain data. The only behavior it carries is:
//!
//! - Validation (every edge target must name an existing vertex)
//! - Transposition, used by the second pass of the SCC engine
//! - Construction helpers: from a 0/1 adjacency matrix, or from a seeded
//!   random generator (see [`GraphGenerator`])
//! - Persistence of the raw adjacency list (see [`persist`])
//!
//! # Design Decisions
//!
//! 1. Edge order is significant. The engine explores neighbours in list
//!    order, so two graphs with the same edge set but different orderings
//!    produce different (equally valid) event logs.
//!
//! 2. Self-loops and duplicate edges are rejected by the generator and the
//!    matrix constructor, but [`Graph::validate`] tolerates them. The engine
//!    handles both correctly.

mod generator;
pub mod persist;

pub use generator::GraphGenerator;

use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};

/// Index of a vertex in a [`Graph`].
pub type VertexId = usize;

/// A directed graph as an adjacency list.
///
/// Serializes as the bare list of lists, e.g. `[[1],[2],[0,3],[]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    adjacency: Vec<Vec<VertexId>>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Wrap an existing adjacency list.
    ///
    /// The list is not validated; call [`Graph::validate`] before trusting it.
    pub fn from_adjacency(adjacency: Vec<Vec<VertexId>>) -> Self {
        Self { adjacency }
    }

    /// Build a graph from a square 0/1 adjacency matrix.
    ///
    /// `matrix[i][j] == true` adds the edge `i -> j`. Targets are added in
    /// column order. Diagonal entries are ignored.
    pub fn from_adjacency_matrix(matrix: &[Vec<bool>]) -> Result<Self> {
        let n = matrix.len();
        let mut graph = Self::new(n);

        for (from, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(ReplayError::InvalidGraphState(format!(
                    "adjacency matrix row {from} has {} columns, expected {n}",
                    row.len()
                )));
            }
            for (to, &connected) in row.iter().enumerate() {
                if connected && from != to {
                    graph.adjacency[from].push(to);
                }
            }
        }

        Ok(graph)
    }

    /// Build a graph from an edge list over `vertex_count` vertices.
    pub fn from_edges(vertex_count: usize, edges: &[(VertexId, VertexId)]) -> Result<Self> {
        let mut graph = Self::new(vertex_count);
        for &(from, to) in edges {
            graph.add_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Append the edge `from -> to`.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<()> {
        let n = self.vertex_count();
        if from >= n || to >= n {
            return Err(ReplayError::InvalidGraphState(format!(
                "edge {from} -> {to} is outside a graph of {n} vertices"
            )));
        }
        self.adjacency[from].push(to);
        Ok(())
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Outgoing targets of `vertex`, in insertion order.
    ///
    /// Returns an empty slice for an unknown vertex.
    pub fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        self.adjacency.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The raw adjacency list.
    pub fn adjacency(&self) -> &[Vec<VertexId>] {
        &self.adjacency
    }

    /// Consume the graph, returning the raw adjacency list.
    pub fn into_adjacency(self) -> Vec<Vec<VertexId>> {
        self.adjacency
    }

    /// Check that every edge target names an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let n = self.vertex_count();
        for (from, targets) in self.adjacency.iter().enumerate() {
            if let Some(&to) = targets.iter().find(|&&to| to >= n) {
                return Err(ReplayError::InvalidGraphState(format!(
                    "vertex {from} has an edge to {to}, but the graph has only {n} vertices"
                )));
            }
        }
        Ok(())
    }

    /// Build the transposed graph.
    ///
    /// For every edge `u -> v`, visited in vertex order and then edge order,
    /// the edge `v -> u` is appended. No sorting happens, so the reversed
    /// adjacency order is fully determined by the forward graph.
    pub fn reversed(&self) -> Self {
        let mut reversed = Self::new(self.vertex_count());
        for (from, targets) in self.adjacency.iter().enumerate() {
            for &to in targets {
                reversed.adjacency[to].push(from);
            }
        }
        reversed
    }
}
