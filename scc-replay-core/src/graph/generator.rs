//! Random Graph Generator
//!
//! Produces reproducible random graphs. For each vertex `i` the generator
//! draws `k` uniformly from `0..=N/2`, then draws `k` candidate targets
//! uniformly from `0..N`. Candidates that would form a self-loop or repeat
//! an existing edge are discarded, so a vertex ends up with at most `k`
//! outgoing edges.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::Graph;
use crate::error::{ReplayError, Result};

/// Seeded generator of random directed graphs.
#[derive(Debug, Clone)]
pub struct GraphGenerator {
    rng: StdRng,
}

impl GraphGenerator {
    /// Create a generator with a fixed seed.
    ///
    /// Two generators built from the same seed yield identical graphs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate a graph with `vertex_count` vertices.
    pub fn generate(&mut self, vertex_count: usize) -> Result<Graph> {
        if vertex_count == 0 {
            return Err(ReplayError::InvalidGraphState(
                "vertex count must be positive".to_string(),
            ));
        }

        let mut graph = Graph::new(vertex_count);
        for from in 0..vertex_count {
            let attempts = self.rng.gen_range(0..=vertex_count / 2);
            for _ in 0..attempts {
                let to = self.rng.gen_range(0..vertex_count);
                if to != from && !graph.neighbors(from).contains(&to) {
                    graph.add_edge(from, to)?;
                }
            }
        }

        debug!(
            vertices = vertex_count,
            edges = graph.edge_count(),
            "generated random graph"
        );
        Ok(graph)
    }
}
