//! Depth-first traversals for both Kosaraju passes.
//!
//! Both traversals use an explicit frame stack instead of recursion. A frame
//! is `(vertex, next_edge_index)`; resuming a frame continues with the next
//! unexplored edge, which reproduces recursive visitation order exactly.

use crate::graph::{Graph, VertexId};
use crate::log::{Event, EventLog};

/// First pass: explore from `start`, recording events and finishing order.
pub(super) fn order_pass(
    graph: &Graph,
    start: VertexId,
    visited: &mut [bool],
    order: &mut Vec<VertexId>,
    log: &mut EventLog,
) {
    visited[start] = true;
    log.push(Event::VisitVertex { vertex: start });

    let mut stack: Vec<(VertexId, usize)> = vec![(start, 0)];

    while let Some(frame) = stack.last_mut() {
        let (vertex, next) = *frame;
        let neighbors = graph.neighbors(vertex);

        if next < neighbors.len() {
            frame.1 += 1;
            let to = neighbors[next];
            if !visited[to] {
                log.push(Event::TraverseEdge { from: vertex, to });
                visited[to] = true;
                log.push(Event::VisitVertex { vertex: to });
                stack.push((to, 0));
            }
            continue;
        }

        stack.pop();
        order.push(vertex);
        log.push(Event::PushToOrder { vertex });
    }
}

/// Second pass: collect every vertex reachable from `start` in `reversed`,
/// in visitation order.
pub(super) fn collect_component(
    reversed: &Graph,
    start: VertexId,
    visited: &mut [bool],
) -> Vec<VertexId> {
    visited[start] = true;
    let mut members = vec![start];
    let mut stack: Vec<(VertexId, usize)> = vec![(start, 0)];

    while let Some(frame) = stack.last_mut() {
        let (vertex, next) = *frame;
        let neighbors = reversed.neighbors(vertex);

        if next < neighbors.len() {
            frame.1 += 1;
            let to = neighbors[next];
            if !visited[to] {
                visited[to] = true;
                members.push(to);
                stack.push((to, 0));
            }
            continue;
        }

        stack.pop();
    }

    members
}
