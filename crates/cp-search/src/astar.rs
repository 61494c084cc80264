//! Heuristic-guided search (A*).
//!
//! The estimate for a node is its great-circle distance to the goal, computed
//! with the same haversine function that produced the edge weights.  A
//! straight line is never longer than a walk between the same points, so the
//! estimate never overshoots and the first time the goal is popped its
//! distance is optimal.

use std::time::Instant;

use log::trace;

use cp_core::{GeoPoint, NodeId};
use cp_spatial::SpatialGraph;

use crate::state::FrontierEntry;
use crate::strategy::resolve_endpoints;
use crate::{PathResult, SearchState, SearchStrategy};

/// A* with a great-circle heuristic.
///
/// Frontier priority is `dist + estimate`.  There is no stale-priority check
/// on pop: a node may sit in the frontier several times and every copy after
/// the first is dropped by the `visited` test.
#[derive(Copy, Clone, Debug, Default)]
pub struct HeuristicSearch;

impl HeuristicSearch {
    /// Great-circle distance in metres from `node` to `goal`.
    #[inline]
    pub fn estimate(graph: &SpatialGraph, node: NodeId, goal: GeoPoint) -> f64 {
        graph.location(node).pos().distance_m(goal)
    }
}

impl SearchStrategy for HeuristicSearch {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn compute_path(
        &self,
        graph: &SpatialGraph,
        state: &mut SearchState,
        start: &str,
        end: &str,
    ) -> PathResult {
        let (from, to) = match resolve_endpoints(graph, start, end) {
            Ok(endpoints) => endpoints,
            Err(early) => return early,
        };

        let started = Instant::now();
        let goal = graph.location(to).pos();

        state.reset(graph.node_count());
        state.seed(from, Self::estimate(graph, from, goal));

        while let Some(FrontierEntry { node, .. }) = state.pop() {
            if state.is_visited(node) {
                continue;
            }

            state.settle(node);
            if node == to {
                break;
            }

            let base = state.dist(node);
            for (next, weight_m) in graph.neighbors_of(node) {
                if state.is_visited(next) {
                    continue;
                }
                let g = base + weight_m;
                if g < state.dist(next) {
                    state.relax(node, next, g);
                    state.push(g + Self::estimate(graph, next, goal), next);
                }
            }
        }

        let result = state.finish(graph, from, to, started);
        trace!(
            "astar {start} -> {end}: reachable={} settled={} pushed={}",
            result.reachable,
            state.settled_count(),
            state.pushed_count(),
        );
        result
    }
}
