//! Uniform-cost search (Dijkstra).

use std::time::Instant;

use log::trace;

use cp_spatial::SpatialGraph;

use crate::state::FrontierEntry;
use crate::strategy::resolve_endpoints;
use crate::{PathResult, SearchState, SearchStrategy};

/// Dijkstra's algorithm: the frontier is ordered by accumulated walking
/// distance alone.
///
/// Stops as soon as the goal is finalised.  Correct for non-negative edge
/// weights, which every loaded graph has.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformCostSearch;

impl SearchStrategy for UniformCostSearch {
    fn name(&self) -> &'static str {
        "Dijkstra"
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
        state.reset(graph.node_count());
        state.seed(from, 0.0);

        while let Some(FrontierEntry { priority, node }) = state.pop() {
            // Finalised already, or superseded by a cheaper push.
            if state.is_visited(node) || priority > state.dist(node) {
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
                let candidate = base + weight_m;
                if candidate < state.dist(next) {
                    state.relax(node, next, candidate);
                    state.push(candidate, next);
                }
            }
        }

        let result = state.finish(graph, from, to, started);
        trace!(
            "dijkstra {start} -> {end}: reachable={} settled={} pushed={}",
            result.reachable,
            state.settled_count(),
            state.pushed_count(),
        );
        result
    }
}
