//! Working state shared by every search strategy.
//!
//! A `SearchState` is reset at the start of each query, so one instance can
//! serve any number of queries in sequence.  Nothing in it survives a reset
//! except the allocations, which are reused.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use cp_core::{NodeId, NodeKey};
use cp_spatial::SpatialGraph;

use crate::{PathResult, Unreachable};

// ── FrontierEntry ─────────────────────────────────────────────────────────────

/// A `(priority, node)` pair in the frontier.
///
/// Ordered so that `BinaryHeap` (a max-heap) pops the *lowest* priority
/// first.  Equal priorities fall back to `NodeId`, which keeps results
/// reproducible from run to run.
#[derive(Copy, Clone, Debug)]
pub struct FrontierEntry {
    pub priority: f64,
    pub node:     NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

// ── SearchState ───────────────────────────────────────────────────────────────

/// Tentative distances, predecessor links, finalised markers, and the
/// frontier for one query.  Indexed by `NodeId`.
///
/// The frontier has no decrease-key; an improved node is pushed again and
/// the superseded entry is discarded when it is popped.
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    dist:     Vec<f64>,
    prev:     Vec<NodeId>,
    visited:  Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
    settled:  usize,
    pushed:   usize,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the buffers for `graph`.
    pub fn for_graph(graph: &SpatialGraph) -> Self {
        let mut state = Self::default();
        state.reset(graph.node_count());
        state
    }

    /// Forget the previous query: every node gets `dist = +inf`, no
    /// predecessor, not visited; the frontier and counters are cleared.
    pub fn reset(&mut self, node_count: usize) {
        self.dist.clear();
        self.dist.resize(node_count, f64::INFINITY);
        self.prev.clear();
        self.prev.resize(node_count, NodeId::INVALID);
        self.visited.clear();
        self.visited.resize(node_count, false);
        self.frontier.clear();
        self.settled = 0;
        self.pushed = 0;
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Best known cost to `node`; `+inf` if unreached or out of range.
    #[inline]
    pub fn dist(&self, node: NodeId) -> f64 {
        self.dist.get(node.index()).copied().unwrap_or(f64::INFINITY)
    }

    #[inline]
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.prev.get(node.index()).copied().filter(|p| p.is_valid())
    }

    #[inline]
    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.get(node.index()).copied().unwrap_or(false)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Nodes finalised during the last query.
    pub fn settled_count(&self) -> usize {
        self.settled
    }

    /// Frontier pushes during the last query, stale duplicates included.
    pub fn pushed_count(&self) -> usize {
        self.pushed
    }

    // ── Strategy hooks ────────────────────────────────────────────────────

    /// Start a query at `start` with frontier priority `priority`.
    pub(crate) fn seed(&mut self, start: NodeId, priority: f64) {
        self.dist[start.index()] = 0.0;
        self.push(priority, start);
    }

    #[inline]
    pub(crate) fn push(&mut self, priority: f64, node: NodeId) {
        self.frontier.push(FrontierEntry { priority, node });
        self.pushed += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<FrontierEntry> {
        self.frontier.pop()
    }

    /// Mark `node` finalised; its `dist` will not change again.
    #[inline]
    pub(crate) fn settle(&mut self, node: NodeId) {
        self.visited[node.index()] = true;
        self.settled += 1;
    }

    /// Record a cheaper route to `to` via `from`.
    #[inline]
    pub(crate) fn relax(&mut self, from: NodeId, to: NodeId, dist: f64) {
        self.dist[to.index()] = dist;
        self.prev[to.index()] = from;
    }

    // ── Results ───────────────────────────────────────────────────────────

    /// Walk predecessor links back from `end` to `start` and return the keys
    /// in travel order.
    ///
    /// # Panics
    ///
    /// If `end` has no predecessor chain reaching `start`.  Only call this
    /// after `dist(end)` is known to be finite.
    pub fn reconstruct_path(&self, graph: &SpatialGraph, start: NodeId, end: NodeId) -> Vec<NodeKey> {
        let mut path = vec![graph.key(end).clone()];
        let mut cur = end;
        while cur != start {
            let Some(prev) = self.prev(cur) else {
                panic!(
                    "no predecessor chain from {} back to {}",
                    graph.key(end),
                    graph.key(start),
                );
            };
            assert!(path.len() <= self.prev.len(), "predecessor cycle through {}", graph.key(prev));
            path.push(graph.key(prev).clone());
            cur = prev;
        }
        path.reverse();
        path
    }

    /// Build the result for a finished search loop.  Only a found path
    /// carries an elapsed time; an unreachable goal reports zero.
    pub(crate) fn finish(
        &self,
        graph: &SpatialGraph,
        start: NodeId,
        end: NodeId,
        started: Instant,
    ) -> PathResult {
        let weight = self.dist(end);
        if weight == f64::INFINITY {
            return PathResult::unreachable(Unreachable::NoPath, 0.0);
        }
        let path = self.reconstruct_path(graph, start, end);
        PathResult::found(path, weight, elapsed_ms(started))
    }
}

#[inline]
fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1_000.0
}
