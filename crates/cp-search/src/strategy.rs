//! Strategy trait, algorithm selector, and the `PathFinder` convenience engine.

use std::fmt;
use std::str::FromStr;

use cp_core::NodeId;
use cp_spatial::SpatialGraph;

use crate::{HeuristicSearch, PathResult, SearchError, SearchState, UniformCostSearch, Unreachable};

// ── SearchStrategy ────────────────────────────────────────────────────────────

/// A shortest-path algorithm over a [`SpatialGraph`].
///
/// Implementations hold no per-query data: everything mutable goes through
/// the caller's [`SearchState`], which is reset at the start of each call.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one strategy value can be shared
/// by worker threads that each own a `SearchState`.
pub trait SearchStrategy: Send + Sync {
    /// Human-readable algorithm name.
    fn name(&self) -> &'static str;

    /// Shortest path from `start` to `end`.
    ///
    /// Never fails: unknown keys and disconnected pairs come back with
    /// `reachable == false`, an empty path, and zero weight.
    fn compute_path(
        &self,
        graph: &SpatialGraph,
        state: &mut SearchState,
        start: &str,
        end: &str,
    ) -> PathResult;
}

impl<S: SearchStrategy + ?Sized> SearchStrategy for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compute_path(
        &self,
        graph: &SpatialGraph,
        state: &mut SearchState,
        start: &str,
        end: &str,
    ) -> PathResult {
        (**self).compute_path(graph, state, start, end)
    }
}

/// Look up both endpoints, or produce the early-exit result.  No time is
/// measured for an early exit.
pub(crate) fn resolve_endpoints(
    graph: &SpatialGraph,
    start: &str,
    end: &str,
) -> Result<(NodeId, NodeId), PathResult> {
    let Some(s) = graph.node_id(start) else {
        return Err(PathResult::unreachable(Unreachable::UnknownStart, 0.0));
    };
    let Some(t) = graph.node_id(end) else {
        return Err(PathResult::unreachable(Unreachable::UnknownEnd, 0.0));
    };
    Ok((s, t))
}

// ── Algorithm ─────────────────────────────────────────────────────────────────

/// Runtime choice between the two built-in strategies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    #[default]
    Dijkstra,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::AStar];
}

impl SearchStrategy for Algorithm {
    fn name(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => UniformCostSearch.name(),
            Algorithm::AStar => HeuristicSearch.name(),
        }
    }

    fn compute_path(
        &self,
        graph: &SpatialGraph,
        state: &mut SearchState,
        start: &str,
        end: &str,
    ) -> PathResult {
        match self {
            Algorithm::Dijkstra => UniformCostSearch.compute_path(graph, state, start, end),
            Algorithm::AStar => HeuristicSearch.compute_path(graph, state, start, end),
        }
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" | "ucs" | "uniform-cost" => Ok(Algorithm::Dijkstra),
            "astar" | "a*" | "a-star" | "heuristic" => Ok(Algorithm::AStar),
            _ => Err(SearchError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
        })
    }
}

// ── PathFinder ────────────────────────────────────────────────────────────────

/// A strategy bound to one graph, with its own reusable [`SearchState`].
///
/// Not shareable between threads while querying (`compute_path` takes
/// `&mut self`); create one per worker instead.
///
/// # Example
///
/// ```
/// use cp_core::GeoPoint;
/// use cp_search::{Algorithm, PathFinder};
/// use cp_spatial::SpatialGraphBuilder;
///
/// let mut b = SpatialGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(34.0689, -118.4452));
/// let c = b.add_node(GeoPoint::new(34.0700, -118.4452));
/// b.add_walkway(a, c);
/// let graph = b.build();
///
/// let mut finder = PathFinder::new(&graph, Algorithm::AStar);
/// let result = finder.compute_path("34.0689,-118.4452", "34.07,-118.4452");
/// assert!(result.reachable);
/// assert_eq!(result.path.len(), 2);
/// ```
pub struct PathFinder<'g, S = Algorithm> {
    graph:    &'g SpatialGraph,
    strategy: S,
    state:    SearchState,
}

impl<'g, S: SearchStrategy> PathFinder<'g, S> {
    pub fn new(graph: &'g SpatialGraph, strategy: S) -> Self {
        Self { graph, strategy, state: SearchState::for_graph(graph) }
    }

    pub fn compute_path(&mut self, start: &str, end: &str) -> PathResult {
        self.strategy.compute_path(self.graph, &mut self.state, start, end)
    }

    pub fn graph(&self) -> &'g SpatialGraph {
        self.graph
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// State left by the most recent query (counters, distances).
    pub fn state(&self) -> &SearchState {
        &self.state
    }
}
