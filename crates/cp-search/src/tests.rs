//! Unit tests for cp-search.
//!
//! Graphs are built by hand or from inline GeoJSON so no data files are
//! needed.

#[cfg(test)]
mod helpers {
    use cp_core::GeoPoint;
    use cp_spatial::{LoadOptions, SpatialGraph, SpatialGraphBuilder, load_geojson_str};

    /// `[[0,0],[0,1],[0,2]]` as a single LineString: keys `0.0,0.0`,
    /// `1.0,0.0`, `2.0,0.0`.
    pub fn meridian_chain() -> SpatialGraph {
        let doc = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature",
              "geometry": { "type": "LineString", "coordinates": [[0,0],[0,1],[0,2]] } }
        ]}"#;
        load_geojson_str(doc, &LoadOptions::default()).unwrap()
    }

    /// 5×5 lattice of campus-sized blocks (~110 m N-S, ~92 m E-W) with
    /// horizontal and vertical walkways, a few diagonals, and one gap so
    /// ties and detours both occur.
    pub fn campus_grid() -> SpatialGraph {
        const N: usize = 5;
        let mut b = SpatialGraphBuilder::new();
        let mut ids = Vec::with_capacity(N * N);
        for row in 0..N {
            for col in 0..N {
                let lat = 34.068 + row as f64 * 0.001;
                let lon = -118.445 + col as f64 * 0.001;
                ids.push(b.add_node(GeoPoint::new(lat, lon)));
            }
        }
        let at = |r: usize, c: usize| ids[r * N + c];
        for r in 0..N {
            for c in 0..N {
                // Leave out one east-west walkway in the middle of the grid.
                if c + 1 < N && !(r == 2 && c == 1) {
                    b.add_walkway(at(r, c), at(r, c + 1));
                }
                if r + 1 < N {
                    b.add_walkway(at(r, c), at(r + 1, c));
                }
            }
        }
        b.add_walkway(at(0, 0), at(1, 1));
        b.add_walkway(at(3, 3), at(4, 4));
        b.add_walkway(at(1, 3), at(2, 4));
        b.build()
    }

    /// Two separate segments with no connection between them.
    pub fn two_islands() -> SpatialGraph {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        let x = b.add_node(GeoPoint::new(1.0, 0.0));
        let y = b.add_node(GeoPoint::new(1.0, 0.001));
        b.add_walkway(a, c);
        b.add_walkway(x, y);
        b.build()
    }

    /// Diamond with explicit lengths where the direct edge to `C` is pushed
    /// first and later superseded:
    ///
    /// ```text
    ///   A --1-- B
    ///   |       |
    ///   5       1
    ///   |       |
    ///   C ------+
    ///   |
    ///   1
    ///   |
    ///   D
    /// ```
    ///
    /// Nodes sit centimetres apart so the explicit lengths dominate the
    /// great-circle estimate.
    pub fn diamond() -> (SpatialGraph, [String; 4]) {
        let mut b = SpatialGraphBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let bb = b.add_node(GeoPoint::new(0.0, 0.000_001));
        let c = b.add_node(GeoPoint::new(0.000_001, 0.0));
        let d = b.add_node(GeoPoint::new(0.000_002, 0.0));
        b.add_walkway_with_weight(a, bb, 1.0);
        b.add_walkway_with_weight(a, c, 5.0);
        b.add_walkway_with_weight(bb, c, 1.0);
        b.add_walkway_with_weight(c, d, 1.0);
        let g = b.build();
        let keys = [a, bb, c, d].map(|id| g.key(id).to_string());
        (g, keys)
    }

    /// Every consecutive pair of `path` is an edge of `graph`.
    pub fn is_walkable(graph: &SpatialGraph, path: &[cp_core::NodeKey]) -> bool {
        path.windows(2).all(|w| {
            graph.neighbors(w[0].as_str()).any(|(k, _)| *k == w[1])
        })
    }

    /// Sum of the edge weights along `path`, taking the lightest parallel
    /// edge between each pair.
    pub fn path_length(graph: &SpatialGraph, path: &[cp_core::NodeKey]) -> f64 {
        path.windows(2)
            .map(|w| {
                graph
                    .neighbors(w[0].as_str())
                    .filter(|(k, _)| **k == w[1])
                    .map(|(_, wt)| wt)
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    pub fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }
}

// ── Shared contract (both strategies) ─────────────────────────────────────────

#[cfg(test)]
mod contract {
    use cp_core::haversine_m;
    use crate::{Algorithm, PathFinder, SearchState, SearchStrategy, Unreachable};
    use super::helpers::{close, is_walkable, meridian_chain, path_length, two_islands};

    #[test]
    fn chain_scenario() {
        let g = meridian_chain();
        let expected = haversine_m(0.0, 0.0, 1.0, 0.0) + haversine_m(1.0, 0.0, 2.0, 0.0);
        for algo in Algorithm::ALL {
            let r = PathFinder::new(&g, algo).compute_path("0.0,0.0", "2.0,0.0");
            assert!(r.reachable, "{algo}");
            assert_eq!(r.path, ["0.0,0.0", "1.0,0.0", "2.0,0.0"].map(cp_core::NodeKey::from));
            assert!(close(r.weight, expected), "{algo}: {} vs {expected}", r.weight);
            assert!(r.elapsed_ms >= 0.0);
            assert_eq!(r.reason, None);
            assert_eq!(r.hops(), 2);
        }
    }

    #[test]
    fn trivial_same_node() {
        let g = meridian_chain();
        for algo in Algorithm::ALL {
            let r = PathFinder::new(&g, algo).compute_path("1.0,0.0", "1.0,0.0");
            assert!(r.reachable);
            assert!(r.is_trivial());
            assert_eq!(r.path, [cp_core::NodeKey::from("1.0,0.0")]);
            assert_eq!(r.weight, 0.0);
        }
    }

    #[test]
    fn unknown_nodes_short_circuit() {
        let g = meridian_chain();
        for algo in Algorithm::ALL {
            let mut finder = PathFinder::new(&g, algo);
            let r = finder.compute_path("NOT_A_NODE", "ALSO_NOT");
            assert!(!r.reachable);
            assert!(r.path.is_empty());
            assert_eq!(r.weight, 0.0);
            assert_eq!(r.elapsed_ms, 0.0);
            assert_eq!(r.reason, Some(Unreachable::UnknownStart));

            let r = finder.compute_path("0.0,0.0", "NOT_A_NODE");
            assert!(!r.reachable);
            assert_eq!(r.reason, Some(Unreachable::UnknownEnd));
        }
    }

    #[test]
    fn disconnected_pair_is_unreachable() {
        let g = two_islands();
        for algo in Algorithm::ALL {
            let r = PathFinder::new(&g, algo).compute_path("0.0,0.0", "1.0,0.001");
            assert!(!r.reachable);
            assert!(r.path.is_empty());
            assert_eq!(r.weight, 0.0);
            assert_eq!(r.reason, Some(Unreachable::NoPath));
        }
    }

    #[test]
    fn no_path_reports_zero_elapsed() {
        let g = two_islands();
        for algo in Algorithm::ALL {
            let r = PathFinder::new(&g, algo).compute_path("0.0,0.0", "1.0,0.001");
            assert!(!r.reachable, "{algo}");
            assert_eq!(r.elapsed_ms, 0.0, "{algo}");
        }
    }

    #[test]
    fn path_is_walkable_and_anchored() {
        let g = super::helpers::campus_grid();
        let keys = g.node_keys();
        for algo in Algorithm::ALL {
            let mut finder = PathFinder::new(&g, algo);
            for s in keys.iter().step_by(3) {
                for t in keys.iter().step_by(4) {
                    let r = finder.compute_path(s.as_str(), t.as_str());
                    assert!(r.reachable);
                    assert_eq!(r.path.first(), Some(s));
                    assert_eq!(r.path.last(), Some(t));
                    assert!(is_walkable(&g, &r.path), "{algo}: {r}");
                    assert!(close(path_length(&g, &r.path), r.weight));
                }
            }
        }
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let g = super::helpers::campus_grid();
        let keys = g.node_keys();
        let (s, t, mid) = (keys[0].as_str(), keys[24].as_str(), keys[12].as_str());
        for algo in Algorithm::ALL {
            let mut finder = PathFinder::new(&g, algo);
            let first = finder.compute_path(s, t);
            // An unrelated query in between must not leak state.
            let other = finder.compute_path(t, mid);
            assert!(other.reachable);
            let again = finder.compute_path(s, t);
            assert!(first.same_route(&again), "{algo}: {first} vs {again}");

            let fresh = PathFinder::new(&g, algo).compute_path(s, t);
            assert!(first.same_route(&fresh));
        }
    }

    #[test]
    fn state_reuse_after_unreachable_query() {
        let g = two_islands();
        let mut state = SearchState::new();
        for algo in Algorithm::ALL {
            let miss = algo.compute_path(&g, &mut state, "0.0,0.0", "1.0,0.0");
            assert!(!miss.reachable);
            let hit = algo.compute_path(&g, &mut state, "1.0,0.0", "1.0,0.001");
            assert!(hit.reachable);
            assert_eq!(hit.hops(), 1);
        }
    }

    #[test]
    fn strategies_agree_on_cost_for_all_pairs() {
        let g = super::helpers::campus_grid();
        let mut ucs = PathFinder::new(&g, Algorithm::Dijkstra);
        let mut astar = PathFinder::new(&g, Algorithm::AStar);
        for s in g.node_keys() {
            for t in g.node_keys() {
                let a = ucs.compute_path(s.as_str(), t.as_str());
                let b = astar.compute_path(s.as_str(), t.as_str());
                assert_eq!(a.reachable, b.reachable);
                assert!(close(a.weight, b.weight), "{s} -> {t}: {} vs {}", a.weight, b.weight);
            }
        }
    }

    #[test]
    fn shared_graph_across_threads() {
        let g = super::helpers::campus_grid();
        let (s, t) = (g.node_keys()[0].as_str(), g.node_keys()[24].as_str());
        let expected = PathFinder::new(&g, Algorithm::Dijkstra).compute_path(s, t);
        assert!(expected.reachable);

        std::thread::scope(|scope| {
            for algo in Algorithm::ALL {
                let (g, expected) = (&g, &expected);
                scope.spawn(move || {
                    let mut finder = PathFinder::new(g, algo);
                    let r = finder.compute_path(s, t);
                    assert!(close(r.weight, expected.weight));
                });
            }
        });
    }
}

// ── Sample campus data ────────────────────────────────────────────────────────

#[cfg(test)]
mod campus_sample {
    use std::path::PathBuf;

    use cp_spatial::{LoadOptions, load_geojson_with_report};
    use crate::{Algorithm, PathFinder, Unreachable};
    use super::helpers::{close, is_walkable, path_length};

    fn sample_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/data/campus.geojson")
    }

    #[test]
    fn loads_and_routes_over_sample_file() {
        let (g, report) = load_geojson_with_report(&sample_path(), &LoadOptions::default()).unwrap();
        assert_eq!(g.node_count(), 12);
        assert_eq!(report.segments, 12);
        assert_eq!(report.ignored_features, 2);
        assert_eq!(report.skipped_features, 1);

        // Bottom of the steps to the far corner of the quad.
        let (start, end) = ("34.068,-118.4463", "34.0705,-118.4433");
        let dijkstra = PathFinder::new(&g, Algorithm::Dijkstra).compute_path(start, end);
        let astar = PathFinder::new(&g, Algorithm::AStar).compute_path(start, end);
        for r in [&dijkstra, &astar] {
            assert!(r.reachable);
            assert_eq!(r.path.first().map(|k| k.as_str()), Some(start));
            assert_eq!(r.path.last().map(|k| k.as_str()), Some(end));
            assert!(is_walkable(&g, &r.path), "{r}");
            assert!(close(path_length(&g, &r.path), r.weight));
        }
        assert!(close(dijkstra.weight, astar.weight));

        // The parking spur is not connected to the campus walkways.
        for algo in Algorithm::ALL {
            let r = PathFinder::new(&g, algo).compute_path(start, "34.072,-118.448");
            assert!(!r.reachable);
            assert_eq!(r.reason, Some(Unreachable::NoPath));
        }
    }
}

// ── Uniform-cost search ───────────────────────────────────────────────────────

#[cfg(test)]
mod dijkstra {
    use cp_spatial::SpatialGraph;
    use crate::{SearchState, SearchStrategy, UniformCostSearch};

    #[test]
    fn superseded_entry_is_skipped() {
        let (g, [a, b, c, d]) = super::helpers::diamond();
        let mut state = SearchState::new();
        let r = UniformCostSearch.compute_path(&g, &mut state, &a, &d);
        assert!(r.reachable);
        assert_eq!(r.path, [&a, &b, &c, &d].map(|k| cp_core::NodeKey::from(k.as_str())));
        assert_eq!(r.weight, 3.0);
        // A, B, C, D each pushed once plus the superseded (5, C).
        assert_eq!(state.pushed_count(), 5);
        assert_eq!(state.settled_count(), 4);
    }

    #[test]
    fn settled_distances_are_final() {
        let (g, [a, _, c, d]) = super::helpers::diamond();
        let mut state = SearchState::new();
        UniformCostSearch.compute_path(&g, &mut state, &a, &d);
        let c_id = g.node_id(&c).unwrap();
        assert!(state.is_visited(c_id));
        assert_eq!(state.dist(c_id), 2.0);
    }

    #[test]
    fn empty_graph() {
        let g = SpatialGraph::empty();
        let r = UniformCostSearch.compute_path(&g, &mut SearchState::new(), "0.0,0.0", "0.0,0.0");
        assert!(!r.reachable);
    }

    #[test]
    fn name() {
        assert_eq!(UniformCostSearch.name(), "Dijkstra");
    }
}

// ── Heuristic search ──────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use cp_core::GeoPoint;
    use cp_spatial::SpatialGraphBuilder;
    use crate::{HeuristicSearch, SearchState, SearchStrategy, UniformCostSearch};

    #[test]
    fn estimate_never_exceeds_true_cost() {
        let g = super::helpers::campus_grid();
        let mut state = SearchState::new();
        for s in g.node_keys() {
            for t in g.node_keys() {
                let r = UniformCostSearch.compute_path(&g, &mut state, s.as_str(), t.as_str());
                let goal = g.node_location(t.as_str()).pos();
                let h = HeuristicSearch::estimate(&g, g.node_id(s.as_str()).unwrap(), goal);
                assert!(h <= r.weight + 1e-6, "{s} -> {t}: h={h} cost={}", r.weight);
            }
        }
    }

    #[test]
    fn settles_fewer_nodes_than_dijkstra_toward_one_end() {
        // Eleven nodes along a meridian; start in the middle, goal at the top.
        let mut b = SpatialGraphBuilder::new();
        let ids: Vec<_> = (0..=10).map(|i| b.add_node(GeoPoint::new(i as f64 * 0.001, 0.0))).collect();
        for w in ids.windows(2) {
            b.add_walkway(w[0], w[1]);
        }
        let g = b.build();
        let (start, goal) = (g.key(ids[5]).to_string(), g.key(ids[10]).to_string());

        let mut ucs = SearchState::new();
        let mut astar = SearchState::new();
        let a = UniformCostSearch.compute_path(&g, &mut ucs, &start, &goal);
        let h = HeuristicSearch.compute_path(&g, &mut astar, &start, &goal);

        assert_eq!(a.path, h.path);
        assert!(astar.settled_count() < ucs.settled_count());
        assert_eq!(astar.settled_count(), 6);
    }

    #[test]
    fn duplicate_frontier_entries_are_dropped_on_pop() {
        let (g, [a, _, _, d]) = super::helpers::diamond();
        let mut state = SearchState::new();
        let r = HeuristicSearch.compute_path(&g, &mut state, &a, &d);
        assert!(r.reachable);
        assert_eq!(r.weight, 3.0);
        assert_eq!(state.settled_count(), 4);
        assert!(state.pushed_count() > state.settled_count());
    }

    #[test]
    fn name() {
        assert_eq!(HeuristicSearch.name(), "A*");
    }
}

// ── State, results, selector ──────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use std::collections::BinaryHeap;

    use cp_core::NodeId;
    use crate::{FrontierEntry, SearchState, SearchStrategy, UniformCostSearch};

    #[test]
    fn frontier_pops_lowest_priority_then_lowest_id() {
        let mut heap = BinaryHeap::new();
        for (priority, id) in [(3.0, 1), (1.0, 7), (2.0, 0), (1.0, 2)] {
            heap.push(FrontierEntry { priority, node: NodeId(id) });
        }
        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.node.0).collect();
        assert_eq!(order, [2, 7, 0, 1]);
    }

    #[test]
    fn reset_clears_everything() {
        let (g, [a, _, _, d]) = super::helpers::diamond();
        let mut state = SearchState::for_graph(&g);
        UniformCostSearch.compute_path(&g, &mut state, &a, &d);
        state.reset(g.node_count());
        for i in 0..g.node_count() {
            let id = NodeId(i as u32);
            assert_eq!(state.dist(id), f64::INFINITY);
            assert_eq!(state.prev(id), None);
            assert!(!state.is_visited(id));
        }
        assert_eq!(state.frontier_len(), 0);
        assert_eq!(state.settled_count(), 0);
        assert_eq!(state.pushed_count(), 0);
    }

    #[test]
    #[should_panic(expected = "no predecessor chain")]
    fn reconstructing_an_unreached_node_panics() {
        let g = super::helpers::two_islands();
        let mut state = SearchState::for_graph(&g);
        state.reset(g.node_count());
        state.reconstruct_path(&g, NodeId(0), NodeId(2));
    }
}

#[cfg(test)]
mod result {
    use cp_core::NodeKey;
    use crate::{PathResult, Unreachable};

    #[test]
    fn display_found() {
        let r = PathResult::found(vec![NodeKey::from("1.0,2.0"), NodeKey::from("1.0,2.5")], 12.3456, 0.1);
        assert_eq!(r.to_string(), "1.0,2.0 -> 1.0,2.5 (12.346 m)");
    }

    #[test]
    fn display_unreachable() {
        let r = PathResult::unreachable(Unreachable::NoPath, 0.0);
        assert_eq!(r.to_string(), "unreachable (no path between nodes)");
        assert_eq!(r.hops(), 0);
        assert!(!r.is_trivial());
    }

    #[test]
    fn same_route_ignores_timing() {
        let a = PathResult::found(vec![NodeKey::from("0.0,0.0")], 0.0, 1.0);
        let b = PathResult::found(vec![NodeKey::from("0.0,0.0")], 0.0, 9.0);
        assert!(a.same_route(&b));
        assert_ne!(a, b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_shape() {
        let r = PathResult::unreachable(Unreachable::UnknownEnd, 0.0);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["reachable"], false);
        assert_eq!(v["reason"], "unknown_end");
        let found = PathResult::found(vec![NodeKey::from("0.0,0.0")], 0.0, 0.0);
        let v = serde_json::to_value(&found).unwrap();
        assert_eq!(v["path"][0], "0.0,0.0");
        assert!(v.get("reason").is_none());
    }
}

#[cfg(test)]
mod algorithm {
    use crate::{Algorithm, SearchError, SearchStrategy};

    #[test]
    fn parse() {
        assert_eq!("dijkstra".parse::<Algorithm>().unwrap(), Algorithm::Dijkstra);
        assert_eq!("A*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert_eq!(" AStar ".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert!(matches!("bfs".parse::<Algorithm>(), Err(SearchError::UnknownAlgorithm(_))));
    }

    #[test]
    fn display_parses_back() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.to_string().parse::<Algorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn names_follow_strategy() {
        assert_eq!(Algorithm::Dijkstra.name(), "Dijkstra");
        assert_eq!(Algorithm::AStar.name(), "A*");
        assert_eq!(Algorithm::default(), Algorithm::Dijkstra);
    }
}
