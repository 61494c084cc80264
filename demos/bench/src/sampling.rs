//! Node sampling for benchmark queries.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use cp_spatial::SpatialGraph;

/// Up to `max_nodes` node keys, in graph order.
pub fn collect_node_keys(graph: &SpatialGraph, max_nodes: usize) -> Vec<String> {
    graph
        .adjacency()
        .take(max_nodes)
        .map(|(key, _)| key.to_string())
        .collect()
}

/// `trials` random `(start, end)` pairs with `start != end`.  Pairs may
/// repeat.  The same `seed` always yields the same pairs.
///
/// `keys` must hold at least two distinct entries.
pub fn random_pairs(keys: &[String], trials: usize, seed: u64) -> Vec<(String, String)> {
    assert!(keys.len() >= 2, "need at least two nodes to form pairs");

    let mut rng = SmallRng::seed_from_u64(seed);
    (0..trials)
        .map(|_| {
            let s = rng.gen_range(0..keys.len());
            let mut t = rng.gen_range(0..keys.len());
            while t == s {
                t = rng.gen_range(0..keys.len());
            }
            (keys[s].clone(), keys[t].clone())
        })
        .collect()
}
