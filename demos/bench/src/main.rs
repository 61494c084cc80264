//! bench — Dijkstra vs A* over random node pairs of a campus network.
//!
//! Both algorithms answer the same seeded set of `(start, end)` pairs.  The
//! report gives reachability, average time, average walking distance, path
//! length, and settled nodes per algorithm, then the average-time speedup.
//!
//! Run with:
//!   cargo run -p bench --profile fast -- --graph demos/data/campus.geojson --trials 5000

mod sampling;
mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use cp_core::KeyPrecision;
use cp_search::{Algorithm, PathFinder, PathResult, SearchStrategy};
use cp_spatial::{LoadOptions, SpatialGraph, load_geojson_with_report};

use sampling::{collect_node_keys, random_pairs};
use stats::{BenchStats, disagree, speedup};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "bench", about = "Benchmark Dijkstra and A* on random node pairs")]
struct Args {
    /// GeoJSON file with LineString / MultiLineString walkways.
    #[arg(long, default_value = "demos/data/campus.geojson")]
    graph: PathBuf,

    /// Number of random pairs.
    #[arg(long, default_value_t = 5_000)]
    trials: usize,

    /// Sample pairs from at most this many nodes.
    #[arg(long, default_value_t = 4_000)]
    max_nodes: usize,

    /// RNG seed for pair selection.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Node key precision: "shortest" or "fixed:<decimals>".
    #[arg(long, default_value_t = KeyPrecision::Shortest)]
    precision: KeyPrecision,
}

/// Run every pair through `algorithm`, returning the totals and each result.
fn run_bench(
    graph: &SpatialGraph,
    algorithm: Algorithm,
    pairs: &[(String, String)],
) -> (BenchStats, Vec<PathResult>) {
    let mut finder = PathFinder::new(graph, algorithm);
    let mut stats = BenchStats::default();
    let mut results = Vec::with_capacity(pairs.len());
    for (s, t) in pairs {
        let result = finder.compute_path(s, t);
        stats.record(&result, finder.state().settled_count());
        results.push(result);
    }
    (stats, results)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = LoadOptions::with_precision(args.precision);
    let (graph, report) = load_geojson_with_report(&args.graph, &options)
        .with_context(|| format!("loading {}", args.graph.display()))?;
    info!(
        "graph: {} nodes, {} walkways ({} features skipped)",
        graph.node_count(),
        report.segments,
        report.skipped_features,
    );

    let keys = collect_node_keys(&graph, args.max_nodes);
    println!("Collected node keys: {}", keys.len());
    if keys.len() < 2 {
        bail!("not enough nodes to benchmark ({} found)", keys.len());
    }

    let pairs = random_pairs(&keys, args.trials, args.seed);

    let mut runs = Vec::with_capacity(Algorithm::ALL.len());
    for algorithm in Algorithm::ALL {
        let (stats, results) = run_bench(&graph, algorithm, &pairs);
        println!("\n== {} ==\n{stats}", algorithm.name());
        runs.push((stats, results));
    }

    let (dijkstra, astar) = (&runs[0], &runs[1]);

    let mismatches = dijkstra
        .1
        .iter()
        .zip(&astar.1)
        .filter(|(a, b)| disagree(a, b))
        .count();
    if mismatches > 0 {
        warn!("{mismatches} of {} pairs disagree between Dijkstra and A*", pairs.len());
    }

    println!("\n== Speedup ==");
    match speedup(&dijkstra.0, &astar.0) {
        Some(x) => println!("Dijkstra / A* avg time speedup: {x:.2}x"),
        None => println!("A* avg time is 0; increase --trials or use a larger graph."),
    }

    Ok(())
}
