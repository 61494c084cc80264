//! route — one shortest walking path over a GeoJSON campus network.
//!
//! Endpoints are given either as node keys (`"lat,lon"` exactly as the loader
//! formats them) or as raw coordinates that are snapped to the nearest node.
//!
//! Run with:
//!   cargo run -p route -- --graph demos/data/campus.geojson \
//!       --from-coord 34.0689,-118.4452 --to-coord 34.0707,-118.4444 --algorithm astar

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use log::info;

use cp_core::{GeoPoint, KeyPrecision};
use cp_search::{Algorithm, PathFinder, SearchStrategy};
use cp_spatial::{LoadOptions, SpatialGraph, load_geojson};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "route", about = "Shortest walking path between two campus nodes")]
struct Args {
    /// GeoJSON file with LineString / MultiLineString walkways.
    #[arg(long, default_value = "demos/data/campus.geojson")]
    graph: PathBuf,

    /// Start node key, e.g. "34.0689,-118.4452".
    #[arg(long, conflicts_with = "from_coord", required_unless_present = "from_coord")]
    from: Option<String>,

    /// Start coordinate "lat,lon", snapped to the nearest node.
    #[arg(long, value_parser = parse_coord)]
    from_coord: Option<GeoPoint>,

    /// End node key.
    #[arg(long, conflicts_with = "to_coord", required_unless_present = "to_coord")]
    to: Option<String>,

    /// End coordinate "lat,lon", snapped to the nearest node.
    #[arg(long, value_parser = parse_coord)]
    to_coord: Option<GeoPoint>,

    /// dijkstra or astar.
    #[arg(long, default_value_t = Algorithm::Dijkstra)]
    algorithm: Algorithm,

    /// Node key precision: "shortest" or "fixed:<decimals>".
    #[arg(long, default_value_t = KeyPrecision::Shortest)]
    precision: KeyPrecision,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_coord(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude {lon:?}: {e}"))?;
    Ok(GeoPoint::new(lat, lon))
}

/// Resolve an endpoint given as a key or a coordinate.
fn endpoint(graph: &SpatialGraph, key: Option<String>, coord: Option<GeoPoint>, which: &str) -> Result<String> {
    match (key, coord) {
        (Some(key), _) => Ok(key),
        (None, Some(pos)) => {
            let key = graph
                .nearest_node(pos)
                .ok_or_else(|| anyhow!("cannot snap {which} {pos}: graph has no nodes"))?;
            info!("{which} {pos} snapped to {key}");
            Ok(key.to_string())
        }
        (None, None) => bail!("no {which} given"),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = LoadOptions::with_precision(args.precision);
    let graph = load_geojson(&args.graph, &options)
        .with_context(|| format!("loading {}", args.graph.display()))?;
    info!("graph: {} nodes, {} half-edges", graph.node_count(), graph.edge_count());

    let start = endpoint(&graph, args.from, args.from_coord, "start")?;
    let end = endpoint(&graph, args.to, args.to_coord, "end")?;

    let mut finder = PathFinder::new(&graph, args.algorithm);
    let result = finder.compute_path(&start, &end);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} from {start} to {end}", finder.strategy().name());
    if result.reachable {
        println!("  path     : {result}");
        println!("  nodes    : {}", result.path.len());
        println!("  distance : {:.1} m", result.weight);
    } else {
        println!("  {result}");
    }
    println!("  elapsed  : {:.4} ms", result.elapsed_ms);
    println!("  settled  : {} nodes", finder.state().settled_count());

    Ok(())
}
