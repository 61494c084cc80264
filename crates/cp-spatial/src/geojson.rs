//! GeoJSON loader.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use cp_spatial::{LoadOptions, load_geojson};
//!
//! let graph = load_geojson(Path::new("data/campus.geojson"), &LoadOptions::default())?;
//! ```
//!
//! # What is loaded
//!
//! Only `LineString` and `MultiLineString` geometries contribute walkways.
//! Every consecutive pair of positions in a line becomes one undirected edge
//! weighted by its haversine length.  Positions are `[lon, lat]` (extra
//! elements such as altitude are ignored); node keys are `"lat,lon"`.
//!
//! A feature with missing or malformed geometry, or a line with a malformed
//! position, is skipped and counted in the [`LoadReport`].  Only an
//! unreadable file, invalid JSON, or a missing top-level `features` array
//! abort the load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, trace};
use serde_json::Value;

use cp_core::{GeoPoint, KeyPrecision};

use crate::graph::{SpatialGraph, SpatialGraphBuilder};
use crate::{SpatialError, SpatialResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Loader configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoadOptions {
    /// How coordinates are formatted into node keys.  Decides which line
    /// endpoints merge into one node.
    pub precision: KeyPrecision,
}

impl LoadOptions {
    pub fn with_precision(precision: KeyPrecision) -> Self {
        Self { precision }
    }
}

/// Counters collected while loading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadReport {
    /// Entries in the `features` array.
    pub features:         usize,
    /// Lines that contributed walkways.
    pub lines:            usize,
    /// Walkways added (each stored as two half-edges).
    pub segments:         usize,
    /// Features with no usable `geometry`, `type`, or `coordinates`, or
    /// whose single `LineString` was malformed.
    pub skipped_features: usize,
    /// Lines rejected for having fewer than two positions or a bad position.
    pub skipped_lines:    usize,
    /// Features of a geometry kind that carries no walkways.
    pub ignored_features: usize,
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Load a walking graph from a GeoJSON file.
///
/// # Errors
///
/// [`SpatialError::Open`] if the file cannot be opened,
/// [`SpatialError::Json`] if it is not valid JSON, and
/// [`SpatialError::MissingFeatures`] if there is no `features` array.
pub fn load_geojson(path: &Path, options: &LoadOptions) -> SpatialResult<SpatialGraph> {
    load_geojson_with_report(path, options).map(|(graph, _)| graph)
}

/// Like [`load_geojson`], also returning the loader counters.
pub fn load_geojson_with_report(
    path: &Path,
    options: &LoadOptions,
) -> SpatialResult<(SpatialGraph, LoadReport)> {
    let file = File::open(path).map_err(|source| SpatialError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loading walking network from {}", path.display());
    read_collection(BufReader::new(file), options)
}

/// Load from any reader producing GeoJSON text.
pub fn load_geojson_reader<R: Read>(reader: R, options: &LoadOptions) -> SpatialResult<SpatialGraph> {
    read_collection(reader, options).map(|(graph, _)| graph)
}

/// Load from an in-memory GeoJSON document.
pub fn load_geojson_str(text: &str, options: &LoadOptions) -> SpatialResult<SpatialGraph> {
    let root: Value = serde_json::from_str(text)?;
    ingest(&root, options).map(|(graph, _)| graph)
}

// ── Ingestion ─────────────────────────────────────────────────────────────────

fn read_collection<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> SpatialResult<(SpatialGraph, LoadReport)> {
    let root: Value = serde_json::from_reader(reader)?;
    ingest(&root, options)
}

pub(crate) fn ingest(root: &Value, options: &LoadOptions) -> SpatialResult<(SpatialGraph, LoadReport)> {
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or(SpatialError::MissingFeatures)?;

    let mut builder = SpatialGraphBuilder::with_precision(options.precision);
    let mut report = LoadReport { features: features.len(), ..LoadReport::default() };

    for (i, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            debug!("feature {i}: no geometry, skipped");
            report.skipped_features += 1;
            continue;
        };
        let (Some(kind), Some(coords)) = (
            geometry.get("type").and_then(Value::as_str),
            geometry.get("coordinates"),
        ) else {
            debug!("feature {i}: geometry without type or coordinates, skipped");
            report.skipped_features += 1;
            continue;
        };

        match kind {
            "LineString" => {
                if !add_line(&mut builder, coords, &mut report) {
                    debug!("feature {i}: malformed LineString, skipped");
                    report.skipped_features += 1;
                }
            }
            "MultiLineString" => {
                let Some(lines) = coords.as_array() else {
                    debug!("feature {i}: MultiLineString coordinates are not an array, skipped");
                    report.skipped_features += 1;
                    continue;
                };
                for (j, line) in lines.iter().enumerate() {
                    if !add_line(&mut builder, line, &mut report) {
                        debug!("feature {i}: line {j} of MultiLineString malformed, skipped");
                    }
                }
            }
            other => {
                trace!("feature {i}: ignoring {other} geometry");
                report.ignored_features += 1;
            }
        }
    }

    let graph = builder.build();
    info!(
        "loaded {} nodes, {} walkways from {} features ({} skipped, {} lines skipped, {} ignored)",
        graph.node_count(),
        report.segments,
        report.features,
        report.skipped_features,
        report.skipped_lines,
        report.ignored_features,
    );
    Ok((graph, report))
}

/// Add every segment of one line.  Returns `false` (adding nothing) when the
/// line is malformed.
fn add_line(builder: &mut SpatialGraphBuilder, coords: &Value, report: &mut LoadReport) -> bool {
    let Some(points) = parse_line(coords) else {
        report.skipped_lines += 1;
        return false;
    };

    report.lines += 1;
    for pair in points.windows(2) {
        let a = builder.add_node(pair[0]);
        let b = builder.add_node(pair[1]);
        if builder.add_walkway(a, b).is_some() {
            report.segments += 1;
        }
    }
    true
}

/// Parse a GeoJSON line (`[[lon, lat], ...]`) into points.  `None` if it has
/// fewer than two positions or any position is malformed.
fn parse_line(coords: &Value) -> Option<Vec<GeoPoint>> {
    let positions = coords.as_array()?;
    if positions.len() < 2 {
        return None;
    }
    positions.iter().map(parse_position).collect()
}

fn parse_position(position: &Value) -> Option<GeoPoint> {
    match position.as_array()?.as_slice() {
        [lon, lat, ..] => Some(GeoPoint::new(lat.as_f64()?, lon.as_f64()?)),
        _ => None,
    }
}
