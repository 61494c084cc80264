//! `cp-spatial` — pedestrian network graph, GeoJSON ingestion, and snapping.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`graph`]   | `SpatialGraph` (CSR + R-tree), `SpatialGraphBuilder`, `NodeLocation` |
//! | [`geojson`] | `load_geojson*`, `LoadOptions`, `LoadReport`                  |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod geojson;
pub mod graph;


pub use error::{SpatialError, SpatialResult};
pub use geojson::{
    LoadOptions, LoadReport, load_geojson, load_geojson_reader, load_geojson_str,
    load_geojson_with_report,
};
pub use graph::{Neighbors, NodeLocation, SpatialGraph, SpatialGraphBuilder};
