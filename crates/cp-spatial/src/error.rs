//! Spatial-subsystem error type.
//!
//! Only whole-file problems are errors.  Individual malformed features are
//! skipped by the loader and counted in its [`LoadReport`](crate::LoadReport).

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by `cp-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("could not open {}: {source}", path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid GeoJSON: missing 'features' array")]
    MissingFeatures,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
