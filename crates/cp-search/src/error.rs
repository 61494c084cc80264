//! Search-subsystem error type.
//!
//! Queries never fail: unknown nodes and disconnected pairs are reported
//! through [`PathResult`](crate::PathResult).  Errors only arise when
//! configuring a search.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown algorithm {0:?} (expected dijkstra or astar)")]
    UnknownAlgorithm(String),
}

pub type SearchResult<T> = Result<T, SearchError>;
