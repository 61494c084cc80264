//! `cp-search` — shortest walking paths over a [`SpatialGraph`].
//!
//! Two interchangeable strategies share one explicit working state:
//!
//! | Strategy              | Frontier priority                          |
//! |-----------------------|--------------------------------------------|
//! | [`UniformCostSearch`] | accumulated cost (Dijkstra)                |
//! | [`HeuristicSearch`]   | accumulated cost + great-circle estimate (A*) |
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`state`]    | `SearchState`, `FrontierEntry`, path reconstruction      |
//! | [`result`]   | `PathResult`, `Unreachable`                              |
//! | [`strategy`] | `SearchStrategy` trait, `Algorithm`, `PathFinder`        |
//! | [`dijkstra`] | `UniformCostSearch`                                      |
//! | [`astar`]    | `HeuristicSearch`                                        |
//! | [`error`]    | `SearchError`, `SearchResult<T>`                         |
//!
//! # Threading
//!
//! Strategies are stateless and `Send + Sync`; all mutable bookkeeping lives
//! in a [`SearchState`].  Run concurrent queries with one state (or one
//! [`PathFinder`]) per thread over a shared `&SpatialGraph`.
//!
//! [`SpatialGraph`]: cp_spatial::SpatialGraph

pub mod astar;
pub mod dijkstra;
pub mod error;
pub mod result;
pub mod state;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use astar::HeuristicSearch;
pub use dijkstra::UniformCostSearch;
pub use error::{SearchError, SearchResult};
pub use result::{PathResult, Unreachable};
pub use state::{FrontierEntry, SearchState};
pub use strategy::{Algorithm, PathFinder, SearchStrategy};
