//! `cp-core` — foundational types for the `campus_paths` walking router.
//!
//! This crate is a dependency of every other `cp-*` crate.  It has no `cp-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`geo`]   | `GeoPoint`, haversine distance                            |
//! | [`ids`]   | `NodeId` dense index                                      |
//! | [`key`]   | `NodeKey` textual node identity, `KeyPrecision`           |
//! | [`error`] | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod key;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint, haversine_m};
pub use ids::NodeId;
pub use key::{KeyPrecision, NodeKey};
