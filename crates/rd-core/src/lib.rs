//! `rd-core`: foundational types for the `route-delta` workspace.
//!
//! This crate is a dependency of every other `rd-*` crate.  It has no `rd-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `PointId`                                                  |
//! | [`geo`]      | `GeoPoint`, `BBox`, haversine distance                     |
//! | [`point`]    | `Point` - an accepted, network-snapped sample location     |
//! | [`rng`]      | `SampleRng` (seeded, deterministic)                        |
//! | [`config`]   | `PipelineConfig` and the per-component config structs      |
//! | [`error`]    | `RdError`, `RdResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, points and configs. |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod point;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BatchConfig, PipelineConfig, ServiceConfig, SnapConfig, SnapshotConfig, Timeouts};
pub use error::{RdError, RdResult};
pub use geo::{BBox, GeoPoint};
pub use ids::PointId;
pub use point::Point;
pub use rng::SampleRng;
