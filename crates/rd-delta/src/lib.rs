//! `rd-delta`: compares two snapshots' matrices pair by pair.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`row`]     | `DeltaRow`, null-safe difference and percentage               |
//! | [`metric`]  | `DeltaMetric` (`delta_time_s`, `delta_distance_km`)           |
//! | [`merge`]   | `merge` inner join, `DeltaTable`, `StructuralMismatch`        |
//! | [`rank`]    | top-k by magnitude, signed extremes, return-route pairing     |
//! | [`summary`] | `DeltaSummary` null counts, means and medians                 |
//! | [`error`]   | `DeltaError`, `DeltaResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the `(src, dst)` index.    |
//! | `serde`   | `Serialize`/`Deserialize` on `DeltaRow`.                 |

pub mod error;
pub mod merge;
pub mod metric;
pub mod rank;
pub mod row;
pub mod summary;


pub use error::{DeltaError, DeltaResult};
pub use merge::{DeltaTable, StructuralMismatch, merge};
pub use metric::DeltaMetric;
pub use rank::{Extremes, RankedRoute, RouteType};
pub use row::DeltaRow;
pub use summary::DeltaSummary;
