//! `rd-matrix`: N×N cost matrices assembled from tiled service calls.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`cell`]     | `MatrixCell`, `LongMatrix` (unique `(src, dst)` key)         |
//! | [`tile`]     | `Tile`, `TileGrid` - the `ceil(N/t) × ceil(N/t)` partition   |
//! | [`batcher`]  | `MatrixBatcher` - issue, re-index, and stitch tile requests  |
//! | [`observer`] | `TileObserver` progress callbacks, `NoopObserver`            |
//! | [`error`]    | `MatrixError`, `MatrixResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Tiles are requested concurrently on a Rayon pool.         |
//! | `fx-hash`  | FxHash instead of SipHash for `(src, dst)` indexes.       |
//! | `serde`    | `Serialize`/`Deserialize` on `MatrixCell`.                |

pub mod batcher;
pub mod cell;
pub mod error;
pub mod observer;
pub mod tile;


pub use batcher::{BatchOutcome, MatrixBatcher, TileFailure};
pub use cell::{LongMatrix, MatrixCell};
pub use error::{MatrixError, MatrixResult};
pub use observer::{NoopObserver, TileObserver};
pub use tile::{Tile, TileGrid};

// ── Pair index ────────────────────────────────────────────────────────────────

/// Map keyed by `(src, dst)`, shared by every crate that indexes OD pairs.
#[cfg(not(feature = "fx-hash"))]
pub type PairMap<V> = std::collections::HashMap<(rd_core::PointId, rd_core::PointId), V>;

#[cfg(feature = "fx-hash")]
pub type PairMap<V> = rustc_hash::FxHashMap<(rd_core::PointId, rd_core::PointId), V>;
