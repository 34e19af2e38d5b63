//! `rd-snap`: generates the point set both snapshots are queried with.
//!
//! Candidates are drawn uniformly inside a bounding box from a seeded RNG,
//! snapped to the road network through a [`Locator`][rd_service::Locator],
//! and accepted only when the snapped position lies within a distance
//! tolerance of the draw.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`policy`]   | `SnapPolicy` - pure accept/reject decision                |
//! | [`attempts`] | `SnapAttempts` - bounded iterator of `Draw`s              |
//! | [`snapper`]  | `PointSnapper::generate` - collects `count` accepted points |
//! | [`error`]    | `SnapError`, `SnapResult<T>`                              |

pub mod attempts;
pub mod error;
pub mod policy;
pub mod snapper;


pub use attempts::{Draw, DrawOutcome, SnapAttempts};
pub use error::{SnapError, SnapResult};
pub use policy::{SnapDecision, SnapPolicy};
pub use snapper::PointSnapper;
