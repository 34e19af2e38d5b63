//! Deterministic sampling RNG.
//!
//! The point sampler draws every candidate from a single `SmallRng` seeded
//! from the run's seed, so a fixed seed reproduces the same candidate
//! sequence regardless of how many candidates the routing engine rejects.
//! Only the number of draws varies between runs against different engines.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{BBox, GeoPoint};

/// Seeded RNG for candidate generation.
///
/// Used only from the single-threaded sampling loop.
pub struct SampleRng(SmallRng);

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        SampleRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform point inside `bbox` (latitude drawn first).
    ///
    /// Degenerate boxes (zero width or height) are allowed and always
    /// return the fixed coordinate on that axis.
    pub fn point_in(&mut self, bbox: &BBox) -> GeoPoint {
        let lat = self.0.gen_range(bbox.min_lat..=bbox.max_lat);
        let lon = self.0.gen_range(bbox.min_lon..=bbox.max_lon);
        GeoPoint::new(lat, lon)
    }
}
