//! The sampled point set shared by both snapshot computations.

use crate::{GeoPoint, PointId};

/// One accepted sample location.
///
/// `lat`/`lon` are the network-snapped coordinates, not the raw random draw,
/// so both routing engines receive a location that is already on a road.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub id:              PointId,
    pub lat:             f64,
    pub lon:             f64,
    /// Great-circle distance between the random draw and its snapped position.
    pub snap_distance_m: f64,
}

impl Point {
    pub fn new(id: PointId, at: GeoPoint, snap_distance_m: f64) -> Self {
        Self { id, lat: at.lat, lon: at.lon, snap_distance_m }
    }

    #[inline]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Find a point by id in an ordered point list.
pub fn find(points: &[Point], id: PointId) -> Option<&Point> {
    points.iter().find(|p| p.id == id)
}
