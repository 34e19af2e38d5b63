//! Geographic coordinate types and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Encoded polylines carry six
//! decimal digits (~0.1 m), which `f32` cannot represent away from the
//! equator, so the whole workspace stays in double precision.

use crate::{RdError, RdResult};

/// Mean Earth radius used by every distance computation, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── BBox ──────────────────────────────────────────────────────────────────────

/// Axis-aligned lat/lon rectangle, inclusive on all four edges.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    /// `true` if `p` lies inside or on the edge of the box.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lon..=self.max_lon).contains(&p.lon)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) * 0.5,
            (self.min_lon + self.max_lon) * 0.5,
        )
    }

    /// Reject boxes that are inverted, non-finite, or outside WGS-84 range.
    pub fn validate(&self) -> RdResult<()> {
        let all = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(RdError::Config(format!("bounding box has non-finite bounds: {self}")));
        }
        if self.min_lat > self.max_lat || self.min_lon > self.max_lon {
            return Err(RdError::Config(format!("bounding box is inverted: {self}")));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 || self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(RdError::Config(format!("bounding box exceeds WGS-84 range: {self}")));
        }
        Ok(())
    }
}

impl Default for BBox {
    /// Ho Chi Minh City metropolitan area.
    fn default() -> Self {
        Self::new(106.55, 10.62, 106.90, 10.95)
    }
}

impl std::fmt::Display for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

impl std::str::FromStr for BBox {
    type Err = RdError;

    /// Parse `min_lon,min_lat,max_lon,max_lat` (the osmium order).
    fn from_str(s: &str) -> RdResult<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| RdError::Parse(format!("invalid bbox {s:?}: {e}")))?;

        let [min_lon, min_lat, max_lon, max_lat] = parts[..] else {
            return Err(RdError::Parse(format!(
                "invalid bbox {s:?}: expected min_lon,min_lat,max_lon,max_lat"
            )));
        };
        let bbox = BBox::new(min_lon, min_lat, max_lon, max_lat);
        bbox.validate()?;
        Ok(bbox)
    }
}
