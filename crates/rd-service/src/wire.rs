//! JSON request bodies and response decoding.
//!
//! Engines disagree on response shapes depending on version and wrapper.
//! Each response is modelled as an untagged enum whose variants are tried in
//! declaration order, which fixes the resolution priority; the result is
//! then reduced to one of the typed values in [`crate::service`].

use rd_core::GeoPoint;
use rd_polyline::PolylineResult;
use serde::{Deserialize, Serialize};

use crate::service::{Cost, CostGrid, LocateOutcome};

// ── Requests ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone, Copy)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<GeoPoint> for LatLon {
    fn from(p: GeoPoint) -> Self {
        Self { lat: p.lat, lon: p.lon }
    }
}

fn lat_lons(points: &[GeoPoint]) -> Vec<LatLon> {
    points.iter().copied().map(LatLon::from).collect()
}

#[derive(Serialize, Debug)]
pub struct LocateRequest {
    pub locations: Vec<LatLon>,
}

impl LocateRequest {
    pub fn single(at: GeoPoint) -> Self {
        Self { locations: vec![at.into()] }
    }
}

#[derive(Serialize, Debug)]
pub struct MatrixRequest<'a> {
    pub sources: Vec<LatLon>,
    pub targets: Vec<LatLon>,
    pub costing: &'a str,
    /// Only sent to generic `/matrix` wrappers that dispatch on an action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action:  Option<&'static str>,
}

impl<'a> MatrixRequest<'a> {
    pub fn new(sources: &[GeoPoint], targets: &[GeoPoint], costing: &'a str) -> Self {
        Self { sources: lat_lons(sources), targets: lat_lons(targets), costing, action: None }
    }
}

#[derive(Serialize, Debug)]
pub struct DirectionsOptions {
    pub units: &'static str,
}

#[derive(Serialize, Debug)]
pub struct RouteRequest<'a> {
    pub locations:          Vec<LatLon>,
    pub costing:            &'a str,
    pub directions_options: DirectionsOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_format:       Option<&'static str>,
}

impl<'a> RouteRequest<'a> {
    pub fn new(from: GeoPoint, to: GeoPoint, costing: &'a str, shape_format: Option<&'static str>) -> Self {
        Self {
            locations: vec![from.into(), to.into()],
            costing,
            directions_options: DirectionsOptions { units: "kilometers" },
            shape_format,
        }
    }
}

// ── Locate ────────────────────────────────────────────────────────────────────

/// `/locate` answer: a bare list, a `{locations: [...]}` wrapper, or a single
/// location object.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum LocateResponse {
    List(Vec<LocatedPoint>),
    Wrapped { locations: Vec<LocatedPoint> },
    Single(LocatedPoint),
}

#[derive(Deserialize, Debug, Default)]
pub struct LocatedPoint {
    #[serde(default)]
    pub edges: Option<Vec<LocatedEdge>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LocatedEdge {
    #[serde(default)]
    pub correlated_lat: Option<f64>,
    #[serde(default)]
    pub correlated_lon: Option<f64>,
    #[serde(default)]
    pub projected:      Option<Projected>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Projected {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LocatedEdge {
    /// `correlated_lat/lon` first, then `projected.{lat,lon}`.
    pub fn snapped(&self) -> Option<GeoPoint> {
        let correlated = self.correlated_lat.zip(self.correlated_lon);
        let projected = self.projected.as_ref().and_then(|p| p.lat.zip(p.lon));
        correlated
            .or(projected)
            .filter(|(lat, lon)| lat.is_finite() && lon.is_finite())
            .map(|(lat, lon)| GeoPoint::new(lat, lon))
    }
}

impl LocateResponse {
    fn first(&self) -> Option<&LocatedPoint> {
        match self {
            LocateResponse::List(list) | LocateResponse::Wrapped { locations: list } => list.first(),
            LocateResponse::Single(point) => Some(point),
        }
    }

    /// Snapped position of the first edge of the first location.
    pub fn outcome(&self) -> LocateOutcome {
        self.first()
            .and_then(|loc| loc.edges.as_deref())
            .and_then(<[LocatedEdge]>::first)
            .and_then(LocatedEdge::snapped)
            .map_or(LocateOutcome::NoMatch, LocateOutcome::Snapped)
    }
}

// ── Matrix ────────────────────────────────────────────────────────────────────

/// One cell of a verbose matrix answer; `null` cells decode as `None`.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct WireCell {
    #[serde(default)]
    pub time:     Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Column-oriented matrix answer emitted by newer engines.
#[derive(Deserialize, Debug)]
pub struct ConciseMatrix {
    pub durations: Vec<Vec<Option<f64>>>,
    pub distances: Vec<Vec<Option<f64>>>,
}

/// Matrix answer, in resolution order: wrapped verbose cells, wrapped
/// concise arrays, bare verbose cells.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum MatrixResponse {
    Wrapped { sources_to_targets: Vec<Vec<Option<WireCell>>> },
    Concise { sources_to_targets: ConciseMatrix },
    Bare(Vec<Vec<Option<WireCell>>>),
}

impl MatrixResponse {
    /// Flatten into a [`CostGrid`].  Fails only when the concise arrays
    /// disagree on their dimensions.
    pub fn into_grid(self) -> Result<CostGrid, String> {
        match self {
            MatrixResponse::Wrapped { sources_to_targets: rows } | MatrixResponse::Bare(rows) => Ok(rows
                .into_iter()
                .map(|row| row.into_iter().map(Cost::from).collect())
                .collect()),
            MatrixResponse::Concise { sources_to_targets: m } => {
                if m.durations.len() != m.distances.len() {
                    return Err(format!(
                        "durations has {} rows but distances has {}",
                        m.durations.len(),
                        m.distances.len()
                    ));
                }
                m.durations
                    .into_iter()
                    .zip(m.distances)
                    .enumerate()
                    .map(|(i, (times, dists))| {
                        if times.len() != dists.len() {
                            return Err(format!(
                                "row {i}: {} durations but {} distances",
                                times.len(),
                                dists.len()
                            ));
                        }
                        Ok(times
                            .into_iter()
                            .zip(dists)
                            .map(|(time_s, distance_km)| Cost { time_s, distance_km })
                            .collect())
                    })
                    .collect()
            }
        }
    }
}

impl From<Option<WireCell>> for Cost {
    fn from(cell: Option<WireCell>) -> Self {
        cell.map_or(Cost::NONE, |c| Cost { time_s: c.time, distance_km: c.distance })
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
pub struct RouteResponse {
    pub trip: Trip,
}

#[derive(Deserialize, Debug)]
pub struct Trip {
    #[serde(default)]
    pub legs:    Vec<Leg>,
    #[serde(default)]
    pub summary: TripSummary,
}

#[derive(Deserialize, Debug)]
pub struct Leg {
    #[serde(default)]
    pub shape: Option<Shape>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TripSummary {
    #[serde(default)]
    pub time:   Option<f64>,
    /// Kilometres when requested with `units: kilometers`.
    #[serde(default)]
    pub length: Option<f64>,
}

/// Leg geometry: an encoded polyline, GeoJSON `[lon, lat]` coordinates, or
/// anything else (which triggers a retry in the client).
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Shape {
    Encoded(String),
    GeoJson { coordinates: Vec<[f64; 2]> },
    Other(serde_json::Value),
}

impl Shape {
    /// Decoded `(lat, lon)` geometry, or `Ok(None)` for unsupported shapes.
    pub fn geometry(&self, precision: u32) -> PolylineResult<Option<Vec<GeoPoint>>> {
        match self {
            Shape::Encoded(s) => rd_polyline::decode(s, precision).map(Some),
            Shape::GeoJson { coordinates } => Ok(Some(
                coordinates.iter().map(|&[lon, lat]| GeoPoint::new(lat, lon)).collect(),
            )),
            Shape::Other(_) => Ok(None),
        }
    }
}

impl RouteResponse {
    pub fn first_shape(&self) -> Option<&Shape> {
        self.trip.legs.first().and_then(|leg| leg.shape.as_ref())
    }
}
