//! Service traits and the typed results they return.
//!
//! # Pluggability
//!
//! The sampler, the matrix batcher and the route comparison only see these
//! traits, so tests substitute in-memory stubs and applications can point
//! the pipeline at a different engine without touching the core.
//!
//! # Thread safety
//!
//! Implementations must be `Send + Sync`: matrix tiles may be dispatched on a
//! worker pool that shares one service handle.

use rd_core::GeoPoint;

use crate::ServiceResult;

// ── Result types ──────────────────────────────────────────────────────────────

/// What a locate call found for one input coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LocateOutcome {
    /// The nearest routable position on the network.
    Snapped(GeoPoint),
    /// The engine answered but reported no usable edge.
    NoMatch,
}

impl LocateOutcome {
    pub fn snapped(self) -> Option<GeoPoint> {
        match self {
            LocateOutcome::Snapped(p) => Some(p),
            LocateOutcome::NoMatch => None,
        }
    }
}

/// Cost of one source→target cell.  `None` means "no route", never zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cost {
    pub time_s:      Option<f64>,
    pub distance_km: Option<f64>,
}

impl Cost {
    /// A cell with no route.
    pub const NONE: Cost = Cost { time_s: None, distance_km: None };

    pub fn new(time_s: f64, distance_km: f64) -> Self {
        Self { time_s: Some(time_s), distance_km: Some(distance_km) }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.time_s.is_none() && self.distance_km.is_none()
    }
}

/// Row-major `sources × targets` grid as returned by one matrix call.
pub type CostGrid = Vec<Vec<Cost>>;

/// A single routed trip with its decoded geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteTrip {
    pub geometry:  Vec<GeoPoint>,
    pub time_s:    Option<f64>,
    pub length_km: Option<f64>,
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// Nearest-edge lookup.
pub trait Locator: Send + Sync {
    /// Snap `at` to the network.
    ///
    /// An engine answer without a usable edge is `Ok(NoMatch)`, not an error.
    fn locate(&self, at: GeoPoint) -> ServiceResult<LocateOutcome>;
}

/// Many-to-many cost matrix.
pub trait MatrixService: Send + Sync {
    /// Costs from every source to every target, `sources.len()` rows of
    /// `targets.len()` cells each.
    fn matrix(&self, sources: &[GeoPoint], targets: &[GeoPoint]) -> ServiceResult<CostGrid>;
}

/// Point-to-point routing with geometry.
pub trait RouteService: Send + Sync {
    fn route(&self, from: GeoPoint, to: GeoPoint) -> ServiceResult<RouteTrip>;
}
