//! Acceptance policy, independent of any I/O.

use rd_core::GeoPoint;
use rd_service::LocateOutcome;

/// Verdict on one candidate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SnapDecision {
    Accept { snapped: GeoPoint, distance_m: f64 },
    TooFar { snapped: GeoPoint, distance_m: f64 },
    NoMatch,
}

impl SnapDecision {
    #[inline]
    pub fn is_accept(&self) -> bool {
        matches!(self, SnapDecision::Accept { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapPolicy {
    pub max_snap_distance_m: f64,
}

impl SnapPolicy {
    pub fn new(max_snap_distance_m: f64) -> Self {
        Self { max_snap_distance_m }
    }

    /// Accept iff the haversine distance from `candidate` to its snapped
    /// position is at most the tolerance (inclusive).
    pub fn evaluate(&self, candidate: GeoPoint, outcome: LocateOutcome) -> SnapDecision {
        let Some(snapped) = outcome.snapped() else {
            return SnapDecision::NoMatch;
        };
        let distance_m = candidate.distance_m(snapped);
        if distance_m <= self.max_snap_distance_m {
            SnapDecision::Accept { snapped, distance_m }
        } else {
            SnapDecision::TooFar { snapped, distance_m }
        }
    }
}
