//! Flat record types, one per table, in column order.
//!
//! Ids are plain `u32` so the CSV shows `7`, not `PointId(7)`.  `Option`
//! fields serialise as empty cells.

use rd_core::{GeoPoint, Point, PointId};
use rd_delta::{DeltaRow, RankedRoute};
use rd_matrix::MatrixCell;
use serde::{Deserialize, Serialize};

// ── points.csv ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id:     u32,
    pub lat:    f64,
    pub lon:    f64,
    /// Absent in hand-made point files.
    #[serde(default)]
    pub snap_m: Option<f64>,
}

impl From<&Point> for PointRecord {
    fn from(p: &Point) -> Self {
        Self { id: p.id.0, lat: p.lat, lon: p.lon, snap_m: Some(p.snap_distance_m) }
    }
}

impl From<PointRecord> for Point {
    fn from(r: PointRecord) -> Self {
        Point::new(PointId(r.id), GeoPoint::new(r.lat, r.lon), r.snap_m.unwrap_or(0.0))
    }
}

// ── matrix_<label>.csv ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixRecord {
    pub src:         u32,
    pub dst:         u32,
    pub time_s:      Option<f64>,
    pub distance_km: Option<f64>,
}

impl From<&MatrixCell> for MatrixRecord {
    fn from(c: &MatrixCell) -> Self {
        Self { src: c.src.0, dst: c.dst.0, time_s: c.time_s, distance_km: c.distance_km }
    }
}

impl From<MatrixRecord> for MatrixCell {
    fn from(r: MatrixRecord) -> Self {
        MatrixCell { src: PointId(r.src), dst: PointId(r.dst), time_s: r.time_s, distance_km: r.distance_km }
    }
}

// ── matrix_delta.csv ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub src:               u32,
    pub dst:               u32,
    pub time_s_old:        Option<f64>,
    pub time_s_new:        Option<f64>,
    pub delta_time_s:      Option<f64>,
    pub distance_km_old:   Option<f64>,
    pub distance_km_new:   Option<f64>,
    pub delta_distance_km: Option<f64>,
    pub pct_time:          Option<f64>,
    pub pct_distance:      Option<f64>,
}

impl From<&DeltaRow> for DeltaRecord {
    fn from(r: &DeltaRow) -> Self {
        Self {
            src:               r.src.0,
            dst:               r.dst.0,
            time_s_old:        r.time_s_old,
            time_s_new:        r.time_s_new,
            delta_time_s:      r.delta_time_s,
            distance_km_old:   r.distance_km_old,
            distance_km_new:   r.distance_km_new,
            delta_distance_km: r.delta_distance_km,
            pct_time:          r.pct_time,
            pct_distance:      r.pct_distance,
        }
    }
}

impl From<DeltaRecord> for DeltaRow {
    fn from(r: DeltaRecord) -> Self {
        DeltaRow {
            src:               PointId(r.src),
            dst:               PointId(r.dst),
            time_s_old:        r.time_s_old,
            time_s_new:        r.time_s_new,
            delta_time_s:      r.delta_time_s,
            distance_km_old:   r.distance_km_old,
            distance_km_new:   r.distance_km_new,
            delta_distance_km: r.delta_distance_km,
            pct_time:          r.pct_time,
            pct_distance:      r.pct_distance,
        }
    }
}

// ── top_k_routes.csv ──────────────────────────────────────────────────────────

/// `route_type, src, dst` followed by the delta columns, which are empty for
/// a missing return route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKRecord {
    pub route_type:        String,
    pub src:               u32,
    pub dst:               u32,
    pub time_s_old:        Option<f64>,
    pub time_s_new:        Option<f64>,
    pub delta_time_s:      Option<f64>,
    pub distance_km_old:   Option<f64>,
    pub distance_km_new:   Option<f64>,
    pub delta_distance_km: Option<f64>,
    pub pct_time:          Option<f64>,
    pub pct_distance:      Option<f64>,
}

impl From<&RankedRoute> for TopKRecord {
    fn from(r: &RankedRoute) -> Self {
        let d = r.row.as_ref();
        Self {
            route_type:        r.route_type.to_string(),
            src:               r.src.0,
            dst:               r.dst.0,
            time_s_old:        d.and_then(|d| d.time_s_old),
            time_s_new:        d.and_then(|d| d.time_s_new),
            delta_time_s:      d.and_then(|d| d.delta_time_s),
            distance_km_old:   d.and_then(|d| d.distance_km_old),
            distance_km_new:   d.and_then(|d| d.distance_km_new),
            delta_distance_km: d.and_then(|d| d.delta_distance_km),
            pct_time:          d.and_then(|d| d.pct_time),
            pct_distance:      d.and_then(|d| d.pct_distance),
        }
    }
}

// ── route_geometry.csv / route_summary.csv ────────────────────────────────────

/// One vertex of one snapshot's route for a ranked OD pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteVertexRow {
    /// 1-based position of the OD pair in the ranking.
    pub rank:     usize,
    pub snapshot: String,
    pub src:      u32,
    pub dst:      u32,
    pub seq:      usize,
    pub lat:      f64,
    pub lon:      f64,
}

/// Engine-reported totals for one fetched route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummaryRow {
    pub rank:      usize,
    pub snapshot:  String,
    pub src:       u32,
    pub dst:       u32,
    pub time_s:    Option<f64>,
    pub length_km: Option<f64>,
    pub vertices:  usize,
}
