//! One joined OD pair.

use rd_core::PointId;
use rd_matrix::MatrixCell;

/// Old and new cost of one OD pair plus the derived change.
///
/// Every derived field is `None` when an operand is `None`; percentages are
/// also `None` when the old value is zero.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaRow {
    pub src:               PointId,
    pub dst:               PointId,
    pub time_s_old:        Option<f64>,
    pub time_s_new:        Option<f64>,
    pub delta_time_s:      Option<f64>,
    pub distance_km_old:   Option<f64>,
    pub distance_km_new:   Option<f64>,
    pub delta_distance_km: Option<f64>,
    /// `delta / old × 100`.
    pub pct_time:          Option<f64>,
    pub pct_distance:      Option<f64>,
}

impl DeltaRow {
    /// Derive a row from the same pair in both snapshots.
    pub fn from_cells(old: &MatrixCell, new: &MatrixCell) -> Self {
        Self::new(old.src, old.dst, (old.time_s, new.time_s), (old.distance_km, new.distance_km))
    }

    /// `time` and `distance` are `(old, new)` pairs.
    pub fn new(
        src:      PointId,
        dst:      PointId,
        time:     (Option<f64>, Option<f64>),
        distance: (Option<f64>, Option<f64>),
    ) -> Self {
        Self {
            src,
            dst,
            time_s_old:        time.0,
            time_s_new:        time.1,
            delta_time_s:      diff(time.0, time.1),
            distance_km_old:   distance.0,
            distance_km_new:   distance.1,
            delta_distance_km: diff(distance.0, distance.1),
            pct_time:          pct(time.0, time.1),
            pct_distance:      pct(distance.0, distance.1),
        }
    }

    #[inline]
    pub fn key(&self) -> (PointId, PointId) {
        (self.src, self.dst)
    }

    #[inline]
    pub fn is_self_pair(&self) -> bool {
        self.src == self.dst
    }

    /// Both snapshots have both time and distance.
    pub fn is_complete(&self) -> bool {
        self.time_s_old.is_some()
            && self.time_s_new.is_some()
            && self.distance_km_old.is_some()
            && self.distance_km_new.is_some()
    }
}

/// `new - old`, or `None` if either is missing or not finite.
pub fn diff(old: Option<f64>, new: Option<f64>) -> Option<f64> {
    let d = new? - old?;
    d.is_finite().then_some(d)
}

/// Percentage change relative to `old`.
pub fn pct(old: Option<f64>, new: Option<f64>) -> Option<f64> {
    let old = old.filter(|&v| v != 0.0)?;
    let p = diff(Some(old), new)? / old * 100.0;
    p.is_finite().then_some(p)
}
