//! Ranking queries over a [`DeltaTable`].
//!
//! Rows whose metric is `None` never rank.  Sorting is stable, so ties keep
//! table order.

use std::cmp::Ordering;
use std::fmt;

use rd_core::PointId;

use crate::{DeltaMetric, DeltaRow, DeltaTable};

/// Role of a row in a paired top-k listing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteType {
    Original,
    /// The reverse trip `(dst, src)` of the preceding original.
    Return,
    /// The reverse trip is not in the table.
    ReturnMissing,
}

impl RouteType {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteType::Original => "original",
            RouteType::Return => "return",
            RouteType::ReturnMissing => "return (not found)",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(RouteType::Original),
            "return" => Ok(RouteType::Return),
            "return (not found)" => Ok(RouteType::ReturnMissing),
            other => Err(format!("unknown route type {other:?}")),
        }
    }
}

/// One line of a paired listing.  `row` is `None` for a missing return.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RankedRoute {
    pub route_type: RouteType,
    pub src:        PointId,
    pub dst:        PointId,
    pub row:        Option<DeltaRow>,
}

/// Most improved (most negative) and most degraded (most positive) rows.
#[derive(Clone, Debug, Default)]
pub struct Extremes<'t> {
    pub improved: Vec<&'t DeltaRow>,
    pub degraded: Vec<&'t DeltaRow>,
}

impl DeltaTable {
    fn ranked<'t>(
        &'t self,
        metric:             DeltaMetric,
        exclude_self_pairs: bool,
    ) -> impl Iterator<Item = (&'t DeltaRow, f64)> + 't {
        self.iter()
            .filter(move |r| !(exclude_self_pairs && r.is_self_pair()))
            .filter_map(move |r| metric.of(r).map(|v| (r, v)))
    }

    /// The `k` rows with the largest `|metric|`.
    pub fn top_k(&self, metric: DeltaMetric, k: usize, exclude_self_pairs: bool) -> Vec<&DeltaRow> {
        let mut rows: Vec<_> = self.ranked(metric, exclude_self_pairs).collect();
        rows.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        rows.into_iter().take(k).map(|(r, _)| r).collect()
    }

    /// The `k` most negative and `k` most positive values of `metric`.
    ///
    /// Zero changes appear in neither list.
    pub fn extremes(&self, metric: DeltaMetric, k: usize, exclude_self_pairs: bool) -> Extremes<'_> {
        let rows: Vec<_> = self.ranked(metric, exclude_self_pairs).collect();

        let pick = |keep: fn(f64) -> bool, order: fn(f64, f64) -> Ordering| {
            let mut side: Vec<_> = rows.iter().filter(|(_, v)| keep(*v)).copied().collect();
            side.sort_by(|a, b| order(a.1, b.1));
            side.into_iter().take(k).map(|(r, _)| r).collect::<Vec<_>>()
        };

        Extremes {
            improved: pick(|v| v < 0.0, |a, b| a.total_cmp(&b)),
            degraded: pick(|v| v > 0.0, |a, b| b.total_cmp(&a)),
        }
    }

    /// Follow every selected row with its reverse trip, or a
    /// [`RouteType::ReturnMissing`] placeholder.
    pub fn with_return_routes(&self, selected: &[&DeltaRow]) -> Vec<RankedRoute> {
        let mut out = Vec::with_capacity(selected.len() * 2);
        for row in selected {
            out.push(RankedRoute { route_type: RouteType::Original, src: row.src, dst: row.dst, row: Some(**row) });
            let back = self.get(row.dst, row.src).copied();
            out.push(RankedRoute {
                route_type: if back.is_some() { RouteType::Return } else { RouteType::ReturnMissing },
                src:        row.dst,
                dst:        row.src,
                row:        back,
            });
        }
        out
    }
}
