//! Side-by-side route geometry for the most changed OD pairs.
//!
//! A pair is only stored when every snapshot returned a route; one failure
//! (service or polyline) skips the pair and the batch moves on.

use log::{info, warn};
use rd_core::{Point, PointId, RdError, point};
use rd_delta::{DeltaMetric, DeltaRow, DeltaTable};
use rd_output::{RouteSummaryRow, RouteVertexRow};
use rd_service::{RouteService, RouteTrip};

#[derive(Debug, Default)]
pub struct RouteComparison {
    pub vertices:  Vec<RouteVertexRow>,
    pub summaries: Vec<RouteSummaryRow>,
    /// `(src, dst, reason)` for every skipped pair.
    pub skipped:   Vec<(PointId, PointId, String)>,
}

/// The `k` largest `|metric|` rows with all four costs present, self-pairs
/// excluded.
pub fn candidates(table: &DeltaTable, metric: DeltaMetric, k: usize) -> Vec<&DeltaRow> {
    table
        .top_k(metric, table.len(), true)
        .into_iter()
        .filter(|r| r.is_complete())
        .take(k)
        .collect()
}

/// Route every pair in `rows` against each `(label, service)` snapshot.
pub fn compare_routes<R: RouteService + ?Sized>(
    snapshots: &[(&str, &R)],
    rows:      &[&DeltaRow],
    points:    &[Point],
) -> RouteComparison {
    let mut out = RouteComparison::default();

    for (i, row) in rows.iter().enumerate() {
        let rank = i + 1;
        let (a, b) = match (point::find(points, row.src), point::find(points, row.dst)) {
            (Some(a), Some(b)) => (a, b),
            (a, _) => {
                let missing = if a.is_none() { row.src } else { row.dst };
                let reason = RdError::PointNotFound(missing).to_string();
                warn!("OD {} -> {}: {reason}, skipped", row.src.0, row.dst.0);
                out.skipped.push((row.src, row.dst, reason));
                continue;
            }
        };

        let trips: Result<Vec<(&str, RouteTrip)>, String> = snapshots
            .iter()
            .map(|&(label, service)| {
                service
                    .route(a.location(), b.location())
                    .map(|trip| (label, trip))
                    .map_err(|e| format!("{label}: {e}"))
            })
            .collect();

        let trips = match trips {
            Ok(t) => t,
            Err(reason) => {
                warn!("OD {} -> {}: route failed, skipped: {reason}", row.src.0, row.dst.0);
                out.skipped.push((row.src, row.dst, reason));
                continue;
            }
        };

        for (label, trip) in trips {
            info!(
                "[{rank}/{}] OD {} -> {} {label}: {} vertices",
                rows.len(),
                row.src.0,
                row.dst.0,
                trip.geometry.len()
            );
            out.vertices.extend(trip.geometry.iter().enumerate().map(|(seq, p)| RouteVertexRow {
                rank,
                snapshot: label.to_owned(),
                src: row.src.0,
                dst: row.dst.0,
                seq,
                lat: p.lat,
                lon: p.lon,
            }));
            out.summaries.push(RouteSummaryRow {
                rank,
                snapshot:  label.to_owned(),
                src:       row.src.0,
                dst:       row.dst.0,
                time_s:    trip.time_s,
                length_km: trip.length_km,
                vertices:  trip.geometry.len(),
            });
        }
    }

    out
}
