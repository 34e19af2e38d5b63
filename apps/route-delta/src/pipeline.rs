//! Pipeline stages over the service traits.
//!
//! `main` wires these to HTTP clients; tests drive them with stubs.

use std::fmt;

use anyhow::{Context, Result};
use log::{debug, info};
use rd_core::{BatchConfig, Point, SnapConfig};
use rd_delta::{DeltaMetric, DeltaRow, DeltaSummary, DeltaTable};
use rd_matrix::{LongMatrix, MatrixBatcher, Tile, TileObserver};
use rd_service::{Locator, MatrixService};
use rd_snap::PointSnapper;

/// Logs tile progress at debug level and a one-line outcome per snapshot.
struct TileProgress<'a> {
    label: &'a str,
}

impl TileObserver for TileProgress<'_> {
    fn on_tile(&mut self, tile: &Tile, ok: bool) {
        debug!("{}: {tile} {}", self.label, if ok { "ok" } else { "failed" });
    }

    fn on_batch_end(&mut self, tiles: usize, failed: usize) {
        info!("{}: {} of {tiles} tiles succeeded", self.label, tiles - failed);
    }
}

pub fn sample_points<L: Locator + ?Sized>(locator: &L, config: &SnapConfig) -> Result<Vec<Point>> {
    let points = PointSnapper::new(locator, config.clone())?
        .generate()
        .context("sampling points")?;
    Ok(points)
}

pub fn acquire_matrix<S: MatrixService + ?Sized>(
    service: &S,
    label:   &str,
    points:  &[Point],
    batch:   &BatchConfig,
) -> Result<LongMatrix> {
    let mut progress = TileProgress { label };
    let outcome = MatrixBatcher::new(service, batch.clone())?
        .compute_detailed(points, &mut progress)
        .with_context(|| format!("acquiring {label} matrix"))?;
    info!("{label}: {} cells, {} null", outcome.matrix.len(), outcome.matrix.null_count());
    Ok(outcome.matrix)
}

/// Human-readable summary plus the signed extremes for `metric`.
pub struct Report<'t> {
    table:              &'t DeltaTable,
    metric:             DeltaMetric,
    k:                  usize,
    exclude_self_pairs: bool,
}

pub fn report(table: &DeltaTable, metric: DeltaMetric, k: usize, exclude_self_pairs: bool) -> Report<'_> {
    Report { table, metric, k, exclude_self_pairs }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metric = self.metric;
        writeln!(f, "{}", DeltaSummary::of(self.table))?;

        let mismatch = self.table.mismatch();
        if !mismatch.is_empty() {
            writeln!(
                f,
                "structural mismatch: {} pairs only in old, {} only in new",
                mismatch.only_in_old, mismatch.only_in_new
            )?;
        }

        let extremes = self.table.extremes(metric, self.k, self.exclude_self_pairs);
        for (title, rows) in [("most improved", &extremes.improved), ("most degraded", &extremes.degraded)] {
            writeln!(f, "\n{title} by {metric}:")?;
            if rows.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for row in rows {
                writeln!(f, "  {}", describe(row, metric))?;
            }
        }
        Ok(())
    }
}

/// `src -> dst: metric=+1.2345 (old -> new)`.
pub fn describe(row: &DeltaRow, metric: DeltaMetric) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_owned(), |v| format!("{v:.3}"));
    let (old, new) = match metric {
        DeltaMetric::Time => (row.time_s_old, row.time_s_new),
        DeltaMetric::Distance => (row.distance_km_old, row.distance_km_new),
    };
    let value = metric.of(row).map_or_else(|| "-".to_owned(), |v| format!("{v:+.4}"));
    format!("{:>4} -> {:<4} {metric}={value} ({} -> {})", row.src.0, row.dst.0, fmt(old), fmt(new))
}
