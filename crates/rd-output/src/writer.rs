//! The `TableWriter` trait implemented by all backends.

use rd_core::Point;
use rd_delta::{DeltaTable, RankedRoute};
use rd_matrix::LongMatrix;

use crate::{OutputResult, RouteSummaryRow, RouteVertexRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Each method replaces whatever the backend previously held for that table.
pub trait TableWriter {
    fn write_points(&mut self, points: &[Point]) -> OutputResult<()>;

    /// Write one snapshot's matrix under `label`.
    fn write_matrix(&mut self, label: &str, matrix: &LongMatrix) -> OutputResult<()>;

    fn write_delta(&mut self, table: &DeltaTable) -> OutputResult<()>;

    /// A paired top-k listing from [`DeltaTable::with_return_routes`].
    fn write_top_k(&mut self, routes: &[RankedRoute]) -> OutputResult<()>;

    fn write_route_geometry(&mut self, vertices: &[RouteVertexRow]) -> OutputResult<()>;

    fn write_route_summaries(&mut self, routes: &[RouteSummaryRow]) -> OutputResult<()>;

    /// Flush and close underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
