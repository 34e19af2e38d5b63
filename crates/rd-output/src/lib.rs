//! `rd-output`: persisted tables of the route-delta pipeline.
//!
//! | Feature   | Backend | Files created                                               |
//! |-----------|---------|-------------------------------------------------------------|
//! | *(none)*  | CSV     | `points.csv`, `matrix_<label>.csv`, `matrix_delta.csv`, `top_k_routes.csv`, `route_geometry.csv`, `route_summary.csv` |
//! | `sqlite`  | SQLite  | `route_delta.db`                                            |
//!
//! Both backends implement [`TableWriter`].  Every write replaces the
//! previous contents of its table; nothing is appended across runs.
//!
//! The CSV tables can be read back with the functions in [`reader`], so each
//! pipeline stage can run as a separate command.  Missing values are empty
//! fields.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rd_output::{CsvWriter, TableWriter};
//!
//! let mut out = CsvWriter::new(Path::new("./out"))?;
//! out.write_points(&points)?;
//! out.write_matrix("2025", &matrix)?;
//! out.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod reader;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use reader::{
    read_delta, read_delta_reader, read_matrix, read_matrix_reader, read_points, read_points_reader,
};
pub use row::{DeltaRecord, MatrixRecord, PointRecord, RouteSummaryRow, RouteVertexRow, TopKRecord};
pub use writer::TableWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

// ── File names ────────────────────────────────────────────────────────────────

pub const POINTS_CSV: &str = "points.csv";
pub const DELTA_CSV: &str = "matrix_delta.csv";
pub const TOP_K_CSV: &str = "top_k_routes.csv";
pub const ROUTE_GEOMETRY_CSV: &str = "route_geometry.csv";
pub const ROUTE_SUMMARY_CSV: &str = "route_summary.csv";
pub const SQLITE_DB: &str = "route_delta.db";

/// `matrix_<label>.csv`.
pub fn matrix_csv(label: &str) -> String {
    format!("matrix_{label}.csv")
}
