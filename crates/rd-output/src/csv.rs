//! CSV output backend.
//!
//! Each table is written to its own file in the output directory.  Files are
//! truncated and rewritten on every call.

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::debug;
use serde::Serialize;

use rd_core::Point;
use rd_delta::{DeltaTable, RankedRoute};
use rd_matrix::LongMatrix;

use crate::row::{DeltaRecord, MatrixRecord, PointRecord, TopKRecord};
use crate::writer::TableWriter;
use crate::{
    DELTA_CSV, OutputError, OutputResult, POINTS_CSV, ROUTE_GEOMETRY_CSV, ROUTE_SUMMARY_CSV, RouteSummaryRow,
    RouteVertexRow, TOP_K_CSV, matrix_csv,
};

/// Writes every table as a CSV file under one directory.
pub struct CsvWriter {
    dir:     PathBuf,
    written: Vec<PathBuf>,
}

impl CsvWriter {
    /// Use `dir` for output, creating it if needed.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), written: Vec::new() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_table<R: Serialize>(&mut self, file: &str, records: impl IntoIterator<Item = R>) -> OutputResult<()> {
        let path = self.dir.join(file);
        let mut w = Writer::from_path(&path)?;
        let mut n = 0usize;
        for record in records {
            w.serialize(record)?;
            n += 1;
        }
        w.flush()?;
        debug!("wrote {n} rows to {}", path.display());
        if !self.written.contains(&path) {
            self.written.push(path);
        }
        Ok(())
    }

    /// Header-only CSV for an empty table (serde writes headers lazily).
    fn write_header(&mut self, file: &str, header: &[&str]) -> OutputResult<()> {
        let path = self.dir.join(file);
        let mut w = Writer::from_path(&path)?;
        w.write_record(header)?;
        w.flush()?;
        if !self.written.contains(&path) {
            self.written.push(path);
        }
        Ok(())
    }
}

/// Labels become part of a file name.
fn check_label(label: &str) -> OutputResult<()> {
    if label.is_empty() || label.contains(['/', '\\']) || label.starts_with('.') {
        return Err(OutputError::invalid("matrix", format!("unusable snapshot label {label:?}")));
    }
    Ok(())
}

pub(crate) const MATRIX_HEADER: [&str; 4] = ["src", "dst", "time_s", "distance_km"];
pub(crate) const DELTA_HEADER: [&str; 10] = [
    "src",
    "dst",
    "time_s_old",
    "time_s_new",
    "delta_time_s",
    "distance_km_old",
    "distance_km_new",
    "delta_distance_km",
    "pct_time",
    "pct_distance",
];

impl TableWriter for CsvWriter {
    fn write_points(&mut self, points: &[Point]) -> OutputResult<()> {
        if points.is_empty() {
            return self.write_header(POINTS_CSV, &["id", "lat", "lon", "snap_m"]);
        }
        self.write_table(POINTS_CSV, points.iter().map(PointRecord::from))
    }

    fn write_matrix(&mut self, label: &str, matrix: &LongMatrix) -> OutputResult<()> {
        check_label(label)?;
        let file = matrix_csv(label);
        if matrix.is_empty() {
            return self.write_header(&file, &MATRIX_HEADER);
        }
        self.write_table(&file, matrix.iter().map(MatrixRecord::from))
    }

    fn write_delta(&mut self, table: &DeltaTable) -> OutputResult<()> {
        if table.is_empty() {
            return self.write_header(DELTA_CSV, &DELTA_HEADER);
        }
        self.write_table(DELTA_CSV, table.iter().map(DeltaRecord::from))
    }

    fn write_top_k(&mut self, routes: &[RankedRoute]) -> OutputResult<()> {
        if routes.is_empty() {
            let mut header = vec!["route_type"];
            header.extend(DELTA_HEADER);
            return self.write_header(TOP_K_CSV, &header);
        }
        self.write_table(TOP_K_CSV, routes.iter().map(TopKRecord::from))
    }

    fn write_route_geometry(&mut self, vertices: &[RouteVertexRow]) -> OutputResult<()> {
        if vertices.is_empty() {
            return self.write_header(ROUTE_GEOMETRY_CSV, &["rank", "snapshot", "src", "dst", "seq", "lat", "lon"]);
        }
        self.write_table(ROUTE_GEOMETRY_CSV, vertices)
    }

    fn write_route_summaries(&mut self, routes: &[RouteSummaryRow]) -> OutputResult<()> {
        if routes.is_empty() {
            return self.write_header(
                ROUTE_SUMMARY_CSV,
                &["rank", "snapshot", "src", "dst", "time_s", "length_km", "vertices"],
            );
        }
        self.write_table(ROUTE_SUMMARY_CSV, routes)
    }

    fn finish(&mut self) -> OutputResult<()> {
        // Every table is flushed as it is written.
        Ok(())
    }
}
