//! CSV readers for tables written by [`CsvWriter`][crate::CsvWriter].
//!
//! Each table has a path-based loader and a `Read`-based variant for tests
//! and in-memory sources.  Values are taken as stored; delta rows are not
//! recomputed.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use rd_core::{Point, PointId};
use rd_delta::{DeltaRow, DeltaTable};
use rd_matrix::{LongMatrix, MatrixCell};

use crate::row::{DeltaRecord, MatrixRecord, PointRecord};
use crate::{OutputError, OutputResult};

fn records<T: DeserializeOwned, R: Read>(reader: R) -> OutputResult<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<T>().map(|r| r.map_err(OutputError::from)).collect()
}

// ── Points ────────────────────────────────────────────────────────────────────

/// Load a point list in file order.
pub fn read_points(path: &Path) -> OutputResult<Vec<Point>> {
    read_points_reader(File::open(path)?)
}

/// Like [`read_points`] but accepts any `Read` source.
///
/// Ids must be non-zero and unique.
pub fn read_points_reader<R: Read>(reader: R) -> OutputResult<Vec<Point>> {
    let rows: Vec<PointRecord> = records(reader)?;
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .map(|r| {
            let id = PointId(r.id);
            if !id.is_valid() {
                return Err(OutputError::invalid("points", "point id 0 is reserved"));
            }
            if !seen.insert(id) {
                return Err(OutputError::invalid("points", format!("duplicate point id {}", r.id)));
            }
            Ok(Point::from(r))
        })
        .collect()
}

// ── Matrix ────────────────────────────────────────────────────────────────────

pub fn read_matrix(path: &Path) -> OutputResult<LongMatrix> {
    read_matrix_reader(File::open(path)?)
}

/// Like [`read_matrix`] but accepts any `Read` source.
pub fn read_matrix_reader<R: Read>(reader: R) -> OutputResult<LongMatrix> {
    let cells: Vec<MatrixCell> = records::<MatrixRecord, _>(reader)?.into_iter().map(MatrixCell::from).collect();
    LongMatrix::from_cells(cells).map_err(|e| OutputError::invalid("matrix", e))
}

// ── Delta ─────────────────────────────────────────────────────────────────────

pub fn read_delta(path: &Path) -> OutputResult<DeltaTable> {
    read_delta_reader(File::open(path)?)
}

/// Like [`read_delta`] but accepts any `Read` source.
pub fn read_delta_reader<R: Read>(reader: R) -> OutputResult<DeltaTable> {
    let rows: Vec<DeltaRow> = records::<DeltaRecord, _>(reader)?.into_iter().map(DeltaRow::from).collect();
    DeltaTable::from_rows(rows).map_err(|e| OutputError::invalid("delta", e))
}
