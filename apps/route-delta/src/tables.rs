//! Fan-out over the enabled table backends.

use std::path::Path;

use anyhow::Result;
use rd_core::Point;
use rd_delta::{DeltaTable, RankedRoute};
use rd_matrix::LongMatrix;
use rd_output::{CsvWriter, OutputResult, RouteSummaryRow, RouteVertexRow, TableWriter};

/// CSV always, SQLite when asked for.
pub struct Tables {
    writers: Vec<Box<dyn TableWriter>>,
}

impl Tables {
    pub fn open(dir: &Path, sqlite: bool) -> Result<Self> {
        let csv: Box<dyn TableWriter> = Box::new(CsvWriter::new(dir)?);
        let mut writers = vec![csv];
        if sqlite {
            writers.push(open_sqlite(dir)?);
        }
        Ok(Self { writers })
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn TableWriter) -> OutputResult<()>) -> OutputResult<()> {
        self.writers.iter_mut().try_for_each(|w| f(w.as_mut()))
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(dir: &Path) -> Result<Box<dyn TableWriter>> {
    Ok(Box::new(rd_output::SqliteWriter::new(dir)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_dir: &Path) -> Result<Box<dyn TableWriter>> {
    anyhow::bail!("--sqlite needs a build with the `sqlite` feature")
}

impl TableWriter for Tables {
    fn write_points(&mut self, points: &[Point]) -> OutputResult<()> {
        self.each(|w| w.write_points(points))
    }

    fn write_matrix(&mut self, label: &str, matrix: &LongMatrix) -> OutputResult<()> {
        self.each(|w| w.write_matrix(label, matrix))
    }

    fn write_delta(&mut self, table: &DeltaTable) -> OutputResult<()> {
        self.each(|w| w.write_delta(table))
    }

    fn write_top_k(&mut self, routes: &[RankedRoute]) -> OutputResult<()> {
        self.each(|w| w.write_top_k(routes))
    }

    fn write_route_geometry(&mut self, vertices: &[RouteVertexRow]) -> OutputResult<()> {
        self.each(|w| w.write_route_geometry(vertices))
    }

    fn write_route_summaries(&mut self, routes: &[RouteSummaryRow]) -> OutputResult<()> {
        self.each(|w| w.write_route_summaries(routes))
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.each(|w| w.finish())
    }
}
