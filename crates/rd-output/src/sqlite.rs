//! SQLite output backend (feature `sqlite`).
//!
//! Creates `route_delta.db` in the output directory.  Matrices share one
//! table keyed by snapshot label; writing a label replaces only that
//! label's rows.

use std::path::Path;

use log::debug;
use rusqlite::{Connection, params};

use rd_core::Point;
use rd_delta::{DeltaTable, RankedRoute};
use rd_matrix::LongMatrix;

use crate::row::TopKRecord;
use crate::writer::TableWriter;
use crate::{OutputResult, RouteSummaryRow, RouteVertexRow, SQLITE_DB};

/// Writes every table into one SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `route_delta.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(SQLITE_DB))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS points (
                 id     INTEGER PRIMARY KEY,
                 lat    REAL NOT NULL,
                 lon    REAL NOT NULL,
                 snap_m REAL
             );
             CREATE TABLE IF NOT EXISTS matrix (
                 label       TEXT    NOT NULL,
                 src         INTEGER NOT NULL,
                 dst         INTEGER NOT NULL,
                 time_s      REAL,
                 distance_km REAL,
                 PRIMARY KEY (label, src, dst)
             );
             CREATE TABLE IF NOT EXISTS matrix_delta (
                 src               INTEGER NOT NULL,
                 dst               INTEGER NOT NULL,
                 time_s_old        REAL,
                 time_s_new        REAL,
                 delta_time_s      REAL,
                 distance_km_old   REAL,
                 distance_km_new   REAL,
                 delta_distance_km REAL,
                 pct_time          REAL,
                 pct_distance      REAL,
                 PRIMARY KEY (src, dst)
             );
             CREATE TABLE IF NOT EXISTS top_k_routes (
                 position          INTEGER PRIMARY KEY,
                 route_type        TEXT    NOT NULL,
                 src               INTEGER NOT NULL,
                 dst               INTEGER NOT NULL,
                 time_s_old        REAL,
                 time_s_new        REAL,
                 delta_time_s      REAL,
                 distance_km_old   REAL,
                 distance_km_new   REAL,
                 delta_distance_km REAL,
                 pct_time          REAL,
                 pct_distance      REAL
             );
             CREATE TABLE IF NOT EXISTS route_geometry (
                 rank     INTEGER NOT NULL,
                 snapshot TEXT    NOT NULL,
                 src      INTEGER NOT NULL,
                 dst      INTEGER NOT NULL,
                 seq      INTEGER NOT NULL,
                 lat      REAL    NOT NULL,
                 lon      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS route_summary (
                 rank      INTEGER NOT NULL,
                 snapshot  TEXT    NOT NULL,
                 src       INTEGER NOT NULL,
                 dst       INTEGER NOT NULL,
                 time_s    REAL,
                 length_km REAL,
                 vertices  INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableWriter for SqliteWriter {
    fn write_points(&mut self, points: &[Point]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM points", [])?;
        {
            let mut stmt = tx.prepare_cached("INSERT INTO points (id, lat, lon, snap_m) VALUES (?1, ?2, ?3, ?4)")?;
            for p in points {
                stmt.execute(params![p.id.0, p.lat, p.lon, p.snap_distance_m])?;
            }
        }
        tx.commit()?;
        debug!("stored {} points", points.len());
        Ok(())
    }

    fn write_matrix(&mut self, label: &str, matrix: &LongMatrix) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM matrix WHERE label = ?1", params![label])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO matrix (label, src, dst, time_s, distance_km) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for c in matrix {
                stmt.execute(params![label, c.src.0, c.dst.0, c.time_s, c.distance_km])?;
            }
        }
        tx.commit()?;
        debug!("stored {} cells for {label}", matrix.len());
        Ok(())
    }

    fn write_delta(&mut self, table: &DeltaTable) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM matrix_delta", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO matrix_delta \
                 (src, dst, time_s_old, time_s_new, delta_time_s, \
                  distance_km_old, distance_km_new, delta_distance_km, pct_time, pct_distance) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for r in table {
                stmt.execute(params![
                    r.src.0,
                    r.dst.0,
                    r.time_s_old,
                    r.time_s_new,
                    r.delta_time_s,
                    r.distance_km_old,
                    r.distance_km_new,
                    r.delta_distance_km,
                    r.pct_time,
                    r.pct_distance,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_top_k(&mut self, routes: &[RankedRoute]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM top_k_routes", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO top_k_routes \
                 (position, route_type, src, dst, time_s_old, time_s_new, delta_time_s, \
                  distance_km_old, distance_km_new, delta_distance_km, pct_time, pct_distance) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for (i, route) in routes.iter().enumerate() {
                let r = TopKRecord::from(route);
                stmt.execute(params![
                    i as i64,
                    r.route_type,
                    r.src,
                    r.dst,
                    r.time_s_old,
                    r.time_s_new,
                    r.delta_time_s,
                    r.distance_km_old,
                    r.distance_km_new,
                    r.delta_distance_km,
                    r.pct_time,
                    r.pct_distance,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_route_geometry(&mut self, vertices: &[RouteVertexRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM route_geometry", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO route_geometry (rank, snapshot, src, dst, seq, lat, lon) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for v in vertices {
                stmt.execute(params![v.rank as i64, v.snapshot, v.src, v.dst, v.seq as i64, v.lat, v.lon])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_route_summaries(&mut self, routes: &[RouteSummaryRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM route_summary", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO route_summary (rank, snapshot, src, dst, time_s, length_km, vertices) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for r in routes {
                stmt.execute(params![r.rank as i64, r.snapshot, r.src, r.dst, r.time_s, r.length_km, r.vertices as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
