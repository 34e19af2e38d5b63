//! Tests for rd-output.

#[cfg(test)]
mod helpers {
    use rd_core::{GeoPoint, Point, PointId};
    use rd_delta::{DeltaTable, merge};
    use rd_matrix::{LongMatrix, MatrixCell};

    pub fn points() -> Vec<Point> {
        vec![
            Point::new(PointId(1), GeoPoint::new(10.75, 106.66), 3.5),
            Point::new(PointId(2), GeoPoint::new(10.80, 106.70), 0.0),
        ]
    }

    pub fn matrix(scale: f64, hole: bool) -> LongMatrix {
        let mut cells = Vec::new();
        for s in 1..=2 {
            for d in 1..=2 {
                let t = if s == d { 0.0 } else { 60.0 * scale };
                let missing = hole && (s, d) == (2, 1);
                cells.push(MatrixCell {
                    src:         PointId(s),
                    dst:         PointId(d),
                    time_s:      (!missing).then_some(t),
                    distance_km: (!missing).then_some(t / 60.0),
                });
            }
        }
        LongMatrix::from_cells(cells).unwrap()
    }

    pub fn delta() -> DeltaTable {
        merge(&matrix(1.0, false), &matrix(1.5, true))
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::helpers::{delta, matrix, points};
    use crate::writer::TableWriter;
    use crate::{
        CsvWriter, DELTA_CSV, OutputError, POINTS_CSV, RouteVertexRow, TOP_K_CSV, matrix_csv, read_delta,
        read_matrix, read_points, read_points_reader,
    };
    use rd_delta::DeltaMetric;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn points_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_points(&points()).unwrap();

        let path = dir.path().join(POINTS_CSV);
        assert_eq!(headers(&path), ["id", "lat", "lon", "snap_m"]);
        assert_eq!(read_points(&path).unwrap(), points());
    }

    #[test]
    fn points_without_snap_column() {
        let pts = read_points_reader(Cursor::new("id,lat,lon\n1,10.5,106.5\n2,10.6,106.6\n")).unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[1].snap_distance_m, 0.0);
    }

    #[test]
    fn points_reject_zero_and_duplicate_ids() {
        let zero = read_points_reader(Cursor::new("id,lat,lon\n0,1,1\n"));
        assert!(matches!(zero, Err(OutputError::Invalid { table: "points", .. })));
        let dup = read_points_reader(Cursor::new("id,lat,lon\n1,1,1\n1,2,2\n"));
        assert!(matches!(dup, Err(OutputError::Invalid { .. })));
    }

    #[test]
    fn matrix_nulls_are_empty_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_matrix("2025", &matrix(1.0, true)).unwrap();

        let path = dir.path().join(matrix_csv("2025"));
        assert_eq!(headers(&path), ["src", "dst", "time_s", "distance_km"]);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().any(|l| l == "2,1,,"), "{text}");

        let back = read_matrix(&path).unwrap();
        assert_eq!(back.cells(), matrix(1.0, true).cells());
    }

    #[test]
    fn bad_label_rejected() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        assert!(w.write_matrix("../x", &matrix(1.0, false)).is_err());
        assert!(w.write_matrix("", &matrix(1.0, false)).is_err());
    }

    #[test]
    fn delta_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let table = delta();
        w.write_delta(&table).unwrap();

        let path = dir.path().join(DELTA_CSV);
        assert_eq!(
            headers(&path),
            [
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
            ]
        );
        let back = read_delta(&path).unwrap();
        assert_eq!(back.rows(), table.rows());
    }

    #[test]
    fn rewrite_replaces_contents() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_points(&points()).unwrap();
        w.write_points(&points()[..1]).unwrap();
        assert_eq!(read_points(&dir.path().join(POINTS_CSV)).unwrap().len(), 1);
        assert_eq!(w.written().len(), 1);
    }

    #[test]
    fn top_k_with_missing_return() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let table = delta();
        let top = table.top_k(DeltaMetric::Time, 1, true);
        w.write_top_k(&table.with_return_routes(&top)).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(TOP_K_CSV)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "original");
        assert_eq!((&rows[0][1], &rows[0][2]), ("1", "2"));
        assert_eq!(&rows[1][0], "return");
        assert_eq!(&rows[1][5], ""); // (2,1) is null in the new snapshot
    }

    #[test]
    fn empty_tables_still_have_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_top_k(&[]).unwrap();
        w.write_route_geometry(&[]).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir.path().join(TOP_K_CSV))[..3], ["route_type", "src", "dst"]);
    }

    #[test]
    fn route_geometry_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let v = |seq| RouteVertexRow { rank: 1, snapshot: "old".into(), src: 1, dst: 2, seq, lat: 10.0, lon: 106.0 };
        w.write_route_geometry(&[v(0), v(1)]).unwrap();

        let path = dir.path().join(crate::ROUTE_GEOMETRY_CSV);
        assert_eq!(headers(&path), ["rank", "snapshot", "src", "dst", "seq", "lat", "lon"]);
        assert_eq!(w.written(), [path]);
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::helpers::{delta, matrix, points};
    use crate::SqliteWriter;
    use crate::writer::TableWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn count(w: &SqliteWriter, sql: &str) -> i64 {
        w.connection().query_row(sql, [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(crate::SQLITE_DB).exists());
    }

    #[test]
    fn matrix_labels_replace_independently() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_matrix("old", &matrix(1.0, false)).unwrap();
        w.write_matrix("new", &matrix(1.5, true)).unwrap();
        w.write_matrix("old", &matrix(1.0, false)).unwrap();

        assert_eq!(count(&w, "SELECT COUNT(*) FROM matrix"), 8);
        assert_eq!(count(&w, "SELECT COUNT(*) FROM matrix WHERE label = 'new' AND time_s IS NULL"), 1);
    }

    #[test]
    fn points_and_delta() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_points(&points()).unwrap();
        w.write_delta(&delta()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        assert_eq!(count(&w, "SELECT COUNT(*) FROM points"), 2);
        assert_eq!(count(&w, "SELECT COUNT(*) FROM matrix_delta WHERE delta_time_s IS NULL"), 1);
        let d: f64 = w
            .connection()
            .query_row("SELECT delta_time_s FROM matrix_delta WHERE src = 1 AND dst = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(d, 30.0);
    }
}
