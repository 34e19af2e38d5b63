//! Tests for the route-delta binary: argument parsing, configuration
//! layering, and the pipeline stages against in-memory services.

#[cfg(test)]
mod helpers {
    use rd_core::{GeoPoint, Point, PointId};
    use rd_service::{
        Cost, CostGrid, LocateOutcome, Locator, MatrixService, RouteService, RouteTrip, ServiceError, ServiceResult,
    };

    pub fn points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point::new(PointId::from_ordinal(i), GeoPoint::new(10.7 + i as f64 * 0.01, 106.7), 0.0))
            .collect()
    }

    /// Travel time proportional to distance, scaled per snapshot.
    pub struct Engine {
        pub scale: f64,
    }

    impl Locator for Engine {
        fn locate(&self, at: GeoPoint) -> ServiceResult<LocateOutcome> {
            Ok(LocateOutcome::Snapped(at))
        }
    }

    impl MatrixService for Engine {
        fn matrix(&self, sources: &[GeoPoint], targets: &[GeoPoint]) -> ServiceResult<CostGrid> {
            Ok(sources
                .iter()
                .map(|s| {
                    targets
                        .iter()
                        .map(|t| {
                            let d = s.distance_m(*t) / 1_000.0;
                            Cost::new((d * 100.0).round() * self.scale, d)
                        })
                        .collect()
                })
                .collect())
        }
    }

    impl RouteService for Engine {
        fn route(&self, from: GeoPoint, to: GeoPoint) -> ServiceResult<RouteTrip> {
            if self.scale < 0.0 {
                return Err(ServiceError::Status { url: "stub".into(), status: 500, body: String::new() });
            }
            Ok(RouteTrip { geometry: vec![from, to], time_s: Some(60.0 * self.scale), length_km: Some(1.0) })
        }
    }
}

// ── Command line ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cli {
    use clap::Parser;
    use rd_core::BBox;
    use rd_delta::DeltaMetric;

    use crate::cli::{Cli, Command, Snapshot};

    #[test]
    fn points_with_bbox() {
        let cli = Cli::try_parse_from([
            "route-delta",
            "points",
            "--count",
            "20",
            "--bbox",
            "106.6,10.7,106.8,10.9",
            "-o",
            "out",
        ])
        .unwrap();
        match cli.command {
            Command::Points(s) => {
                assert_eq!(s.count, Some(20));
                assert_eq!(s.bbox, Some(BBox::new(106.6, 10.7, 106.8, 10.9)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cli.output_dir.as_deref(), Some(std::path::Path::new("out")));
    }

    #[test]
    fn matrix_requires_snapshot() {
        assert!(Cli::try_parse_from(["route-delta", "matrix"]).is_err());
        let cli = Cli::try_parse_from(["route-delta", "matrix", "--snapshot", "old", "--tile-size", "25"]).unwrap();
        match cli.command {
            Command::Matrix { snapshot, batch, .. } => {
                assert_eq!(snapshot, Snapshot::Old);
                assert_eq!(batch.tile_size, Some(25));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn top_k_metric_and_defaults() {
        let cli = Cli::try_parse_from(["route-delta", "top-k", "--metric", "delta_distance_km"]).unwrap();
        match cli.command {
            Command::TopK { rank, .. } => {
                assert_eq!(rank.metric, DeltaMetric::Distance);
                assert_eq!(rank.k, 10);
                assert!(!rank.include_self_pairs);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["route-delta", "top-k", "--metric", "pct_time"]).is_err());
    }

    #[test]
    fn bad_bbox_rejected() {
        assert!(Cli::try_parse_from(["route-delta", "points", "--bbox", "1,2,3"]).is_err());
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod settings {
    use clap::Parser;

    use crate::cli::{Cli, Command};
    use crate::settings::{apply_batch, apply_globals, apply_sample, load};

    #[test]
    fn defaults_without_file() {
        let config = load(None).unwrap();
        assert_eq!(config.snap.count, 50);
        assert_eq!(config.batch.tile_size, 40);
        assert_eq!(config.new.base_url, "http://localhost:8005");
    }

    #[test]
    fn file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"old": {"label": "2018", "base_url": "http://engine:8004"},
                "snap": {"count": 12, "seed": 7},
                "timeouts": {"matrix_secs": 120}}"#,
        )
        .unwrap();

        let mut config = load(Some(&path)).unwrap();
        assert_eq!(config.old.label, "2018");
        assert_eq!(config.snap.count, 12);
        assert_eq!(config.snap.max_tries, 8_000);
        assert_eq!(config.timeouts.matrix_secs, 120.0);
        assert_eq!(config.timeouts.locate_secs, 15.0);

        let cli = Cli::try_parse_from([
            "route-delta",
            "run",
            "--seed",
            "99",
            "--tile-size",
            "10",
            "--old-url",
            "http://other:9000",
        ])
        .unwrap();
        apply_globals(&mut config, &cli);
        let Command::Run { sample, batch, .. } = &cli.command else { panic!("expected run") };
        apply_sample(&mut config, sample);
        apply_batch(&mut config, batch);

        assert_eq!(config.old.base_url, "http://other:9000");
        assert_eq!(config.old.label, "2018");
        assert_eq!((config.snap.count, config.snap.seed), (12, 99));
        assert_eq!(config.batch.tile_size, 10);
        config.validate().unwrap();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load(Some(&path)).is_err());
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use rd_core::{BatchConfig, SnapConfig};
    use rd_delta::{DeltaMetric, merge};
    use rd_output::{CsvWriter, DELTA_CSV, TableWriter, read_delta};

    use super::helpers::{Engine, points};
    use crate::pipeline::{acquire_matrix, describe, report, sample_points};

    #[test]
    fn sample_and_compare_two_snapshots() {
        let snap = SnapConfig { count: 6, call_delay_ms: 0, ..SnapConfig::default() };
        let pts = sample_points(&Engine { scale: 1.0 }, &snap).unwrap();
        assert_eq!(pts.len(), 6);

        let batch = BatchConfig { tile_size: 4, tile_delay_ms: 0, num_threads: Some(1) };
        let old = acquire_matrix(&Engine { scale: 1.0 }, "old", &pts, &batch).unwrap();
        let new = acquire_matrix(&Engine { scale: 2.0 }, "new", &pts, &batch).unwrap();
        assert_eq!(old.len(), 36);

        let table = merge(&old, &new);
        assert_eq!(table.len(), 36);
        for row in &table {
            assert_eq!(row.delta_time_s, row.time_s_old);
            if !row.is_self_pair() {
                assert_eq!(row.pct_time, Some(100.0));
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut csv = CsvWriter::new(dir.path()).unwrap();
        csv.write_delta(&table).unwrap();
        let back = read_delta(&dir.path().join(DELTA_CSV)).unwrap();
        assert_eq!(back.rows(), table.rows());
    }

    #[test]
    fn report_lists_extremes() {
        let pts = points(3);
        let batch = BatchConfig { tile_size: 2, tile_delay_ms: 0, num_threads: Some(1) };
        let old = acquire_matrix(&Engine { scale: 1.0 }, "old", &pts, &batch).unwrap();
        let new = acquire_matrix(&Engine { scale: 0.5 }, "new", &pts, &batch).unwrap();
        let table = merge(&old, &new);

        let text = report(&table, DeltaMetric::Time, 2, true).to_string();
        assert!(text.contains("most improved by delta_time_s"), "{text}");
        assert!(text.contains("most degraded by delta_time_s:\n  (none)"), "{text}");

        let top = table.top_k(DeltaMetric::Time, 1, true);
        assert!(describe(top[0], DeltaMetric::Time).contains("delta_time_s=-"));
    }

    #[test]
    fn report_mentions_structural_mismatch() {
        let batch = BatchConfig { tile_size: 2, tile_delay_ms: 0, num_threads: Some(1) };
        let old = acquire_matrix(&Engine { scale: 1.0 }, "old", &points(3), &batch).unwrap();
        let new = acquire_matrix(&Engine { scale: 1.0 }, "new", &points(2), &batch).unwrap();
        let table = merge(&old, &new);
        assert_eq!(table.len(), 4);

        let text = format!("{}", report(&table, DeltaMetric::Time, 1, true));
        assert!(text.contains("structural mismatch: 5 pairs only in old, 0 only in new"), "{text}");
    }
}

// ── Route comparison ──────────────────────────────────────────────────────────

#[cfg(test)]
mod compare {
    use rd_core::BatchConfig;
    use rd_delta::{DeltaMetric, merge};

    use super::helpers::{Engine, points};
    use crate::compare::{candidates, compare_routes};
    use crate::pipeline::acquire_matrix;

    fn table(scale_new: f64) -> rd_delta::DeltaTable {
        let pts = points(4);
        let batch = BatchConfig { tile_size: 4, tile_delay_ms: 0, num_threads: Some(1) };
        let old = acquire_matrix(&Engine { scale: 1.0 }, "old", &pts, &batch).unwrap();
        let new = acquire_matrix(&Engine { scale: scale_new }, "new", &pts, &batch).unwrap();
        merge(&old, &new)
    }

    #[test]
    fn candidates_skip_self_pairs() {
        let t = table(2.0);
        let rows = candidates(&t, DeltaMetric::Time, 3);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| !r.is_self_pair() && r.is_complete()));
        // the two farthest-apart points first
        assert_eq!((rows[0].src.0, rows[0].dst.0), (1, 4));
    }

    #[test]
    fn vertices_for_every_snapshot() {
        let t = table(2.0);
        let rows = candidates(&t, DeltaMetric::Time, 2);
        let (old, new) = (Engine { scale: 1.0 }, Engine { scale: 2.0 });
        let result = compare_routes(&[("old", &old), ("new", &new)], &rows, &points(4));

        assert!(result.skipped.is_empty());
        assert_eq!(result.summaries.len(), 4);
        assert_eq!(result.vertices.len(), 8);
        assert_eq!(result.vertices[0].rank, 1);
        assert_eq!(result.vertices[0].snapshot, "old");
        assert_eq!(result.vertices[1].seq, 1);
        assert_eq!(result.summaries[1].time_s, Some(120.0));
    }

    #[test]
    fn one_failing_snapshot_skips_the_pair() {
        let t = table(2.0);
        let rows = candidates(&t, DeltaMetric::Time, 2);
        let (old, broken) = (Engine { scale: 1.0 }, Engine { scale: -1.0 });
        let result = compare_routes(&[("old", &old), ("new", &broken)], &rows, &points(4));

        assert_eq!(result.skipped.len(), 2);
        assert!(result.vertices.is_empty());
        assert!(result.skipped[0].2.starts_with("new:"));
    }

    #[test]
    fn unknown_point_is_skipped() {
        let t = table(2.0);
        let rows = candidates(&t, DeltaMetric::Time, 1);
        let old = Engine { scale: 1.0 };
        let result = compare_routes(&[("old", &old)], &rows, &points(2));
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].2, "point PointId(4) not found");
    }
}
