//! Unit tests for rd-service.
//!
//! The client is driven through a scripted in-memory transport, so no test
//! opens a socket.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use rd_core::ServiceConfig;

    use crate::{HttpReply, ServiceResult, Transport, ValhallaClient};

    /// Replays canned replies in order and records every request.
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies:  Mutex<VecDeque<HttpReply>>,
        pub sent: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl ScriptedTransport {
        pub fn new(replies: impl IntoIterator<Item = HttpReply>) -> Self {
            Self { replies: Mutex::new(replies.into_iter().collect()), sent: Mutex::default() }
        }

        pub fn urls(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
        }

        pub fn body(&self, i: usize) -> serde_json::Value {
            self.sent.lock().unwrap()[i].1.clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn post_json(&self, url: &str, body: &serde_json::Value, _timeout: Duration) -> ServiceResult<HttpReply> {
            self.sent.lock().unwrap().push((url.to_owned(), body.clone()));
            Ok(self.replies.lock().unwrap().pop_front().unwrap_or_else(|| HttpReply::new(500, "script exhausted")))
        }
    }

    pub fn client(replies: impl IntoIterator<Item = HttpReply>) -> ValhallaClient<ScriptedTransport> {
        ValhallaClient::with_transport(ServiceConfig::new("http://engine:8002"), ScriptedTransport::new(replies))
    }
}

// ── Wire decoding ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod wire {
    use rd_core::GeoPoint;

    use crate::service::{Cost, LocateOutcome};
    use crate::wire::{LocateResponse, MatrixResponse, Shape};

    fn locate(json: &str) -> LocateOutcome {
        serde_json::from_str::<LocateResponse>(json).unwrap().outcome()
    }

    #[test]
    fn locate_list_with_correlated() {
        let json = r#"[{"input_lat":10.1,"input_lon":106.1,
                        "edges":[{"correlated_lat":10.2,"correlated_lon":106.2}]}]"#;
        assert_eq!(locate(json), LocateOutcome::Snapped(GeoPoint::new(10.2, 106.2)));
    }

    #[test]
    fn locate_wrapped_with_projected() {
        let json = r#"{"locations":[{"edges":[{"projected":{"lat":10.3,"lon":106.3}}]}]}"#;
        assert_eq!(locate(json), LocateOutcome::Snapped(GeoPoint::new(10.3, 106.3)));
    }

    #[test]
    fn locate_single_object() {
        let json = r#"{"edges":[{"correlated_lat":1.0,"correlated_lon":2.0}]}"#;
        assert_eq!(locate(json), LocateOutcome::Snapped(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn correlated_takes_priority_over_projected() {
        let json = r#"[{"edges":[{"correlated_lat":1.0,"correlated_lon":2.0,
                                   "projected":{"lat":3.0,"lon":4.0}}]}]"#;
        assert_eq!(locate(json), LocateOutcome::Snapped(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn half_correlated_falls_back_to_projected() {
        let json = r#"[{"edges":[{"correlated_lat":1.0,"projected":{"lat":3.0,"lon":4.0}}]}]"#;
        assert_eq!(locate(json), LocateOutcome::Snapped(GeoPoint::new(3.0, 4.0)));
    }

    #[test]
    fn locate_no_match_shapes() {
        assert_eq!(locate(r#"[{"edges":null}]"#), LocateOutcome::NoMatch);
        assert_eq!(locate(r#"[{"edges":[]}]"#), LocateOutcome::NoMatch);
        assert_eq!(locate(r#"[]"#), LocateOutcome::NoMatch);
        assert_eq!(locate(r#"{"locations":[]}"#), LocateOutcome::NoMatch);
        assert_eq!(locate(r#"[{"edges":[{"way_id":7}]}]"#), LocateOutcome::NoMatch);
    }

    #[test]
    fn matrix_wrapped_and_bare_agree() {
        let wrapped = r#"{"sources_to_targets":[[{"time":0,"distance":0},{"time":10,"distance":1.5}],
                                                [null,{"time":null,"distance":null}]]}"#;
        let bare = r#"[[{"time":0,"distance":0},{"time":10,"distance":1.5}],
                       [null,{"time":null,"distance":null}]]"#;

        let a = serde_json::from_str::<MatrixResponse>(wrapped).unwrap().into_grid().unwrap();
        let b = serde_json::from_str::<MatrixResponse>(bare).unwrap().into_grid().unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0][1], Cost::new(10.0, 1.5));
        assert!(a[1][0].is_null());
        assert!(a[1][1].is_null());
    }

    #[test]
    fn matrix_concise_arrays() {
        let json = r#"{"sources_to_targets":{"durations":[[0,12],[null,0]],
                                              "distances":[[0,2.5],[null,0]]}}"#;
        let grid = serde_json::from_str::<MatrixResponse>(json).unwrap().into_grid().unwrap();
        assert_eq!(grid[0][1], Cost::new(12.0, 2.5));
        assert!(grid[1][0].is_null());
    }

    #[test]
    fn matrix_concise_dimension_mismatch() {
        let json = r#"{"sources_to_targets":{"durations":[[0,12]],"distances":[[0]]}}"#;
        let result = serde_json::from_str::<MatrixResponse>(json).unwrap().into_grid();
        assert!(result.is_err());
    }

    #[test]
    fn shape_variants() {
        let enc: Shape = serde_json::from_str(r#""_p~iF~ps|U""#).unwrap();
        let geo: Shape = serde_json::from_str(r#"{"type":"LineString","coordinates":[[106.7,10.8],[106.8,10.9]]}"#).unwrap();
        let other: Shape = serde_json::from_str(r#"{"type":"Point"}"#).unwrap();

        assert_eq!(enc.geometry(5).unwrap().unwrap(), vec![GeoPoint::new(38.5, -120.2)]);
        assert_eq!(
            geo.geometry(6).unwrap().unwrap(),
            vec![GeoPoint::new(10.8, 106.7), GeoPoint::new(10.9, 106.8)]
        );
        assert!(other.geometry(6).unwrap().is_none());
    }
}

// ── Client behaviour ──────────────────────────────────────────────────────────

#[cfg(test)]
mod client {
    use rd_core::GeoPoint;

    use super::helpers::client;
    use crate::{HttpReply, LocateOutcome, Locator, MatrixEndpoint, MatrixService, RouteService, ServiceError};

    const GRID_1X2: &str = r#"{"sources_to_targets":[[{"time":0,"distance":0},{"time":5,"distance":0.5}]]}"#;

    fn pts(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(10.0 + i as f64 * 0.01, 106.0)).collect()
    }

    #[test]
    fn locate_posts_single_location() {
        let c = client([HttpReply::ok(r#"[{"edges":[{"correlated_lat":10.5,"correlated_lon":106.5}]}]"#)]);
        let out = c.locate(GeoPoint::new(10.4, 106.4)).unwrap();
        assert_eq!(out, LocateOutcome::Snapped(GeoPoint::new(10.5, 106.5)));
        assert_eq!(c.transport().urls(), ["http://engine:8002/locate"]);
        assert_eq!(c.transport().body(0)["locations"][0]["lat"], 10.4);
    }

    #[test]
    fn locate_404_is_unavailable() {
        let c = client([HttpReply::new(404, "")]);
        let err = c.locate(GeoPoint::new(0.0, 0.0)).unwrap_err();
        assert!(err.is_fatal(), "{err}");
    }

    #[test]
    fn matrix_primary_path() {
        let c = client([HttpReply::ok(GRID_1X2)]);
        let grid = c.matrix(&pts(1), &pts(2)).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 2);
        assert_eq!(c.matrix_endpoint(), Some(MatrixEndpoint::SourcesToTargets));

        let body = c.transport().body(0);
        assert_eq!(body["costing"], "auto");
        assert!(body.get("action").is_none());
        assert_eq!(body["targets"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn matrix_falls_back_on_404_and_remembers() {
        let c = client([
            HttpReply::new(404, "not found"),
            HttpReply::ok(GRID_1X2),
            HttpReply::ok(GRID_1X2),
        ]);
        c.matrix(&pts(1), &pts(2)).unwrap();
        c.matrix(&pts(1), &pts(2)).unwrap();

        assert_eq!(
            c.transport().urls(),
            [
                "http://engine:8002/sources_to_targets",
                "http://engine:8002/matrix",
                "http://engine:8002/matrix",
            ]
        );
        assert_eq!(c.transport().body(1)["action"], "sources_to_targets");
        assert_eq!(c.matrix_endpoint(), Some(MatrixEndpoint::Matrix));
    }

    #[test]
    fn matrix_both_404_is_fatal() {
        let c = client([HttpReply::new(404, ""), HttpReply::new(404, "")]);
        let err = c.matrix(&pts(1), &pts(1)).unwrap_err();
        match &err {
            ServiceError::Unavailable { what, tried, .. } => {
                assert_eq!(*what, "matrix");
                assert_eq!(tried, "/sources_to_targets, /matrix");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
        assert!(err.is_fatal());
    }

    #[test]
    fn matrix_server_error_is_per_call() {
        let c = client([HttpReply::new(400, "Exceeded max locations")]);
        let err = c.matrix(&pts(60), &pts(60)).unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 400, .. }), "{err:?}");
        assert!(!err.is_fatal());
        // A non-404 failure must not trigger the fallback path.
        assert_eq!(c.transport().urls().len(), 1);
    }

    #[test]
    fn status_body_is_truncated() {
        let c = client([HttpReply::new(500, "x".repeat(1_000))]);
        match c.matrix(&pts(1), &pts(1)).unwrap_err() {
            ServiceError::Status { body, .. } => assert_eq!(body.len(), 200),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_shape_error() {
        let c = client([HttpReply::ok(r#"{"unexpected":true}"#)]);
        let err = c.matrix(&pts(1), &pts(1)).unwrap_err();
        assert!(matches!(err, ServiceError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn route_geojson() {
        let c = client([HttpReply::ok(
            r#"{"trip":{"legs":[{"shape":{"type":"LineString","coordinates":[[106.7,10.8],[106.71,10.81]]}}],
                        "summary":{"time":120.5,"length":1.25}}}"#,
        )]);
        let trip = c.route(GeoPoint::new(10.8, 106.7), GeoPoint::new(10.81, 106.71)).unwrap();
        assert_eq!(trip.geometry, vec![GeoPoint::new(10.8, 106.7), GeoPoint::new(10.81, 106.71)]);
        assert_eq!(trip.time_s, Some(120.5));
        assert_eq!(trip.length_km, Some(1.25));
        assert_eq!(c.transport().body(0)["shape_format"], "geojson");
        assert_eq!(c.transport().body(0)["directions_options"]["units"], "kilometers");
    }

    #[test]
    fn route_encoded_shape() {
        // "_p~iF~ps|U" at precision 6 = (3.85, -12.02)
        let c = client([HttpReply::ok(r#"{"trip":{"legs":[{"shape":"_p~iF~ps|U"}],"summary":{}}}"#)]);
        let trip = c.route(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)).unwrap();
        assert_eq!(trip.geometry, vec![GeoPoint::new(3.85, -12.02)]);
        assert_eq!(trip.time_s, None);
    }

    #[test]
    fn route_retries_without_shape_format() {
        let c = client([
            HttpReply::ok(r#"{"trip":{"legs":[{"shape":{"type":"Point"}}]}}"#),
            HttpReply::ok(r#"{"trip":{"legs":[{"shape":"_p~iF~ps|U"}]}}"#),
        ]);
        let trip = c.route(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)).unwrap();
        assert_eq!(trip.geometry.len(), 1);
        assert!(c.transport().body(1).get("shape_format").is_none());
    }

    #[test]
    fn route_bad_polyline_is_decode_error() {
        let c = client([HttpReply::ok(r#"{"trip":{"legs":[{"shape":"_p~iF"}]}}"#)]);
        let err = c.route(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)).unwrap_err();
        match err {
            ServiceError::Decode(e) => assert_eq!(e.encoded(), Some("_p~iF")),
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
