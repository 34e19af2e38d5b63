//! Unit tests for rd-polyline.

#[cfg(test)]
mod decode {
    use crate::{decode, decode_default, PolylineError};

    /// Reference string from the format documentation.
    const GOOGLE_EXAMPLE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn reference_example() {
        let coords = decode(GOOGLE_EXAMPLE, 5).unwrap();
        let pairs: Vec<_> = coords.iter().map(|p| (p.lat, p.lon)).collect();
        assert_eq!(pairs, [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]);
    }

    #[test]
    fn same_string_precision_six_is_scaled() {
        let coords = decode(GOOGLE_EXAMPLE, 6).unwrap();
        assert_eq!((coords[0].lat, coords[0].lon), (3.85, -12.02));
    }

    #[test]
    fn empty_is_empty() {
        assert!(decode_default("").unwrap().is_empty());
    }

    #[test]
    fn dangling_latitude_is_error() {
        // "_p~iF" is a complete latitude group with nothing after it.
        let err = decode("_p~iF", 5).unwrap_err();
        assert!(matches!(err, PolylineError::MissingLongitude { index: 5, .. }), "{err:?}");
        assert_eq!(err.encoded(), Some("_p~iF"));
    }

    #[test]
    fn odd_number_of_groups_is_error() {
        // Two full points followed by a third latitude only.
        let err = decode("_p~iF~ps|U_ulLnnqC_mqN", 5).unwrap_err();
        assert!(matches!(err, PolylineError::MissingLongitude { .. }), "{err:?}");
    }

    #[test]
    fn unterminated_group_is_error() {
        // '_' carries the continuation bit and nothing follows it.
        let err = decode("_p~iF~ps|U_", 5).unwrap_err();
        assert!(matches!(err, PolylineError::Unterminated { index: 10, .. }), "{err:?}");
    }

    #[test]
    fn invalid_character_is_error() {
        let err = decode("_p~iF ps|U", 5).unwrap_err();
        assert!(
            matches!(err, PolylineError::InvalidChar { ch: ' ', index: 5, .. }),
            "{err:?}"
        );
        let err = decode("_p~iFé", 5).unwrap_err();
        assert!(matches!(err, PolylineError::InvalidChar { ch: 'é', .. }), "{err:?}");
    }

    #[test]
    fn overlong_group_is_error() {
        // 14 continuation groups = 70 bits.
        let s = format!("{}?", "_".repeat(14));
        let err = decode(&s, 5).unwrap_err();
        assert!(matches!(err, PolylineError::Overflow { index: 0, .. }), "{err:?}");
    }

    #[test]
    fn precision_out_of_range() {
        assert_eq!(decode("", 11).unwrap_err(), PolylineError::Precision(11));
    }
}

#[cfg(test)]
mod roundtrip {
    use rd_core::GeoPoint;

    use crate::{decode, encode};

    fn route() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(10.776_543_21, 106.700_123_45),
            GeoPoint::new(10.776_001, 106.701_999),
            GeoPoint::new(10.770_5, 106.695_25),
            GeoPoint::new(-33.868_82, 151.209_29),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(89.999_999, -179.999_999),
        ]
    }

    fn rounded(p: GeoPoint, precision: u32) -> (f64, f64) {
        let f = 10f64.powi(precision as i32);
        ((p.lat * f).round() / f, (p.lon * f).round() / f)
    }

    #[test]
    fn inverse_of_encode_at_five_and_six() {
        for precision in [5, 6] {
            let coords = route();
            let encoded = encode(&coords, precision).unwrap();
            let decoded = decode(&encoded, precision).unwrap();
            assert_eq!(decoded.len(), coords.len());
            for (d, c) in decoded.iter().zip(&coords) {
                assert_eq!((d.lat, d.lon), rounded(*c, precision), "precision {precision}");
            }
        }
    }

    #[test]
    fn encode_reference_example() {
        let coords = [
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ];
        assert_eq!(encode(&coords, 5).unwrap(), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn encode_rejects_nan() {
        let coords = [GeoPoint::new(1.0, 1.0), GeoPoint::new(f64::NAN, 0.0)];
        assert_eq!(encode(&coords, 6).unwrap_err(), crate::PolylineError::NonFinite(1));
    }
}

#[cfg(test)]
mod cross_check {
    use geo_types::Coord;
    use rd_core::GeoPoint;

    use crate::{decode, encode};

    fn sample() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(10.762_001, 106.680_002),
            GeoPoint::new(10.765_432, 106.684_321),
            GeoPoint::new(10.799_999, 106.759_998),
            GeoPoint::new(10.781_5, 106.701_25),
        ]
    }

    #[test]
    fn decodes_what_the_polyline_crate_encodes() {
        let coords = sample();
        let encoded = polyline::encode_coordinates(
            coords.iter().map(|p| Coord { x: p.lon, y: p.lat }),
            6,
        )
        .unwrap();

        let decoded = decode(&encoded, 6).unwrap();
        for (d, c) in decoded.iter().zip(&coords) {
            assert!((d.lat - c.lat).abs() < 1e-9 && (d.lon - c.lon).abs() < 1e-9);
        }
    }

    #[test]
    fn polyline_crate_decodes_our_encoding() {
        let coords = sample();
        let encoded = encode(&coords, 6).unwrap();
        let line = polyline::decode_polyline(&encoded, 6).unwrap();
        let theirs: Vec<_> = line.coords().map(|c| (c.y, c.x)).collect();
        assert_eq!(theirs.len(), coords.len());
        for (t, c) in theirs.iter().zip(&coords) {
            assert!((t.0 - c.lat).abs() < 1e-9 && (t.1 - c.lon).abs() < 1e-9);
        }
    }
}
