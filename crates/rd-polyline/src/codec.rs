//! Encoded polyline format.
//!
//! # Wire layout
//!
//! ```text
//! point   := lat_delta lon_delta
//! delta   := group* last_group
//! group   := chr(63 + (0x20 | five_bits))     continuation bit set
//! last    := chr(63 + five_bits)              continuation bit clear
//! ```
//!
//! Groups are little-endian.  The assembled value is zig-zag encoded: the
//! least-significant bit carries the sign, so `v & 1 == 1` means the delta is
//! `!(v >> 1)`, otherwise `v >> 1`.  Deltas accumulate from `(0, 0)` in
//! integer units of `10^-precision` degrees.
//!
//! Google's format uses precision 5; OSRM and Valhalla emit precision 6.

use rd_core::GeoPoint;

use crate::{PolylineError, PolylineResult};

/// Precision emitted by Valhalla `/route` shapes.
pub const DEFAULT_PRECISION: u32 = 6;

/// Largest supported precision.  `180 * 10^10` still fits comfortably in `i64`.
pub const MAX_PRECISION: u32 = 10;

const ASCII_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const FIVE_BITS: u64 = 0x1f;

fn scale(precision: u32) -> PolylineResult<f64> {
    if precision > MAX_PRECISION {
        return Err(PolylineError::Precision(precision));
    }
    Ok(10f64.powi(precision as i32))
}

// ── Decode ────────────────────────────────────────────────────────────────────

/// Decode `encoded` into absolute coordinates.
///
/// An empty string decodes to an empty sequence.  Any malformed input is an
/// error; a partially decoded prefix is never returned.
pub fn decode(encoded: &str, precision: u32) -> PolylineResult<Vec<GeoPoint>> {
    let factor = scale(precision)?;
    let bytes = encoded.as_bytes();

    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut coords = Vec::with_capacity(bytes.len() / 4);

    while index < bytes.len() {
        let group_start = index;
        lat = accumulate(lat, next_delta(encoded, &mut index)?, group_start, encoded)?;

        if index == bytes.len() {
            return Err(PolylineError::MissingLongitude {
                index,
                encoded: encoded.to_owned(),
            });
        }

        let group_start = index;
        lon = accumulate(lon, next_delta(encoded, &mut index)?, group_start, encoded)?;

        coords.push(GeoPoint::new(lat as f64 / factor, lon as f64 / factor));
    }

    Ok(coords)
}

/// Decode with [`DEFAULT_PRECISION`].
pub fn decode_default(encoded: &str) -> PolylineResult<Vec<GeoPoint>> {
    decode(encoded, DEFAULT_PRECISION)
}

/// Read one zig-zag delta starting at `*index`, advancing past its last group.
fn next_delta(encoded: &str, index: &mut usize) -> PolylineResult<i64> {
    let bytes = encoded.as_bytes();
    let start = *index;
    let mut value: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Unterminated { index: start, encoded: encoded.to_owned() });
        };
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            let ch = encoded[*index..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(PolylineError::InvalidChar { ch, index: *index, encoded: encoded.to_owned() });
        }

        let chunk = u64::from(byte - ASCII_OFFSET);
        let bits = chunk & FIVE_BITS;
        if shift >= 64 || (shift > 59 && bits >> (64 - shift) != 0) {
            return Err(PolylineError::Overflow { index: start, encoded: encoded.to_owned() });
        }

        value |= bits << shift;
        shift += 5;
        *index += 1;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    let magnitude = value >> 1;
    Ok(if value & 1 == 1 { !magnitude as i64 } else { magnitude as i64 })
}

fn accumulate(acc: i64, delta: i64, index: usize, encoded: &str) -> PolylineResult<i64> {
    acc.checked_add(delta)
        .ok_or_else(|| PolylineError::Overflow { index, encoded: encoded.to_owned() })
}

// ── Encode ────────────────────────────────────────────────────────────────────

/// Encode absolute coordinates, rounding each to `precision` decimal digits.
///
/// `decode(&encode(c, p)?, p)` returns `c` rounded to `p` digits.
pub fn encode(coords: &[GeoPoint], precision: u32) -> PolylineResult<String> {
    let factor = scale(precision)?;
    let mut out = String::with_capacity(coords.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for (i, p) in coords.iter().enumerate() {
        if !(p.lat.is_finite() && p.lon.is_finite()) {
            return Err(PolylineError::NonFinite(i));
        }
        let lat = (p.lat * factor).round() as i64;
        let lon = (p.lon * factor).round() as i64;

        push_delta(&mut out, lat - prev_lat);
        push_delta(&mut out, lon - prev_lon);

        prev_lat = lat;
        prev_lon = lon;
    }

    Ok(out)
}

fn push_delta(out: &mut String, delta: i64) {
    let mut v = ((delta << 1) ^ (delta >> 63)) as u64;
    while v >= CONTINUATION {
        out.push(char::from((CONTINUATION | (v & FIVE_BITS)) as u8 + ASCII_OFFSET));
        v >>= 5;
    }
    out.push(char::from(v as u8 + ASCII_OFFSET));
}
