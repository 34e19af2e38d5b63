//! `rd-polyline`: encoded-polyline codec.
//!
//! Routing engines return route geometry as a compact ASCII string; this
//! crate turns it back into `(lat, lon)` pairs.  Decoding is pure and
//! stateless, so it is safe to call from any number of threads.
//!
//! ```rust
//! let coords = rd_polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();
//! assert_eq!(coords.len(), 3);
//! assert_eq!((coords[0].lat, coords[0].lon), (38.5, -120.2));
//! ```

pub mod codec;
pub mod error;

#[cfg(test)]
mod tests;

pub use codec::{decode, decode_default, encode, DEFAULT_PRECISION, MAX_PRECISION};
pub use error::{PolylineError, PolylineResult};
