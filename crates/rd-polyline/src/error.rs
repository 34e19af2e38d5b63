//! Codec error type.
//!
//! Every decode variant carries the full input string so a failing route
//! geometry can be reproduced from the log line alone.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid character {ch:?} at byte {index} of polyline {encoded:?}")]
    InvalidChar { ch: char, index: usize, encoded: String },

    #[error("unterminated coordinate group starting at byte {index} of polyline {encoded:?}")]
    Unterminated { index: usize, encoded: String },

    #[error("latitude ending at byte {index} has no longitude in polyline {encoded:?}")]
    MissingLongitude { index: usize, encoded: String },

    #[error("coordinate group at byte {index} overflows 64 bits in polyline {encoded:?}")]
    Overflow { index: usize, encoded: String },

    #[error("cannot encode non-finite coordinate at position {0}")]
    NonFinite(usize),

    #[error("precision {0} is out of range (0..={max})", max = crate::MAX_PRECISION)]
    Precision(u32),
}

impl PolylineError {
    /// The encoded input that failed to decode, if any.
    pub fn encoded(&self) -> Option<&str> {
        match self {
            Self::InvalidChar { encoded, .. }
            | Self::Unterminated { encoded, .. }
            | Self::MissingLongitude { encoded, .. }
            | Self::Overflow { encoded, .. } => Some(encoded),
            Self::NonFinite(_) | Self::Precision(_) => None,
        }
    }
}

pub type PolylineResult<T> = Result<T, PolylineError>;
