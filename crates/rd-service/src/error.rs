//! Service-boundary error type.

use std::time::Duration;

use rd_core::RdError;
use rd_polyline::PolylineError;
use thiserror::Error;

/// Errors produced when talking to a routing engine.
///
/// Only [`ServiceError::Unavailable`] is fatal for a whole run; every other
/// variant describes one failed call, which callers recover from locally
/// (a matrix tile becomes nulls, a locate draw is discarded, a route is
/// skipped).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{what} endpoint not available at {base_url} (tried {tried})")]
    Unavailable {
        base_url: String,
        what:     &'static str,
        tried:    String,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("request to {url} failed: {source}")]
    Transport {
        url:    String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not encode request for {url}: {source}")]
    Encode {
        url:    String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response from {url}: {reason}")]
    Shape { url: String, reason: String },

    #[error("route geometry: {0}")]
    Decode(#[from] PolylineError),

    #[error(transparent)]
    Config(#[from] RdError),
}

impl ServiceError {
    /// `true` if the endpoint itself is missing and retrying other calls
    /// against the same service is pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Unavailable { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
