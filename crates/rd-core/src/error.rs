//! Workspace base error type.
//!
//! Sub-crates define their own error enums and either convert `RdError` via
//! `From` or wrap it as one variant.

use thiserror::Error;

use crate::PointId;

/// The top-level error type for `rd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum RdError {
    #[error("point {0} not found")]
    PointNotFound(PointId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `rd-*` crates.
pub type RdResult<T> = Result<T, RdError>;
