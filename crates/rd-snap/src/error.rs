use rd_core::RdError;
use rd_service::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapError {
    /// The draw budget ran out first.  No partial point set is returned.
    #[error("accepted only {accepted} of {requested} points after {tries} tries")]
    InsufficientPoints {
        requested: usize,
        accepted:  usize,
        tries:     usize,
    },

    /// The locate endpoint itself is missing; every further draw would fail.
    #[error("locate service unavailable: {0}")]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Config(#[from] RdError),
}

pub type SnapResult<T> = Result<T, SnapError>;
