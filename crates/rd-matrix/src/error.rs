use rd_core::{PointId, RdError};
use rd_service::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    /// The matrix endpoint is missing; no tile can succeed.
    #[error("matrix service unavailable: {0}")]
    Unavailable(#[source] ServiceError),

    #[error("duplicate matrix cell ({src}, {dst})")]
    DuplicateCell { src: PointId, dst: PointId },

    #[error("could not start worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Config(#[from] RdError),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
