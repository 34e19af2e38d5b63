use rd_core::PointId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeltaError {
    #[error("unknown metric {0:?} (expected delta_time_s or delta_distance_km)")]
    UnknownMetric(String),

    #[error("duplicate delta row ({src}, {dst})")]
    DuplicateRow { src: PointId, dst: PointId },
}

pub type DeltaResult<T> = Result<T, DeltaError>;
