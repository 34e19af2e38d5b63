use std::fmt;
use std::str::FromStr;

use crate::{DeltaError, DeltaRow};

/// Ranking metric, named after its column in the delta table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DeltaMetric {
    #[default]
    Time,
    Distance,
}

impl DeltaMetric {
    pub fn column(self) -> &'static str {
        match self {
            DeltaMetric::Time => "delta_time_s",
            DeltaMetric::Distance => "delta_distance_km",
        }
    }

    #[inline]
    pub fn of(self, row: &DeltaRow) -> Option<f64> {
        match self {
            DeltaMetric::Time => row.delta_time_s,
            DeltaMetric::Distance => row.delta_distance_km,
        }
    }
}

impl fmt::Display for DeltaMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for DeltaMetric {
    type Err = DeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "delta_time_s" | "time" => Ok(DeltaMetric::Time),
            "delta_distance_km" | "distance" => Ok(DeltaMetric::Distance),
            other => Err(DeltaError::UnknownMetric(other.to_owned())),
        }
    }
}
