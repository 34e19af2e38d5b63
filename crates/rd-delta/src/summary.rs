//! Aggregate statistics over a delta table.

use std::fmt;

use crate::{DeltaMetric, DeltaTable};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeltaSummary {
    pub rows:                     usize,
    pub null_time_old:            usize,
    pub null_time_new:            usize,
    pub null_distance_old:        usize,
    pub null_distance_new:        usize,
    /// Rows with a negative / positive time delta.
    pub faster:                   usize,
    pub slower:                   usize,
    pub mean_delta_time_s:        Option<f64>,
    pub median_delta_time_s:      Option<f64>,
    pub mean_delta_distance_km:   Option<f64>,
    pub median_delta_distance_km: Option<f64>,
}

impl DeltaSummary {
    /// Means and medians skip rows whose delta is `None`.
    pub fn of(table: &DeltaTable) -> Self {
        let values = |m: DeltaMetric| table.iter().filter_map(|r| m.of(r)).collect::<Vec<_>>();
        let times = values(DeltaMetric::Time);
        let distances = values(DeltaMetric::Distance);

        Self {
            rows:                     table.len(),
            null_time_old:            table.iter().filter(|r| r.time_s_old.is_none()).count(),
            null_time_new:            table.iter().filter(|r| r.time_s_new.is_none()).count(),
            null_distance_old:        table.iter().filter(|r| r.distance_km_old.is_none()).count(),
            null_distance_new:        table.iter().filter(|r| r.distance_km_new.is_none()).count(),
            faster:                   times.iter().filter(|&&v| v < 0.0).count(),
            slower:                   times.iter().filter(|&&v| v > 0.0).count(),
            mean_delta_time_s:        mean(&times),
            median_delta_time_s:      median(times),
            mean_delta_distance_km:   mean(&distances),
            median_delta_distance_km: median(distances),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 { (values[mid - 1] + values[mid]) / 2.0 } else { values[mid] })
}

impl fmt::Display for DeltaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.3}"));
        let pair = |a: usize, b: usize| format!("{a} / {b}");
        let lines = [
            ("rows", self.rows.to_string()),
            ("null time (old / new)", pair(self.null_time_old, self.null_time_new)),
            ("null distance (old / new)", pair(self.null_distance_old, self.null_distance_new)),
            ("faster / slower", pair(self.faster, self.slower)),
            ("mean delta time (s)", opt(self.mean_delta_time_s)),
            ("median delta time (s)", opt(self.median_delta_time_s)),
            ("mean delta distance (km)", opt(self.mean_delta_distance_km)),
            ("median delta distance (km)", opt(self.median_delta_distance_km)),
        ];
        for (i, (label, value)) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<28}{value}", format!("{label}:"))?;
        }
        Ok(())
    }
}
