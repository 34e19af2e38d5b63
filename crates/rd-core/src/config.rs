//! Run configuration.
//!
//! Each component receives its own config struct at construction; nothing
//! reads process-wide defaults.  `PipelineConfig` bundles them for the
//! application crate, which typically loads it from a JSON file and applies
//! command-line overrides before calling [`PipelineConfig::validate`].

use std::path::PathBuf;
use std::time::Duration;

use crate::{BBox, RdError, RdResult};

// ── Timeouts ──────────────────────────────────────────────────────────────────

/// Per-call timeouts, in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Timeouts {
    pub locate_secs: f64,
    /// Applies to each matrix tile request independently.
    pub matrix_secs: f64,
    pub route_secs:  f64,
}

impl Timeouts {
    pub fn locate(&self) -> Duration {
        as_duration(self.locate_secs)
    }

    pub fn matrix(&self) -> Duration {
        as_duration(self.matrix_secs)
    }

    pub fn route(&self) -> Duration {
        as_duration(self.route_secs)
    }

    /// Every timeout must be positive and representable as a `Duration`.
    pub fn validate(&self) -> RdResult<()> {
        for (name, v) in [
            ("locate", self.locate_secs),
            ("matrix", self.matrix_secs),
            ("route", self.route_secs),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(RdError::Config(format!("{name} timeout must be positive, got {v}")));
            }
            if let Err(e) = Duration::try_from_secs_f64(v) {
                return Err(RdError::Config(format!("{name} timeout of {v} s is out of range: {e}")));
            }
        }
        Ok(())
    }
}

/// Seconds to `Duration`, saturating where `validate` would have refused.
fn as_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(if secs > 0.0 { Duration::MAX } else { Duration::ZERO })
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { locate_secs: 15.0, matrix_secs: 600.0, route_secs: 90.0 }
    }
}

// ── ServiceConfig ─────────────────────────────────────────────────────────────

/// Connection settings for one routing-engine instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8005`.
    pub base_url: String,
    /// Costing profile name sent with every request (`auto` = car only).
    pub costing:  String,
    pub timeouts: Timeouts,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            costing:  "auto".to_owned(),
            timeouts: Timeouts::default(),
        }
    }

    pub fn validate(&self) -> RdResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RdError::Config(format!(
                "service URL {:?} must start with http:// or https://",
                self.base_url
            )));
        }
        if self.costing.trim().is_empty() {
            return Err(RdError::Config("costing profile must not be empty".into()));
        }
        self.timeouts.validate()
    }
}

// ── SnapConfig ────────────────────────────────────────────────────────────────

/// Parameters of the rejection-sampling point generator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapConfig {
    /// Number of points to accept.
    pub count:               usize,
    pub bbox:                BBox,
    /// Master RNG seed.  The same seed always produces the same draws.
    pub seed:                u64,
    /// Accept a draw only if its snapped position is at most this far away.
    pub max_snap_distance_m: f64,
    /// Total draw budget, successful or not.
    pub max_tries:           usize,
    /// Pause after each locate call; 0 disables.
    pub call_delay_ms:       u64,
}

impl SnapConfig {
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    pub fn validate(&self) -> RdResult<()> {
        self.bbox.validate()?;
        if self.count == 0 {
            return Err(RdError::Config("point count must be at least 1".into()));
        }
        if !(self.max_snap_distance_m.is_finite() && self.max_snap_distance_m >= 0.0) {
            return Err(RdError::Config(format!(
                "max_snap_distance_m must be a non-negative number, got {}",
                self.max_snap_distance_m
            )));
        }
        Ok(())
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            count:               50,
            bbox:                BBox::default(),
            seed:                42,
            max_snap_distance_m: 40.0,
            max_tries:           8_000,
            call_delay_ms:       10,
        }
    }
}

// ── BatchConfig ───────────────────────────────────────────────────────────────

/// Tiling parameters for matrix acquisition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchConfig {
    /// Sources (and targets) per tile.  40 × 40 = 1600 stays under the
    /// common 2500-cell service limit.
    pub tile_size:     usize,
    /// Pause after each tile request; 0 disables.
    pub tile_delay_ms: u64,
    /// Worker thread count for the `parallel` feature.  `None` uses all
    /// logical cores.
    pub num_threads:   Option<usize>,
}

impl BatchConfig {
    pub fn tile_delay(&self) -> Duration {
        Duration::from_millis(self.tile_delay_ms)
    }

    pub fn validate(&self) -> RdResult<()> {
        if self.tile_size == 0 {
            return Err(RdError::Config("tile_size must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(RdError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { tile_size: 40, tile_delay_ms: 100, num_threads: None }
    }
}

// ── Snapshots & pipeline ──────────────────────────────────────────────────────

/// One routing-engine instance built from one road-network snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotConfig {
    /// Short name used in file names and logs (e.g. `2018`, `old`).
    pub label:    String,
    pub base_url: String,
}

impl SnapshotConfig {
    pub fn new(label: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self { label: label.into(), base_url: base_url.into() }
    }
}

/// Top-level configuration consumed by the application crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub old:        SnapshotConfig,
    pub new:        SnapshotConfig,
    pub costing:    String,
    pub timeouts:   Timeouts,
    pub snap:       SnapConfig,
    pub batch:      BatchConfig,
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Service settings for `snapshot`, sharing costing and timeouts.
    pub fn service(&self, snapshot: &SnapshotConfig) -> ServiceConfig {
        ServiceConfig {
            costing:  self.costing.clone(),
            timeouts: self.timeouts.clone(),
            ..ServiceConfig::new(snapshot.base_url.clone())
        }
    }

    /// Snapping runs against the newer network.
    pub fn snap_service(&self) -> ServiceConfig {
        self.service(&self.new)
    }

    pub fn validate(&self) -> RdResult<()> {
        if self.old.label == self.new.label {
            return Err(RdError::Config(format!(
                "snapshot labels must differ, both are {:?}",
                self.old.label
            )));
        }
        for snapshot in [&self.old, &self.new] {
            if snapshot.label.trim().is_empty() {
                return Err(RdError::Config("snapshot label must not be empty".into()));
            }
            self.service(snapshot).validate()?;
        }
        self.snap.validate()?;
        self.batch.validate()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            old:        SnapshotConfig::new("old", "http://localhost:8004"),
            new:        SnapshotConfig::new("new", "http://localhost:8005"),
            costing:    "auto".to_owned(),
            timeouts:   Timeouts::default(),
            snap:       SnapConfig::default(),
            batch:      BatchConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}
