//! Resolve the run configuration: JSON file first, then flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rd_core::{PipelineConfig, SnapshotConfig};

use crate::cli::{BatchArgs, Cli, SampleArgs, Snapshot};

/// Load `path` (if any) over the built-in defaults.  Missing keys keep
/// their defaults.
pub fn load(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Apply the global flags.
pub fn apply_globals(config: &mut PipelineConfig, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(url) = &cli.old_url {
        config.old.base_url = url.clone();
    }
    if let Some(url) = &cli.new_url {
        config.new.base_url = url.clone();
    }
    if let Some(label) = &cli.old_label {
        config.old.label = label.clone();
    }
    if let Some(label) = &cli.new_label {
        config.new.label = label.clone();
    }
    if let Some(costing) = &cli.costing {
        config.costing = costing.clone();
    }
    if let Some(s) = cli.locate_timeout {
        config.timeouts.locate_secs = s;
    }
    if let Some(s) = cli.matrix_timeout {
        config.timeouts.matrix_secs = s;
    }
    if let Some(s) = cli.route_timeout {
        config.timeouts.route_secs = s;
    }
}

pub fn apply_sample(config: &mut PipelineConfig, args: &SampleArgs) {
    let snap = &mut config.snap;
    if let Some(n) = args.count {
        snap.count = n;
    }
    if let Some(bbox) = args.bbox {
        snap.bbox = bbox;
    }
    if let Some(seed) = args.seed {
        snap.seed = seed;
    }
    if let Some(m) = args.max_snap_m {
        snap.max_snap_distance_m = m;
    }
    if let Some(n) = args.max_tries {
        snap.max_tries = n;
    }
    if let Some(ms) = args.call_delay_ms {
        snap.call_delay_ms = ms;
    }
}

pub fn apply_batch(config: &mut PipelineConfig, args: &BatchArgs) {
    let batch = &mut config.batch;
    if let Some(n) = args.tile_size {
        batch.tile_size = n;
    }
    if let Some(ms) = args.tile_delay_ms {
        batch.tile_delay_ms = ms;
    }
    if args.threads.is_some() {
        batch.num_threads = args.threads;
    }
}

pub fn snapshot(config: &PipelineConfig, which: Snapshot) -> &SnapshotConfig {
    match which {
        Snapshot::Old => &config.old,
        Snapshot::New => &config.new,
    }
}

/// `explicit`, or `file` inside the output directory.
pub fn table_path(config: &PipelineConfig, explicit: Option<&PathBuf>, file: &str) -> PathBuf {
    explicit.cloned().unwrap_or_else(|| config.output_dir.join(file))
}
