//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rd_core::BBox;
use rd_delta::DeltaMetric;

/// Compare travel-time matrices between two routing-engine snapshots
#[derive(Parser, Debug)]
#[command(name = "route-delta", version)]
#[command(long_about = "Compares two routing-engine snapshots over one sampled point set:
  route-delta points                   # sample points.csv against the new snapshot
  route-delta matrix --snapshot old    # matrix_<label>.csv for one snapshot
  route-delta delta                    # merge both matrices into matrix_delta.csv
  route-delta run                      # all of the above, then a summary
  route-delta top-k --metric delta_distance_km -k 10
  route-delta routes -k 5              # fetch geometry for the top changed pairs

Settings come from --config (JSON), then command-line flags.")]
pub struct Cli {
    /// JSON pipeline configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for all tables
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Base URL of the older snapshot's engine
    #[arg(long, global = true)]
    pub old_url: Option<String>,

    /// Base URL of the newer snapshot's engine
    #[arg(long, global = true)]
    pub new_url: Option<String>,

    #[arg(long, global = true)]
    pub old_label: Option<String>,

    #[arg(long, global = true)]
    pub new_label: Option<String>,

    /// Costing profile sent with every request
    #[arg(long, global = true)]
    pub costing: Option<String>,

    /// Per-call timeouts in seconds
    #[arg(long, global = true)]
    pub locate_timeout: Option<f64>,

    #[arg(long, global = true)]
    pub matrix_timeout: Option<f64>,

    #[arg(long, global = true)]
    pub route_timeout: Option<f64>,

    /// Also write tables to route_delta.db (requires the `sqlite` feature)
    #[arg(long, global = true)]
    pub sqlite: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample network-snapped points and write points.csv
    Points(SampleArgs),

    /// Acquire one snapshot's matrix for an existing point set
    Matrix {
        #[arg(long, value_enum)]
        snapshot: Snapshot,

        /// Point table (default: <output-dir>/points.csv)
        #[arg(long)]
        points: Option<PathBuf>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Merge two matrix tables into matrix_delta.csv
    Delta {
        /// Older matrix (default: <output-dir>/matrix_<old-label>.csv)
        #[arg(long)]
        old: Option<PathBuf>,

        /// Newer matrix (default: <output-dir>/matrix_<new-label>.csv)
        #[arg(long)]
        new: Option<PathBuf>,
    },

    /// Points (unless --points is given), both matrices, delta and summary
    Run {
        /// Reuse an existing point table instead of sampling
        #[arg(long)]
        points: Option<PathBuf>,

        #[command(flatten)]
        sample: SampleArgs,

        #[command(flatten)]
        batch: BatchArgs,

        #[command(flatten)]
        rank: RankArgs,
    },

    /// Write the top-k changed routes, each followed by its return trip
    TopK {
        /// Delta table (default: <output-dir>/matrix_delta.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        rank: RankArgs,
    },

    /// Fetch and store both snapshots' geometry for the top-k pairs
    Routes {
        #[arg(long)]
        input: Option<PathBuf>,

        /// Point table (default: <output-dir>/points.csv)
        #[arg(long)]
        points: Option<PathBuf>,

        #[command(flatten)]
        rank: RankArgs,
    },

    /// Print null counts, means, medians and the signed extremes
    Summary {
        #[arg(long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        rank: RankArgs,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Snapshot {
    Old,
    New,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SampleArgs {
    /// Number of points to accept
    #[arg(long)]
    pub count: Option<usize>,

    /// Sampling box as min_lon,min_lat,max_lon,max_lat
    #[arg(long)]
    pub bbox: Option<BBox>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum distance between a draw and its snapped position, metres
    #[arg(long)]
    pub max_snap_m: Option<f64>,

    #[arg(long)]
    pub max_tries: Option<usize>,

    /// Pause after each locate call, milliseconds
    #[arg(long)]
    pub call_delay_ms: Option<u64>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct BatchArgs {
    /// Sources and targets per matrix request
    #[arg(long)]
    pub tile_size: Option<usize>,

    /// Pause after each tile request, milliseconds
    #[arg(long)]
    pub tile_delay_ms: Option<u64>,

    /// Concurrent tile requests (requires the `parallel` feature)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Ranking column: delta_time_s or delta_distance_km
    #[arg(long, default_value = "delta_time_s")]
    pub metric: DeltaMetric,

    #[arg(short, long, default_value_t = 10)]
    pub k: usize,

    /// Rank self-pairs (src = dst) too
    #[arg(long)]
    pub include_self_pairs: bool,
}

impl Default for RankArgs {
    fn default() -> Self {
        Self { metric: DeltaMetric::Time, k: 10, include_self_pairs: false }
    }
}
