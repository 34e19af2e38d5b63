//! # route-delta
//!
//! Compares travel-time/distance matrices from two routing-engine snapshots
//! over one sampled point set and reports the OD pairs whose cost changed
//! the most.

mod cli;
mod compare;
mod pipeline;
mod settings;
mod tables;

#[cfg(test)]
mod tests;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use rd_core::PipelineConfig;
use rd_delta::{DeltaTable, merge};
use rd_output::{DELTA_CSV, POINTS_CSV, TOP_K_CSV, TableWriter, matrix_csv, read_delta, read_matrix, read_points};
use rd_service::ValhallaClient;

use cli::{Cli, Command, RankArgs, Snapshot};
use tables::Tables;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    logger.target(env_logger::Target::Stderr);
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
    }
    logger.init();

    let mut config = settings::load(cli.config.as_deref())?;
    settings::apply_globals(&mut config, &cli);

    match &cli.command {
        Command::Points(sample) => {
            settings::apply_sample(&mut config, sample);
            config.validate()?;
            let mut tables = Tables::open(&config.output_dir, cli.sqlite)?;
            let locator = ValhallaClient::new(config.snap_service())?;
            let points = pipeline::sample_points(&locator, &config.snap)?;
            tables.write_points(&points)?;
            tables.finish()?;
        }

        Command::Matrix { snapshot, points, batch } => {
            settings::apply_batch(&mut config, batch);
            config.validate()?;
            let points = read_points(&settings::table_path(&config, points.as_ref(), POINTS_CSV))
                .context("reading point table")?;
            let snap = settings::snapshot(&config, *snapshot).clone();
            let service = ValhallaClient::new(config.service(&snap))?;
            let matrix = pipeline::acquire_matrix(&service, &snap.label, &points, &config.batch)?;

            let mut tables = Tables::open(&config.output_dir, cli.sqlite)?;
            tables.write_matrix(&snap.label, &matrix)?;
            tables.finish()?;
        }

        Command::Delta { old, new } => {
            config.validate()?;
            let old = read_matrix(&settings::table_path(&config, old.as_ref(), &matrix_csv(&config.old.label)))
                .context("reading old matrix")?;
            let new = read_matrix(&settings::table_path(&config, new.as_ref(), &matrix_csv(&config.new.label)))
                .context("reading new matrix")?;
            let table = merge(&old, &new);

            let mut tables = Tables::open(&config.output_dir, cli.sqlite)?;
            tables.write_delta(&table)?;
            tables.finish()?;
            println!("{}", pipeline::report(&table, Default::default(), 10, true));
        }

        Command::Run { points, sample, batch, rank } => {
            settings::apply_sample(&mut config, sample);
            settings::apply_batch(&mut config, batch);
            config.validate()?;
            let mut tables = Tables::open(&config.output_dir, cli.sqlite)?;
            let table = run_all(&config, points.as_deref(), &mut tables)?;

            let top = table.top_k(rank.metric, rank.k, !rank.include_self_pairs);
            tables.write_top_k(&table.with_return_routes(&top))?;
            tables.finish()?;
            println!("{}", pipeline::report(&table, rank.metric, rank.k, !rank.include_self_pairs));
        }

        Command::TopK { input, rank } => {
            let table = load_delta(&config, input.as_deref())?;
            let top = table.top_k(rank.metric, rank.k, !rank.include_self_pairs);

            let mut tables = Tables::open(&config.output_dir, cli.sqlite)?;
            tables.write_top_k(&table.with_return_routes(&top))?;
            tables.finish()?;

            println!("Top {} routes by {}:", top.len(), rank.metric);
            for (i, row) in top.iter().enumerate() {
                println!("{:>3}. {}", i + 1, pipeline::describe(row, rank.metric));
            }
            info!("wrote {}", config.output_dir.join(TOP_K_CSV).display());
        }

        Command::Routes { input, points, rank } => {
            config.validate()?;
            let table = load_delta(&config, input.as_deref())?;
            let points = read_points(&settings::table_path(&config, points.as_ref(), POINTS_CSV))
                .context("reading point table")?;
            let rows = compare::candidates(&table, rank.metric, rank.k);
            anyhow::ensure!(!rows.is_empty(), "no complete OD pairs to compare");

            let old = ValhallaClient::new(config.service(&config.old))?;
            let new = ValhallaClient::new(config.service(&config.new))?;
            let snapshots = [(config.old.label.as_str(), &old), (config.new.label.as_str(), &new)];
            let result = compare::compare_routes(&snapshots, &rows, &points);

            let mut tables = Tables::open(&config.output_dir, cli.sqlite)?;
            tables.write_route_geometry(&result.vertices)?;
            tables.write_route_summaries(&result.summaries)?;
            tables.finish()?;
            println!(
                "compared {} of {} pairs ({} skipped)",
                rows.len() - result.skipped.len(),
                rows.len(),
                result.skipped.len()
            );
        }

        Command::Summary { input, rank } => {
            let RankArgs { metric, k, include_self_pairs } = rank;
            let table = load_delta(&config, input.as_deref())?;
            println!("{}", pipeline::report(&table, *metric, *k, !include_self_pairs));
        }
    }

    Ok(())
}

/// Points (sampled or loaded), both matrices, and the delta table, each
/// written as soon as it exists.
fn run_all(config: &PipelineConfig, points: Option<&Path>, tables: &mut Tables) -> Result<DeltaTable> {
    let points = match points {
        Some(path) => read_points(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let locator = ValhallaClient::new(config.snap_service())?;
            pipeline::sample_points(&locator, &config.snap)?
        }
    };
    tables.write_points(&points)?;

    let mut matrices = Vec::with_capacity(2);
    for snapshot in [Snapshot::Old, Snapshot::New] {
        let snap = settings::snapshot(config, snapshot);
        let service = ValhallaClient::new(config.service(snap))?;
        let matrix = pipeline::acquire_matrix(&service, &snap.label, &points, &config.batch)?;
        tables.write_matrix(&snap.label, &matrix)?;
        matrices.push(matrix);
    }

    let table = merge(&matrices[0], &matrices[1]);
    tables.write_delta(&table)?;
    Ok(table)
}

fn load_delta(config: &PipelineConfig, input: Option<&Path>) -> Result<DeltaTable> {
    let path = input.map_or_else(|| config.output_dir.join(DELTA_CSV), Path::to_path_buf);
    read_delta(&path).with_context(|| format!("reading {}", path.display()))
}
