use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use bumplist_config::{BumplistConfig, Strategy};
use bumplist_core::prelude::*;
use bumplist_telemetry::{MetricsRecorder, TracingSink};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Configuration file; defaults to config/bumplist.yaml plus environment
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append 0..count to a list and print it back
    Run(RunArgs),
    /// Move a list, then deep-copy it into an arena
    Copy(CopyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Allocation strategy (overrides configuration)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,
    /// Arena capacity in elements (overrides configuration)
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Number of elements to append
    #[arg(long, default_value_t = 10)]
    pub count: u64,
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Capacity of the destination arena (overrides configuration)
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Number of elements in the source list
    #[arg(long, default_value_t = 10)]
    pub count: u64,
}

/// Result of the move-then-copy demonstration.
#[derive(Debug)]
pub struct CopyReport {
    pub source_after_move: Vec<u64>,
    pub moved: Vec<u64>,
    pub copied: Vec<u64>,
    pub error: Option<AllocError>,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<BumplistConfig> {
    match path {
        Some(path) => BumplistConfig::load_from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => BumplistConfig::load().context("loading configuration"),
    }
}

pub fn run_command(cli: &Cli, config: &BumplistConfig) -> Result<()> {
    let metrics = if config.telemetry.metrics {
        Some(MetricsRecorder::new().context("registering allocation metrics")?)
    } else {
        None
    };

    match &cli.command {
        Commands::Run(args) => {
            let strategy = args.strategy.unwrap_or(config.allocator.strategy);
            let capacity = args.capacity.unwrap_or(config.allocator.arena_capacity);
            let values = run_list(strategy, capacity, args.count, metrics.clone())?;
            for value in values {
                println!("{value}");
            }
        }
        Commands::Copy(args) => {
            let capacity = args.capacity.unwrap_or(config.allocator.arena_capacity);
            let report = copy_list(args.count, capacity, metrics.clone())?;
            println!("source after move: {:?}", report.source_after_move);
            println!("moved:             {:?}", report.moved);
            println!("copied:            {:?}", report.copied);
            if let Some(err) = report.error {
                println!("copy stopped early: {err}");
            }
        }
    }

    if let Some(metrics) = metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

/// Appends `0..count` through the chosen strategy and returns the
/// iteration order.
pub fn run_list(
    strategy: Strategy,
    capacity: usize,
    count: u64,
    metrics: Option<MetricsRecorder>,
) -> Result<Vec<u64>> {
    info!(%strategy, capacity, count, "Building list");
    match strategy {
        Strategy::System => fill(SystemAllocator::with_sink(metrics), count),
        Strategy::Logging => fill(SystemAllocator::with_sink((TracingSink, metrics)), count),
        Strategy::Arena => fill(ArenaAllocator::with_sink(capacity, metrics), count),
    }
}

fn fill<A: Allocator<Value = u64>>(alloc: A, count: u64) -> Result<Vec<u64>> {
    let mut list = List::new_in(alloc);
    for value in 0..count {
        list.append(value)
            .with_context(|| format!("appending element {value} of {count}"))?;
    }
    Ok(list.iter().copied().collect())
}

/// Builds `0..count` on the heap, moves it, then copies the moved list
/// into an arena of `capacity` elements.
///
/// A copy that runs out of arena space is reported, not treated as a
/// failure.
pub fn copy_list(
    count: u64,
    capacity: usize,
    metrics: Option<MetricsRecorder>,
) -> Result<CopyReport> {
    let mut source = List::try_from_iter_in(0..count, SystemAllocator::with_sink(metrics.clone()))
        .context("building source list")?;
    let moved = source.take();
    info!(source = source.len(), moved = moved.len(), "Moved list");

    let mut copy = List::new_in(ArenaAllocator::with_sink(capacity, metrics));
    let error = copy.try_extend_from(&moved).err();
    if let Some(err) = &error {
        warn!(copied = copy.len(), wanted = moved.len(), "Partial copy: {err}");
    }

    Ok(CopyReport {
        source_after_move: source.iter().copied().collect(),
        moved: moved.iter().copied().collect(),
        copied: copy.iter().copied().collect(),
        error,
    })
}
