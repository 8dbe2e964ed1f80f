//! ## bumplist-cli
//! **Demo driver for the allocator strategies**
//!
//! Builds lists over the system, logging, or arena allocator and prints
//! what comes back out.

use anyhow::anyhow;
use clap::Parser;
use tracing::debug;

use bumplist_telemetry::logging::EventLogger;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_ref())?;

    EventLogger::init(&config.telemetry.log_filter)
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;
    debug!(?config, "Loaded configuration");

    commands::run_command(&cli, &config)
}
