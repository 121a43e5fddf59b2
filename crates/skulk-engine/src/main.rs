//! # Skulk
//!
//! Headless driver for the Skulk adversary simulation.
//!
//! This binary ties together:
//! - Config: TOML run and tuning parameters
//! - Timing: fixed timestep accumulation
//! - Autopilot: a scripted player
//! - App: the frame loop and run report

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod autopilot;
mod config;
mod timing;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("skulk=info".parse()?))
        .init();

    info!("Skulk starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map_or_else(EngineConfig::config_path, PathBuf::from);

    let mut config = EngineConfig::load_from(&path);
    config.validate();

    if args.iter().any(|a| a == "--write-config") {
        config.save_to(&path)?;
        return Ok(());
    }

    let report = app::run(&config)?;
    if config.print_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!("Skulk shutdown complete");
    Ok(())
}
