//! Signal Map - Main entry point
//!
//! Reads a drive-test CSV, colors each measurement by signal strength and
//! writes a self-contained Leaflet HTML map.
//!
//! Usage:
//! ```bash
//! signal_map canopus_data.csv -o trajectory.html
//! RUST_LOG=debug signal_map --config map.json
//! ```

use anyhow::Context;
use clap::Parser;
use signal_map::cli::Cli;
use signal_map::coverage::registry;
use signal_map::pipeline;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.list_palettes {
        for def in registry().definitions() {
            println!("{:<10} {:?} ({} colors)", def.name, def.palette_type, def.len());
        }
        return Ok(());
    }

    let config = cli.to_config().context("failed to build configuration")?;
    let summary = pipeline::run(&config)?;

    println!(
        "✓ Wrote {} markers to {} (metric range {} to {})",
        summary.markers,
        summary.output.display(),
        summary.domain.min,
        summary.domain.max
    );
    Ok(())
}
