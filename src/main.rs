use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;

use ripple_scout::Cli;
use ripple_scout::commands;

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Run the command (network and file IO on the tokio runtime)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(commands::run(&args))
}
