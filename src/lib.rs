#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]

// Core modules
pub mod analysis;
pub mod backtest;
pub mod commands;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use analysis::{LiveScanReport, ScanResult, live_scan, scan};
pub use backtest::{CoreSignalEvent, RippleOutcome, generate_core_signals, run_backtest};
pub use config::ScreenConfig;
pub use domain::{PriceBar, SignalLabel};
pub use error::{ScoutError, SkippedTicker};
pub use models::{KnowledgeGraph, PriceSeries, SeriesCollection};

// CLI argument parsing
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::{PERSISTENCE, SCREEN};
use crate::utils::time_utils::parse_date;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Knowledge graph of core tickers and their neighbors
    #[arg(long, global = true, default_value = PERSISTENCE.graph_path)]
    pub config: PathBuf,

    /// Optional JSON file overriding the pattern thresholds
    #[arg(long, global = true)]
    pub thresholds: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Screen core tickers, then the neighbors of the active ones
    Scan {
        /// Replay the screen as of this day (YYYY-MM-DD) instead of today
        #[arg(long, value_parser = parse_date)]
        target_date: Option<NaiveDate>,

        /// Read history from the local store instead of the network
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Download full history for every graph ticker into the local store
    Download,
    /// Find every historical VCP/Spark day on the core tickers
    Signals,
    /// Measure neighbor returns after each core signal
    Backtest,
    /// Pair statistics from the last backtest
    Summary {
        #[arg(long, default_value_t = SCREEN.backtest.min_pair_events)]
        min_events: usize,

        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print the knowledge graph
    Graph,
}
