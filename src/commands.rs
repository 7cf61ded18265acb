// CLI command handlers: load inputs, call the engine, persist and print

use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{LiveScanReport, ScanResult, ScanState, live_scan};
use crate::backtest::{
    BacktestSummary, PairStats, generate_core_signals, pair_stats, run_backtest, summarize, top_pairs,
};
use crate::config::{ScreenConfig, historical_store_path};
use crate::data::tables::{load_core_signals, load_ripple_results, save_core_signals, save_ripple_results};
use crate::data::{HistoricalStore, PriceHistoryProvider, StoreProvider, YahooChartProvider, download_history};
use crate::error::SkippedTicker;
use crate::models::KnowledgeGraph;
use crate::utils::time_utils;
use crate::{Cli, Command};

pub async fn run(cli: &Cli) -> Result<()> {
    let graph = KnowledgeGraph::load_or_empty(&cli.config);
    let config = ScreenConfig::load_or_default(cli.thresholds.as_deref());
    log::info!(
        "Loaded {} core tickers from {} (thresholds: {})",
        graph.len(),
        cli.config.display(),
        describe_thresholds(cli.thresholds.as_deref())
    );

    match &cli.command {
        Command::Scan {
            target_date,
            offline,
        } => {
            let provider: Box<dyn PriceHistoryProvider> = if *offline {
                Box::new(load_store_provider()?)
            } else {
                Box::new(YahooChartProvider::new()?)
            };
            let report = live_scan(provider.as_ref(), &graph, &config, *target_date).await;
            print_live_report(&report);
            Ok(())
        }
        Command::Download => download(&graph).await,
        Command::Signals => signals(&graph, &config),
        Command::Backtest => backtest(&graph, &config),
        Command::Summary { min_events, top } => summary(*min_events, *top),
        Command::Graph => {
            print_graph(&graph);
            Ok(())
        }
    }
}

fn load_store_provider() -> Result<StoreProvider> {
    Ok(StoreProvider::new(load_store()?.data))
}

async fn download(graph: &KnowledgeGraph) -> Result<()> {
    let provider = YahooChartProvider::new()?;
    let report = download_history(&provider, graph, time_utils::today()).await;
    print_skipped(&report.skipped);

    let path = historical_store_path();
    report.store.save_to_path(&path)?;
    println!(
        "✅ Saved {} series ({} to {}) to {}",
        report.store.data.series_data.len(),
        report.store.start,
        report.store.end,
        path.display()
    );
    Ok(())
}

fn load_store() -> Result<HistoricalStore> {
    let path = historical_store_path();
    let store = HistoricalStore::load_from_path(&path)
        .with_context(|| format!("Run `download` first to build {}", path.display()))?;
    log::info!(
        "Using historical store {} ({} to {}, {} hours old)",
        path.display(),
        store.start,
        store.end,
        store.age_secs() / 3600
    );
    Ok(store)
}

fn signals(graph: &KnowledgeGraph, config: &ScreenConfig) -> Result<()> {
    let store = load_store()?;
    let report = generate_core_signals(graph, &store.data, config);
    print_skipped(&report.skipped);

    if report.events.is_empty() {
        println!("No signals found.");
        return Ok(());
    }
    save_core_signals(&report.events)?;
    println!("Saved {} core signals", report.events.len());
    for event in report.events.iter().take(5) {
        println!(
            "  {} {:<6} {:<10} close {:.2}",
            event.date, event.ticker, event.signal, event.close
        );
    }
    Ok(())
}

fn backtest(graph: &KnowledgeGraph, config: &ScreenConfig) -> Result<()> {
    let events = load_core_signals().context("Run `signals` first")?;
    let store = load_store()?;
    println!("Loaded {} core signals", events.len());

    let report = run_backtest(&events, graph, &store.data, config);
    print_skipped(&report.skipped);
    if report.outcomes.is_empty() {
        println!("No results generated.");
        return Ok(());
    }
    save_ripple_results(&report.outcomes)?;
    println!(
        "\nAnalysis complete. {} correlation events processed.",
        report.outcomes.len()
    );

    print_summary(&summarize(&report.outcomes));
    let stats = pair_stats(&report.outcomes, 1);
    print_pairs("Top performing pairs (avg 20d return)", top_pairs(&stats, 10));
    Ok(())
}

fn summary(min_events: usize, top: usize) -> Result<()> {
    let outcomes = load_ripple_results().context("Run `backtest` first")?;
    print_summary(&summarize(&outcomes));
    let stats = pair_stats(&outcomes, min_events);
    print_pairs(
        &format!("Pairs with at least {} events", min_events),
        top_pairs(&stats, top),
    );
    Ok(())
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v * 100.0))
}

fn print_summary(summary: &BacktestSummary) {
    println!("\n--- Summary ---");
    println!("Events: {}", summary.events);
    println!("Avg 5-day return: {}", fmt_pct(summary.avg_return_5d));
    println!("Avg 20-day return: {}", fmt_pct(summary.avg_return_20d));
    println!("20-day win rate: {}", fmt_pct(summary.win_rate_20d));
}

fn print_pairs(title: &str, stats: &[PairStats]) {
    println!("\n--- {} ---", title);
    if stats.is_empty() {
        println!("(none)");
    }
    for s in stats {
        println!(
            "{:<6} -> {:<6} events {:>4}  avg20 {:>8}  win {:>8}  max20 {:>8}  rippled {:.0}%",
            s.core_ticker,
            s.neighbor,
            s.events,
            fmt_pct(s.avg_return_20d),
            fmt_pct(s.win_rate_20d),
            fmt_pct(s.avg_max_return_20d),
            s.neighbor_signal_rate * 100.0
        );
    }
}

fn print_scan_row(result: &ScanResult) {
    println!(
        "  {:<6} {:>10.2}  vcp {:<5} tightness {:>7}  spark {:<5} rsi {:>6}",
        result.ticker,
        result.current_price,
        result.vcp.is_vcp,
        fmt_pct(result.vcp.tightness),
        result.spark.is_spark,
        result.spark.rsi.map_or_else(|| "-".to_string(), |r| format!("{:.1}", r)),
    );
}

fn print_live_report(report: &LiveScanReport) {
    println!("Ripple scan as of {}", report.as_of);
    println!("\n1. Upstream core tickers");
    for result in &report.core_results {
        print_scan_row(result);
    }

    match report.state {
        ScanState::NoCoreData => println!("No core data available."),
        ScanState::NoActiveCores => {
            println!("No upstream energy detected. Skipping downstream scan.")
        }
        ScanState::NoCandidateData => {
            println!("\nActive cores: {}", report.active_cores.join(", "));
            println!("No data for downstream candidates.");
        }
        ScanState::Completed => {
            println!("\nActive cores: {}", report.active_cores.join(", "));
            println!("\n2. Downstream candidates ({})", report.candidates.len());
            for result in &report.ripple_results {
                print_scan_row(result);
            }
            if report.opportunities.is_empty() {
                println!("No actionable signals found in downstream pool.");
            } else {
                println!("\nOpportunities:");
            }
            for opp in &report.opportunities {
                println!(
                    "  {:<6} {:>10.2}  {:<10} driven by {}",
                    opp.ticker,
                    opp.current_price,
                    opp.pattern,
                    opp.driven_by.join(", ")
                );
            }
        }
    }
    print_skipped(&report.skipped);
}

fn print_graph(graph: &KnowledgeGraph) {
    if graph.is_empty() {
        println!("Knowledge graph is empty.");
        return;
    }
    for node in graph.nodes() {
        println!("{} [{}]", node.ticker, node.sector);
        println!("  neighbors: {}", node.neighbors.join(", "));
        if !node.rationale.is_empty() {
            println!("  logic: {}", node.rationale);
        }
    }
}

fn print_skipped(skipped: &[SkippedTicker]) {
    if skipped.is_empty() {
        return;
    }
    println!("\nSkipped {} tickers:", skipped.len());
    for s in skipped {
        println!("  {}", s);
    }
}

fn describe_thresholds(path: Option<&Path>) -> String {
    path.map_or_else(|| "defaults".to_string(), |p| p.display().to_string())
}
