// Two-stage screen as of one day: core tickers first, then the neighbors of
// whichever cores are active

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{PROVIDER, ScreenConfig};
use crate::data::provider::{PriceHistoryProvider, fetch_many};
use crate::domain::SignalLabel;
use crate::error::SkippedTicker;
use crate::models::KnowledgeGraph;
use crate::utils::time_utils;

use super::ripple::propagate;
use super::scanner::{ScanResult, scan_all};

/// How far a live scan got.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No core ticker produced a scan result (empty graph or no data)
    NoCoreData,
    /// Cores were scanned but none is actionable, so no neighbor was scanned
    NoActiveCores,
    /// Neighbors were nominated but none could be scanned
    NoCandidateData,
    Completed,
}

/// An actionable neighbor with the cores that nominated it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RippleOpportunity {
    pub ticker: String,
    pub current_price: f64,
    pub driven_by: Vec<String>,
    pub pattern: SignalLabel,
    /// Only reported when VCP fired
    pub tightness: Option<f64>,
    pub rsi: Option<f64>,
}

#[derive(Serialize, Debug, Clone)]
pub struct LiveScanReport {
    pub as_of: NaiveDate,
    pub core_results: Vec<ScanResult>,
    pub active_cores: Vec<String>,
    pub candidates: Vec<String>,
    pub source_map: IndexMap<String, Vec<String>>,
    pub ripple_results: Vec<ScanResult>,
    pub opportunities: Vec<RippleOpportunity>,
    #[serde(skip)]
    pub skipped: Vec<SkippedTicker>,
    pub state: ScanState,
}

impl LiveScanReport {
    fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            core_results: Vec::new(),
            active_cores: Vec::new(),
            candidates: Vec::new(),
            source_map: IndexMap::new(),
            ripple_results: Vec::new(),
            opportunities: Vec::new(),
            skipped: Vec::new(),
            state: ScanState::NoCoreData,
        }
    }
}

/// Run the live screen as of `target_date` (today when `None`).
///
/// Only history inside `[target - lookback, target]` is requested, so a past
/// date replays what the screen would have said on that day.
pub async fn live_scan(
    provider: &dyn PriceHistoryProvider,
    graph: &KnowledgeGraph,
    config: &ScreenConfig,
    target_date: Option<NaiveDate>,
) -> LiveScanReport {
    let end = target_date.unwrap_or_else(time_utils::today);
    let start = end - Duration::days(PROVIDER.windows.live_lookback_days);
    let mut report = LiveScanReport::new(end);

    // 1. Core tickers
    let cores = graph.core_tickers();
    log::info!("Scanning {} core tickers as of {}", cores.len(), end);
    let fetched = fetch_many(provider, &cores, start, end).await;
    report.skipped.extend(fetched.skipped);
    let core_batch = scan_all(&fetched.series, config);
    report.skipped.extend(core_batch.skipped);
    report.core_results = core_batch.results;

    if report.core_results.is_empty() {
        log::warn!("No core ticker could be scanned");
        return report;
    }

    report.active_cores = report
        .core_results
        .iter()
        .filter(|r| r.actionable)
        .map(|r| r.ticker.clone())
        .collect();
    if report.active_cores.is_empty() {
        log::info!("No active core tickers as of {}, skipping neighbor scan", end);
        report.state = ScanState::NoActiveCores;
        return report;
    }
    log::info!("Active cores: {}", report.active_cores.join(", "));

    // 2. Neighbors of the active cores
    let ripple = propagate(&report.core_results, graph);
    report.candidates = ripple.candidates();
    log::info!("Scanning {} downstream candidates", report.candidates.len());
    let fetched = fetch_many(provider, &report.candidates, start, end).await;
    report.skipped.extend(fetched.skipped);
    let ripple_batch = scan_all(&fetched.series, config);
    report.skipped.extend(ripple_batch.skipped);

    report.opportunities = ripple_batch
        .results
        .iter()
        .filter_map(|result| {
            let pattern = SignalLabel::from_flags(result.vcp.is_vcp, result.spark.is_spark)?;
            Some(RippleOpportunity {
                ticker: result.ticker.clone(),
                current_price: result.current_price,
                driven_by: ripple.sources(&result.ticker).to_vec(),
                pattern,
                tightness: result.vcp.tightness.filter(|_| result.vcp.is_vcp),
                rsi: result.spark.rsi.filter(|_| result.spark.is_spark),
            })
        })
        .collect();

    report.ripple_results = ripple_batch.results;
    report.source_map = ripple.source_map;
    report.state = if report.ripple_results.is_empty() {
        ScanState::NoCandidateData
    } else {
        ScanState::Completed
    };
    report
}
