//! Lagged core-signal to neighbor correlation.
//!
//! Each neighbor's indicators and daily verdicts are computed once and shared
//! by every event that references it. A pair-event is emitted only when the
//! neighbor traded on the signal date and has a full forward window after it.

use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::signals::CoreSignalEvent;
use crate::analysis::indicators::compute_indicators;
use crate::analysis::patterns::evaluate_all;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::{SCREEN, ScreenConfig};
use crate::domain::SignalLabel;
use crate::error::{ScoutError, SkippedTicker};
use crate::models::{IndicatorRow, KnowledgeGraph, PatternVerdict, PriceSeries, SeriesCollection};
use crate::utils::maths_utils::{get_max, pct_change};

/// One (core event, neighbor) observation. Field names are the column names
/// of the results table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RippleOutcome {
    pub core_date: NaiveDate,
    pub core_ticker: String,
    pub core_signal: SignalLabel,
    #[serde(rename = "neighbor")]
    pub neighbor_ticker: String,
    pub return_5d: f64,
    pub return_10d: f64,
    pub return_20d: f64,
    pub max_return_20d: f64,
    #[serde(deserialize_with = "crate::data::tables::bool_cell")]
    pub neighbor_triggered_signal: bool,
}

/// A neighbor's full history with indicators and the verdict of every day.
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    pub ticker: String,
    pub rows: Vec<IndicatorRow>,
    pub verdicts: Vec<PatternVerdict>,
}

impl PreparedSeries {
    pub fn prepare(series: &PriceSeries, config: &ScreenConfig) -> Self {
        let rows = compute_indicators(series);
        let verdicts = evaluate_all(&rows, config);
        Self {
            ticker: series.ticker.clone(),
            rows,
            verdicts,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.rows.binary_search_by_key(&date, |row| row.date()).ok()
    }
}

/// Prepare every neighbor referenced by the graph that has history.
/// Neighbors with no usable history are reported, not prepared.
pub fn prepare_neighbors(
    graph: &KnowledgeGraph,
    histories: &SeriesCollection,
    config: &ScreenConfig,
) -> (HashMap<String, PreparedSeries>, Vec<SkippedTicker>) {
    let neighbors = graph.all_neighbors();

    let prepared: Vec<Result<PreparedSeries, ScoutError>> = neighbors
        .par_iter()
        .map(|ticker| match histories.find(ticker) {
            Some(series) if !series.is_empty() => Ok(PreparedSeries::prepare(series, config)),
            _ => Err(ScoutError::no_data(ticker)),
        })
        .collect();

    let mut map = HashMap::new();
    let mut skipped = Vec::new();
    for (ticker, outcome) in neighbors.into_iter().zip(prepared) {
        match outcome {
            Ok(series) => {
                map.insert(ticker, series);
            }
            Err(e) => {
                log::warn!("Neighbor {} has no history, its pairs are dropped", ticker);
                skipped.push(SkippedTicker::new(ticker, e));
            }
        }
    }
    (map, skipped)
}

/// Forward outcome of `neighbor` after `event`, or `None` when the pair-event
/// must be dropped.
pub fn measure_outcome(event: &CoreSignalEvent, neighbor: &PreparedSeries) -> Option<RippleOutcome> {
    let settings = &SCREEN.backtest;
    let horizon = settings.max_horizon;

    let Some(i) = neighbor.index_of(event.date) else {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_pair_drops {
            log::info!("{} did not trade on {}", neighbor.ticker, event.date);
        }
        return None;
    };
    if i + horizon >= neighbor.len() {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_pair_drops {
            log::info!(
                "{} on {}: only {} forward bars",
                neighbor.ticker,
                event.date,
                neighbor.len() - i - 1
            );
        }
        return None;
    }

    let rows = &neighbor.rows;
    let base_close = rows[i].close();
    let forward_return = |k: usize| pct_change(base_close, rows[i + k].close());

    let [h1, h2, h3] = settings.horizons;
    let highs: Vec<f64> = rows[i + 1..=i + horizon].iter().map(|r| r.bar.high).collect();
    let max_return_20d = pct_change(base_close, get_max(&highs))?;

    // Reaction window excludes the signal day itself
    let neighbor_triggered_signal = neighbor.verdicts[i + 1..=i + settings.reaction_window]
        .iter()
        .any(PatternVerdict::fired);

    Some(RippleOutcome {
        core_date: event.date,
        core_ticker: event.ticker.clone(),
        core_signal: event.signal,
        neighbor_ticker: neighbor.ticker.clone(),
        return_5d: forward_return(h1)?,
        return_10d: forward_return(h2)?,
        return_20d: forward_return(h3)?,
        max_return_20d,
        neighbor_triggered_signal,
    })
}

/// Every (event, neighbor) outcome, in event order then graph neighbor order.
pub fn correlate(
    events: &[CoreSignalEvent],
    graph: &KnowledgeGraph,
    neighbors: &HashMap<String, PreparedSeries>,
) -> Vec<RippleOutcome> {
    events
        .par_iter()
        .flat_map_iter(|event| {
            graph
                .neighbors(&event.ticker)
                .iter()
                .filter_map(|nb| neighbors.get(nb))
                .filter_map(move |prepared| measure_outcome(event, prepared))
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct BacktestReport {
    pub outcomes: Vec<RippleOutcome>,
    pub skipped: Vec<SkippedTicker>,
}

pub fn run_backtest(
    events: &[CoreSignalEvent],
    graph: &KnowledgeGraph,
    histories: &SeriesCollection,
    config: &ScreenConfig,
) -> BacktestReport {
    let (neighbors, skipped) = prepare_neighbors(graph, histories, config);
    let outcomes = correlate(events, graph, &neighbors);
    log::info!(
        "{} core signals against {} neighbors produced {} outcomes",
        events.len(),
        neighbors.len(),
        outcomes.len()
    );
    BacktestReport { outcomes, skipped }
}
