use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::indicators::compute_indicators;
use crate::analysis::patterns::evaluate;
use crate::config::ScreenConfig;
use crate::domain::SignalLabel;
use crate::error::{ScoutError, SkippedTicker};
use crate::models::{KnowledgeGraph, PriceSeries, SeriesCollection};

/// A day on which a core ticker fired VCP, Spark or both.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CoreSignalEvent {
    pub date: NaiveDate,
    pub ticker: String,
    pub signal: SignalLabel,
    pub close: f64,
    /// Only recorded when VCP fired
    pub tightness: Option<f64>,
    /// Only recorded when Spark fired
    pub rsi: Option<f64>,
}

/// Judge every day of `series` and keep the days where something fired.
pub fn signals_for_series(series: &PriceSeries, config: &ScreenConfig) -> Vec<CoreSignalEvent> {
    compute_indicators(series)
        .iter()
        .filter_map(|row| {
            let verdict = evaluate(row, config);
            let signal = verdict.label()?;
            Some(CoreSignalEvent {
                date: row.date(),
                ticker: series.ticker.clone(),
                signal,
                close: row.close(),
                tightness: verdict.tightness.filter(|_| verdict.is_vcp),
                rsi: verdict.rsi.filter(|_| verdict.is_spark),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SignalReport {
    pub events: Vec<CoreSignalEvent>,
    pub skipped: Vec<SkippedTicker>,
}

/// Scan the full history of every core ticker in the graph.
///
/// Events are grouped by core ticker in config order, then by date.
pub fn generate_core_signals(
    graph: &KnowledgeGraph,
    histories: &SeriesCollection,
    config: &ScreenConfig,
) -> SignalReport {
    let cores = graph.core_tickers();
    let per_core: Vec<Result<Vec<CoreSignalEvent>, ScoutError>> = cores
        .par_iter()
        .map(|ticker| match histories.find(ticker) {
            Some(series) if !series.is_empty() => Ok(signals_for_series(series, config)),
            _ => Err(ScoutError::no_data(ticker)),
        })
        .collect();

    let mut report = SignalReport::default();
    for (ticker, outcome) in cores.into_iter().zip(per_core) {
        match outcome {
            Ok(events) => {
                log::info!("{}: {} signal days", ticker, events.len());
                report.events.extend(events);
            }
            Err(e) => {
                log::warn!("No data for {}, skipping", ticker);
                report.skipped.push(SkippedTicker::new(ticker, e));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KnowledgeGraphNode;
    use crate::test_support::*;

    #[test]
    fn every_firing_day_becomes_an_event() {
        let series = series_from("AAA", &contraction_closes(), &spike_volumes(210));
        let events = signals_for_series(&series, &ScreenConfig::default());

        assert!(!events.is_empty());
        let last = events.last().unwrap();
        assert_eq!(last.date, day(209));
        assert_eq!(last.signal, SignalLabel::VcpSpark);
        assert!((last.tightness.unwrap() - CONTRACTION_TIGHTNESS).abs() < 1e-9);
        assert_eq!(last.rsi, Some(100.0));

        // Dates ascend and every event carries its own close
        assert!(events.windows(2).all(|w| w[0].date < w[1].date));
        for event in &events {
            let idx = series.index_of(event.date).unwrap();
            assert_eq!(event.close, series.close_prices[idx]);
        }
    }

    #[test]
    fn optional_fields_follow_the_label() {
        let series = series_from("AAA", &contraction_closes(), &flat_volumes(210));
        let events = signals_for_series(&series, &ScreenConfig::default());

        for event in &events {
            assert_eq!(event.tightness.is_some(), event.signal.includes_vcp());
            assert_eq!(event.rsi.is_some(), event.signal.includes_spark());
        }
        assert_eq!(events.last().unwrap().signal, SignalLabel::Vcp);
    }

    #[test]
    fn flat_history_has_no_events() {
        let series = series_from("FLAT", &[100.0; 250], &flat_volumes(250));
        assert!(signals_for_series(&series, &ScreenConfig::default()).is_empty());
    }

    #[test]
    fn cores_without_history_are_skipped() {
        let graph = KnowledgeGraph::from_nodes([
            KnowledgeGraphNode::new("AAA", &["NB1"], "Tech", ""),
            KnowledgeGraphNode::new("MISSING", &["NB1"], "Tech", ""),
        ]);
        let histories = SeriesCollection::new(
            "test",
            vec![series_from("AAA", &contraction_closes(), &spike_volumes(210))],
        );

        let report = generate_core_signals(&graph, &histories, &ScreenConfig::default());

        assert!(report.events.iter().all(|e| e.ticker == "AAA"));
        assert!(!report.events.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].ticker, "MISSING");
    }
}
