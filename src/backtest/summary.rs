use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use super::correlator::RippleOutcome;
use crate::utils::maths_utils::{finite_mean, positive_fraction};

/// Headline numbers across every outcome. `None` when there is nothing to average.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct BacktestSummary {
    pub events: usize,
    pub avg_return_5d: Option<f64>,
    pub avg_return_20d: Option<f64>,
    pub win_rate_20d: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PairStats {
    pub core_ticker: String,
    pub neighbor: String,
    pub events: usize,
    pub avg_return_20d: Option<f64>,
    pub win_rate_20d: Option<f64>,
    pub avg_max_return_20d: Option<f64>,
    /// Share of events where the neighbor fired its own signal within the reaction window
    pub neighbor_signal_rate: f64,
}

pub fn summarize(outcomes: &[RippleOutcome]) -> BacktestSummary {
    BacktestSummary {
        events: outcomes.len(),
        avg_return_5d: finite_mean(outcomes.iter().map(|o| o.return_5d)),
        avg_return_20d: finite_mean(outcomes.iter().map(|o| o.return_20d)),
        win_rate_20d: positive_fraction(outcomes.iter().map(|o| o.return_20d)),
    }
}

/// Per (core, neighbor) statistics for pairs with at least `min_events`
/// outcomes, best average 20-day return first.
pub fn pair_stats(outcomes: &[RippleOutcome], min_events: usize) -> Vec<PairStats> {
    let mut groups: IndexMap<(&str, &str), Vec<&RippleOutcome>> = IndexMap::new();
    for outcome in outcomes {
        groups
            .entry((outcome.core_ticker.as_str(), outcome.neighbor_ticker.as_str()))
            .or_default()
            .push(outcome);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= min_events)
        .map(|((core, neighbor), members)| {
            let triggered = members.iter().filter(|o| o.neighbor_triggered_signal).count();
            PairStats {
                core_ticker: core.to_string(),
                neighbor: neighbor.to_string(),
                events: members.len(),
                avg_return_20d: finite_mean(members.iter().map(|o| o.return_20d)),
                win_rate_20d: positive_fraction(members.iter().map(|o| o.return_20d)),
                avg_max_return_20d: finite_mean(members.iter().map(|o| o.max_return_20d)),
                neighbor_signal_rate: triggered as f64 / members.len() as f64,
            }
        })
        // Pairs without a usable average sink to the bottom; ties keep first-seen order
        .sorted_by(|a, b| {
            let key = |s: &PairStats| s.avg_return_20d.unwrap_or(f64::NEG_INFINITY);
            key(b).total_cmp(&key(a))
        })
        .collect()
}

pub fn top_pairs(stats: &[PairStats], n: usize) -> &[PairStats] {
    &stats[..n.min(stats.len())]
}
